// A panicking version.
pub trait ToU16P {
    fn to_u16p(self) -> u16;
}

impl ToU16P for usize {
    fn to_u16p(self) -> u16 {
        assert!(self <= u16::MAX as Self);
        self as u16
    }
}

