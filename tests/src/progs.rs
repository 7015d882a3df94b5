
use emu_lib::image::demo_program;
use emu_lib::{CpuState, Emulator, ExecError, ExecRet};
use common::asm::{AddIns, Ins, LodIns, Reg};
use common::{add, halt, jmp, lod};

fn assemble(prog: &[Ins]) -> Vec<u16> {
    prog.iter().map(Ins::encode).collect()
}

#[test]
fn demo_step_by_step() {
    let mut emu = Emulator::new();
    emu.load_image(&demo_program());

    assert_eq!(emu.tick(), Ok(ExecRet::Ok));
    assert_eq!(emu.get_state().reg_read_word(Reg::R0), 42);

    assert_eq!(emu.tick(), Ok(ExecRet::Ok));
    assert_eq!(emu.get_state().reg_read_word(Reg::R0), 84);

    assert_eq!(emu.tick(), Ok(ExecRet::Halt));
    assert_eq!(emu.cpu_state(), CpuState::Halted);

    let regs = *emu.get_state().regs();
    let pc = emu.get_state().pc();
    assert_eq!(emu.tick(), Ok(ExecRet::Halt));
    assert_eq!(*emu.get_state().regs(), regs);
    assert_eq!(emu.get_state().pc(), pc);
    assert_eq!(emu.get_state().num_ins(), 2);
}

#[test]
fn literal_demo_image() {
    let mut bin = vec![0x100a, 0x2001, 0xf000];
    bin.resize(11, 0);
    bin[10] = 42;
    assert_eq!(bin, demo_program());

    let mut emu = Emulator::new();
    emu.load_image(&bin);
    assert_eq!(emu.tick(), Ok(ExecRet::Ok));
    assert_eq!(emu.get_state().reg_read_word(Reg::R0), 42);
    assert_eq!(emu.tick(), Ok(ExecRet::Ok));
    assert_eq!(emu.get_state().reg_read_word(Reg::R0), 84);
    assert_eq!(emu.tick(), Ok(ExecRet::Halt));
    assert_eq!(emu.get_state().pc(), 3);
}

#[test]
fn lod_then_add_doubles() {
    let cases = [
        (Reg::R0, 0x40u8, 0u16),
        (Reg::R7, 0x41, 1),
        (Reg::R15, 0xff, 0x7fff),
        (Reg::R9, 0x80, 0x8000),
        (Reg::R3, 0x90, 0xffff),
    ];
    for (reg, addr, val) in cases {
        let mut bin = assemble(&[
            Ins::Lod(LodIns { reg, addr }),
            Ins::Add(AddIns { dst: reg, src: reg }),
            halt!(),
        ]);
        bin.resize(0x100, 0);
        bin[addr as usize] = val;

        let mut emu = Emulator::new();
        emu.load_image(&bin);
        emu.run().unwrap();
        assert_eq!(emu.get_state().reg_read_word(reg), val.wrapping_mul(2), "{reg} from {addr:#x}");
    }
}

#[test]
fn jmp_to_top_of_range() {
    let mut bin = assemble(&[jmp!(0xfff)]);
    bin.resize(0x1000, 0);
    bin[0xfff] = halt!().encode();

    let mut emu = Emulator::new();
    emu.load_image(&bin);
    emu.tick().unwrap();
    assert_eq!(emu.get_state().pc(), 0xfff);
    assert_eq!(emu.tick(), Ok(ExecRet::Halt));
    assert_eq!(emu.get_state().pc(), 0x1000);
}

#[test]
fn count_with_loop() {
    // r1 += r2 forever; stop it after a few rounds.
    let mut bin = assemble(&[lod!(R2, 3), add!(R1, R2), jmp!(1)]);
    bin.push(5);
    let mut emu = Emulator::new();
    emu.load_image(&bin);
    assert_eq!(emu.run_for(1 + 2 * 10), Ok(ExecRet::Ok));
    assert_eq!(emu.get_state().reg_read_word(Reg::R1), 50);
    assert!(!emu.is_halted());
}

#[test]
fn runs_off_into_zeros() {
    // Memory is zero past the program, and 0x0000 doesn't decode.
    let mut emu = Emulator::new();
    emu.load_image(&assemble(&[add!(R0, R0)]));
    assert_eq!(emu.run(), Err(ExecError::UnknownInstruction { ins: 0, pc: 1 }));
    assert!(emu.is_halted());
}
