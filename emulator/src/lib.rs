pub mod config;
pub mod emulator;
pub mod emulator_state;
pub mod error;
pub mod image;
pub mod io;
pub mod memory;
pub mod video;

pub use config::{DiskTrigger, MachineConfig, RomLoadPolicy};
pub use emulator::{CpuState, Emulator, ExecRet};
pub use emulator_state::EmulatorState;
pub use error::{DiskError, ExecError};
pub use io::MMIOHandler;
