
use emu_lib::{DiskTrigger, Emulator, ExecRet, MachineConfig, RomLoadPolicy};
use emu_lib::image::{demo_disk, demo_program, read_image, write_image};
use emu_lib::io::disk::{DiskStorage, FileDisk, MemDisk};
use emu_lib::video::VideoBuffer;
use emu_lib::io::keyboard::{ascii_for_key, segment_glyph};

use common::constants::{CLOCK_HZ, VIDEO_START};
use common::misc::ToU16P;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use log::warn;


/// 16-bit segment-display machine emulator
#[derive(Parser)]
#[command(about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a memory image
    Run(RunArgs),

    /// Write the demo program.bin and disk.bin
    Generate {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Memory image, loaded at address 0
    image: Option<PathBuf>,

    /// Disk image; created on the first disk write if missing
    #[arg(long)]
    disk: Option<PathBuf>,

    /// Load ROM from disk sector 0 instead of a memory image
    #[arg(long)]
    boot_from_disk: bool,

    /// Stop after this many cycles even if the machine hasn't halted
    #[arg(long)]
    max_ticks: Option<usize>,

    /// Repeat a disk command every cycle until it's replaced
    #[arg(long)]
    level_triggered_disk: bool,

    /// Fault on LOD from ROM
    #[arg(long)]
    deny_rom_loads: bool,

    /// Don't zero RAM on a disk reset
    #[arg(long)]
    keep_memory_on_reset: bool,

    /// Text to type, one key every --key-interval cycles
    #[arg(long, default_value = "")]
    keys: String,

    /// Named host key to type after --keys, e.g. `--key a --key Space`
    #[arg(long = "key", value_name = "NAME")]
    key_names: Vec<String>,

    /// Cycles between scripted key presses
    #[arg(long, default_value_t = 100)]
    key_interval: usize,

    /// Print non-zero video cells after the run
    #[arg(long)]
    dump_video: bool,
}

impl RunArgs {
    fn config(&self) -> MachineConfig {
        MachineConfig {
            disk_trigger: if self.level_triggered_disk { DiskTrigger::Level } else { DiskTrigger::Edge },
            rom_loads: if self.deny_rom_loads { RomLoadPolicy::Deny } else { RomLoadPolicy::Allow },
            reset_clears_memory: !self.keep_memory_on_reset,
        }
    }
}


fn run(args: RunArgs) -> Result<ExitCode, Box<dyn Error>> {
    let config = args.config();
    let storage: Arc<dyn DiskStorage> = match &args.disk {
        Some(path) => Arc::new(FileDisk::open(path)?),
        None => Arc::new(MemDisk::new()),
    };

    let mut emu = Emulator::with_disk(config, storage.clone());

    if args.boot_from_disk {
        emu.boot_from_disk(storage.as_ref())?;
    } else {
        let Some(image) = &args.image else {
            return Err("an image is required unless --boot-from-disk is given".into());
        };
        emu.load_image(&read_image(image)?);
    }

    let named = args.key_names.iter().filter_map(|name| {
        let ascii = ascii_for_key(name);
        if ascii.is_none() {
            warn!("Unknown key {name:?}, skipping");
        }
        ascii.map(char::from)
    });
    let mut keys = args.keys.chars().chain(named).filter_map(|ch| {
        let glyph = segment_glyph(ch);
        if glyph.is_none() {
            warn!("No glyph for {ch:?}, skipping");
        }
        glyph
    });
    let interval = args.key_interval.max(1);

    let mut result = Ok(ExecRet::Ok);
    let mut ticks = 0usize;
    while args.max_ticks.is_none_or(|max| ticks < max) {
        if ticks % interval == 0 {
            if let Some(key) = keys.next() {
                emu.press_key(key);
            }
        }
        result = emu.tick();
        ticks += 1;
        if result != Ok(ExecRet::Ok) {
            break;
        }
    }

    let state = emu.get_state();
    println!("pc:\t{:#06x}", state.pc());
    for (i, val) in state.regs().iter().enumerate() {
        println!("r{i}:\t{val:#06x}");
    }
    println!("{} instructions, {} interrupts, {ticks} cycles", state.num_ins(), state.num_interrupts());
    println!("{:.3} ms at {} MHz", ticks as f64 * 1000.0 / CLOCK_HZ as f64, CLOCK_HZ / 1_000_000);

    if args.dump_video {
        for (row, cells) in emu.video().rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if *cell != 0 {
                    let addr = VIDEO_START + (row * VideoBuffer::COLS + col).to_u16p();
                    println!("{addr:#06x} ({row}, {col}):\t{cell:#018b}");
                }
            }
        }
    }

    match result {
        Ok(ExecRet::Halt) => Ok(ExitCode::SUCCESS),
        Ok(ExecRet::Ok) => {
            eprintln!("Stopped after {ticks} cycles without halting");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Machine fault: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn generate(dir: PathBuf) -> Result<ExitCode, Box<dyn Error>> {
    std::fs::create_dir_all(&dir)?;
    write_image(dir.join("program.bin"), &demo_program())?;
    write_image(dir.join("disk.bin"), &demo_disk())?;
    println!("Wrote program.bin and disk.bin to {}", dir.display());
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Generate { dir } => generate(dir),
    };

    result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}
