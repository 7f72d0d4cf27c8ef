use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chip8_vm::config::{load_flags, HostConfig};
use chip8_vm::display::{MonoTermDisplay, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH};
use chip8_vm::host::Host;
use chip8_vm::input::TermInput;
use chip8_vm::sound::{Mute, SimpleBeep, Sound};
use chip8_vm::Chip8Interpreter;

#[derive(Parser)]
#[command(about = "Run a CHIP-8 program in the terminal")]
struct Args {
    /// Path to the program image
    rom: PathBuf,

    /// Instructions executed per 60Hz tick
    #[arg(long, default_value_t = 300)]
    speed: u32,

    /// Timer ticks per second (0 runs unpaced)
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    /// RNG seed; defaults to the current time
    #[arg(long)]
    seed: Option<u64>,

    /// Load flag registers from, and save them to, this JSON file
    #[arg(long)]
    flags: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Don't use the PC speaker
    #[arg(long, default_value_t = false)]
    mute: bool,
}

fn main() -> Result<()> {
    // logs go to stderr; redirect it, the terminal is busy
    env_logger::init();
    let args = Args::parse();

    let program = fs::read(&args.rom)
        .with_context(|| format!("reading {}", args.rom.display()))?;
    let seed = match args.seed {
        Some(seed) => seed,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64,
    };
    let initial_flags = match &args.flags {
        Some(path) => load_flags(path)?,
        None => 0,
    };
    let config = HostConfig {
        instructions_per_tick: args.speed,
        tick_rate_hz: args.tick_rate,
        seed,
        flags_path: args.flags,
        max_ticks: args.ticks,
    };

    let interpreter = Chip8Interpreter::new(&program, config.seed, initial_flags)?;

    // initialise
    let mut display = MonoTermDisplay::new(CHIP8_DISPLAY_WIDTH, CHIP8_DISPLAY_HEIGHT)?;
    let mut input = TermInput::new()?;
    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let result = Host::new(
        interpreter,
        &mut display,
        &mut input,
        sound.as_mut(),
        config,
    )
    .main_loop();

    // give the terminal back before reporting anything
    drop(input);
    println!();
    let ticks = result?;
    log::info!("ran {} ticks", ticks);
    Ok(())
}
