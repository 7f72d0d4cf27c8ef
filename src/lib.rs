//! ## Design
//!
//! * a CHIP-8 interpreter as an embeddable state machine: the host owns a
//!   `Chip8Interpreter` and calls `step`, `tick` and `set_keys` on it
//! * SUPER-CHIP style flag registers (FX75/FX85) that the host can persist
//! * no wall-clock inside the interpreter; timers only move on `tick`, so a
//!   run is replayable from (program, seed, flags, call sequence)
//! * nothing panics or aborts on a bad program; every failure is an `Error`
//!   with a small integer code
//! * display, input and sound are traits so the host can plug alternatives;
//!   the binary uses a TUI terminal, the keyboard and the PC speaker
//!
//! Model
//!
//! Host
//!  |-- display, input, sound, config
//!  |-- interpreter(program, seed, flags)
//!  |    |-- memory, registers, stack, timers
//!  |    |-- framebuffer + dirty bit, flag store + dirty bit
//!  |    `-- key latch, rng
//!  `-- main loop (see `host`)
pub mod config;
pub mod display;
pub mod error;
pub mod flags;
pub mod host;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod rng;
pub mod sound;
pub mod stack;
pub mod timer;

pub use error::{error_name, Error, HostError};
pub use interpreter::{context_size, Chip8Interpreter};
