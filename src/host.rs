//! The host loop: everything outside the interpreter that decides when to
//! step, when to tick, and what to do with the screen and flags.
//!
//! Each tick:
//!  |-- keys = input.poll_keys(); interpreter.set_keys(keys)
//!  |-- step up to `instructions_per_tick` times (stop early while waiting for a key)
//!  |-- interpreter.tick()
//!  |-- start/stop the tone on sound timer transitions
//!  |-- draw the display if dirty, then clear the dirty bit
//!  |-- save the flags if dirty, then clear the dirty bit
//!  `-- sleep off whatever is left of 1 / tick_rate_hz
use crate::config::{save_flags, HostConfig};
use crate::display::Display;
use crate::error::HostError;
use crate::input::Input;
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use log::{debug, info};
use std::time::{Duration, Instant};

pub struct Host<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    config: HostConfig,
    sounding: bool,
    ticks: u64,
}

impl<'a> Host<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: HostConfig,
    ) -> Self {
        Host {
            interpreter,
            display,
            input,
            sound,
            config,
            sounding: false,
            ticks: 0,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// run one tick's worth of work
    pub fn run_tick(&mut self) -> Result<(), HostError> {
        let keys = self.input.poll_keys()?;
        self.interpreter.set_keys(keys);

        for _ in 0..self.config.instructions_per_tick {
            if self.interpreter.is_waiting_for_key() {
                break;
            }
            if let Err(error) = self.interpreter.step() {
                return Err(HostError::Engine {
                    error,
                    pc: self.interpreter.get_program_counter(),
                    instruction: self.interpreter.get_instruction(),
                });
            }
        }

        self.interpreter.tick();
        self.ticks += 1;

        let sounding = self.interpreter.is_sounding();
        if sounding != self.sounding {
            self.set_sound(sounding)?;
        }

        if self.interpreter.display_is_dirty() {
            self.display.draw(self.interpreter.get_display())?;
            self.interpreter.clear_display_dirty();
        }

        if self.interpreter.flags_are_dirty() {
            if let Some(path) = &self.config.flags_path {
                save_flags(path, self.interpreter.get_flags())?;
                info!("saved flags to {}", path.display());
            }
            self.interpreter.clear_flags_dirty();
        }
        Ok(())
    }

    fn set_sound(&mut self, on: bool) -> Result<(), HostError> {
        let result = if on {
            self.sound.beep()
        } else {
            self.sound.stop()
        };
        result.map_err(|e| HostError::Sound(e.to_string()))?;
        self.sounding = on;
        Ok(())
    }

    /// Tick until the user quits, the tick limit is reached or the program
    /// fails. Returns the number of ticks run.
    pub fn main_loop(&mut self) -> Result<u64, HostError> {
        let period = match self.config.tick_rate_hz {
            0 => None,
            hz => Some(Duration::from_secs(1) / hz),
        };
        info!(
            "running at {} instructions per tick, {} ticks/s",
            self.config.instructions_per_tick, self.config.tick_rate_hz
        );

        let result = self.run_ticks(period);
        if self.sounding {
            self.set_sound(false)?;
        }
        info!("stopped after {} ticks", self.ticks);
        result.map(|_| self.ticks)
    }

    fn run_ticks(&mut self, period: Option<Duration>) -> Result<(), HostError> {
        let mut next = Instant::now();
        while !self.input.quit_requested() {
            if self.config.max_ticks.map_or(false, |max| self.ticks >= max) {
                debug!("tick limit reached");
                break;
            }
            self.run_tick()?;
            if let Some(period) = period {
                next += period;
                let now = Instant::now();
                if next > now {
                    spin_sleep::sleep(next - now);
                } else {
                    // running behind; don't try to catch up
                    next = now;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_flags;
    use crate::display::DummyDisplay;
    use crate::error::Error;
    use crate::input::DummyInput;
    use crate::sound::Mute;
    use std::env;
    use std::fs;
    use std::process;

    fn unpaced(max_ticks: u64) -> HostConfig {
        HostConfig {
            tick_rate_hz: 0,
            max_ticks: Some(max_ticks),
            ..HostConfig::default()
        }
    }

    #[test]
    fn test_draws_only_when_dirty() -> Result<(), HostError> {
        // draw the "0" glyph then spin
        let program = [0xa0, 0x50, 0xd0, 0x05, 0x12, 0x04];
        let interpreter = Chip8Interpreter::new(&program, 0, 0)?;
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let mut host = Host::new(interpreter, &mut display, &mut input, &mut sound, unpaced(3));
        assert_eq!(host.main_loop()?, 3);
        assert!(!host.interpreter().display_is_dirty());
        drop(host);
        assert_eq!(display.frames.len(), 1);
        assert_eq!(display.frames[0][0], 0x0f);
        Ok(())
    }

    #[test]
    fn test_engine_error_reports_location() -> Result<(), Error> {
        let interpreter = Chip8Interpreter::new(&[0x60, 0x01, 0xff, 0xff], 0, 0)?;
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let mut host = Host::new(interpreter, &mut display, &mut input, &mut sound, unpaced(10));
        match host.main_loop() {
            Err(HostError::Engine {
                error,
                pc,
                instruction,
            }) => {
                assert_eq!(error, Error::IllegalOpcode);
                assert_eq!(pc, 0x202);
                assert_eq!(instruction, 0xffff);
            }
            other => panic!("expected engine error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_key_wait_resolved_by_input() -> Result<(), HostError> {
        // wait for a key into V3, then spin
        let program = [0xf3, 0x0a, 0x12, 0x02];
        let interpreter = Chip8Interpreter::new(&program, 0, 0)?;
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[0, 0, 1 << 9]);
        let mut sound = Mute::new();
        let mut host = Host::new(interpreter, &mut display, &mut input, &mut sound, unpaced(2));
        host.main_loop()?;
        assert!(host.interpreter().is_waiting_for_key());
        host.run_tick()?;
        assert!(!host.interpreter().is_waiting_for_key());
        assert_eq!(host.interpreter().get_register(3), 9);
        Ok(())
    }

    #[test]
    fn test_sound_follows_timer() -> Result<(), HostError> {
        // sound timer = 2, then spin
        let program = [0x60, 0x02, 0xf0, 0x18, 0x12, 0x04];
        let interpreter = Chip8Interpreter::new(&program, 0, 0)?;
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let mut host = Host::new(interpreter, &mut display, &mut input, &mut sound, unpaced(4));
        host.main_loop()?;
        drop(host);
        assert_eq!(sound.beeps, 1);
        assert_eq!(sound.stops, 1);
        Ok(())
    }

    #[test]
    fn test_flags_saved_when_dirty() -> Result<(), HostError> {
        let path = env::temp_dir().join(format!("chip8-vm-host-{}.json", process::id()));
        // V0 = 0x2a, V1 = 0x07, save V0..V1, spin
        let program = [0x60, 0x2a, 0x61, 0x07, 0xf1, 0x75, 0x12, 0x06];
        let interpreter = Chip8Interpreter::new(&program, 0, 0)?;
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let config = HostConfig {
            flags_path: Some(path.clone()),
            ..unpaced(1)
        };
        let mut host = Host::new(interpreter, &mut display, &mut input, &mut sound, config);
        host.main_loop()?;
        assert!(!host.interpreter().flags_are_dirty());
        assert_eq!(load_flags(&path)?, 0x072a);
        fs::remove_file(&path)?;
        Ok(())
    }
}
