use crate::error::HostError;
use crate::flags::CHIP8_FLAG_COUNT;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How the host drives the interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// instructions executed between timer ticks
    pub instructions_per_tick: u32,
    /// timer ticks per second; 0 runs flat out
    pub tick_rate_hz: u32,
    /// RNG seed
    pub seed: u64,
    /// where flags are loaded from and saved to, if anywhere
    pub flags_path: Option<PathBuf>,
    /// stop after this many ticks
    pub max_ticks: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            instructions_per_tick: 300,
            tick_rate_hz: 60,
            seed: 0,
            flags_path: None,
            max_ticks: None,
        }
    }
}

/// on-disk form of the flag store
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
struct FlagsFile {
    flags: [u8; CHIP8_FLAG_COUNT],
}

/// Read packed flags from `path`. A file that isn't there yet means all
/// flags are zero.
pub fn load_flags(path: &Path) -> Result<u64, HostError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("no flag file at {}, starting with zeroed flags", path.display());
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };
    let file: FlagsFile = serde_json::from_str(&text)?;
    Ok(u64::from_le_bytes(file.flags))
}

/// Write packed flags to `path`, replacing what was there.
pub fn save_flags(path: &Path, packed: u64) -> Result<(), HostError> {
    let file = FlagsFile {
        flags: packed.to_le_bytes(),
    };
    fs::write(path, serde_json::to_string(&file)?)?;
    Ok(())
}
