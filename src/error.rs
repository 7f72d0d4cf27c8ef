use std::io;

/// Everything that can go wrong inside the virtual machine. The set is closed:
/// each variant has a small, stable integer code so hosts can store or
/// transmit it without the enum itself.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// the word at PC doesn't decode to any instruction
    #[error("illegal opcode")]
    IllegalOpcode,
    /// 2NNN with all 16 stack slots in use
    #[error("stack overflow")]
    StackOverflow,
    /// 00EE with an empty stack
    #[error("return with empty stack")]
    BadReturn,
    /// program image doesn't fit between 0x200 and the top of memory
    #[error("program too long")]
    ProgramTooLong,
    /// FX75/FX85 with X > 7
    #[error("flag register overflow")]
    FlagOverflow,
}

const ERROR_CODES: [(u16, Error); 5] = [
    (1, Error::IllegalOpcode),
    (2, Error::StackOverflow),
    (3, Error::BadReturn),
    (4, Error::ProgramTooLong),
    (5, Error::FlagOverflow),
];

impl Error {
    /// stable numeric code for this error
    pub fn code(self) -> u16 {
        match self {
            Error::IllegalOpcode => 1,
            Error::StackOverflow => 2,
            Error::BadReturn => 3,
            Error::ProgramTooLong => 4,
            Error::FlagOverflow => 5,
        }
    }

    pub fn from_code(code: u16) -> Option<Error> {
        ERROR_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, e)| *e)
    }

    pub fn name(self) -> &'static str {
        match self {
            Error::IllegalOpcode => "IllegalOpcode",
            Error::StackOverflow => "StackOverflow",
            Error::BadReturn => "BadReturn",
            Error::ProgramTooLong => "ProgramTooLong",
            Error::FlagOverflow => "FlagOverflow",
        }
    }
}

/// converts an error code into a human-readable name
pub fn error_name(code: u16) -> &'static str {
    Error::from_code(code).map_or("UnknownError", Error::name)
}

/// Errors from the host side: peripherals, the flag file and the engine
/// itself once a run has been started.
#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("flag file error: {0}")]
    FlagFile(#[from] serde_json::Error),
    #[error("sound error: {0}")]
    Sound(String),
    /// the interpreter couldn't be set up
    #[error("failed to load program: {0}")]
    Load(#[from] Error),
    #[error("{error} at 0x{pc:03x}, instruction 0x{instruction:04x}")]
    Engine {
        error: Error,
        pc: u16,
        instruction: u16,
    },
}
