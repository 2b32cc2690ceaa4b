use thiserror::Error;

/// Conditions the interpreter recovers from while stepping.
///
/// None of these halt the machine; `Chip8::step` applies the recovery and hands the
/// fault back to the caller so it can be logged or asserted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("call stack overflow at {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("return with an empty call stack at {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of range at {address:#06X}")]
    AddressOutOfRange { address: u16 },

    #[error("write into the font table at {address:#05X}")]
    ProtectedWrite { address: u16 },
}

/// Reasons a program image could not be placed in memory
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program is {size} bytes but at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unable to read program: {0}")]
    Io(#[from] std::io::Error),
}
