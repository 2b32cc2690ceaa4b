pub use chip8::{Chip8, Step};
pub use constants::{CLOCK_SPEED, TIMER_SPEED};
pub use error::{Fault, LoadError};
pub use instruction::Instruction;
pub use state::{FrameBuffer, Keypad, State};
pub use timers::Timers;

mod chip8;
pub mod constants;
mod error;
mod instruction;
pub mod opcode;
mod operations;
pub mod state;
mod timers;
