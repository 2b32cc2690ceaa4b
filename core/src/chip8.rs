use std::io::Read;

use log::{debug, log, trace, Level};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::error::{Fault, LoadError};
use crate::instruction::Instruction;
use crate::state::{FrameBuffer, State};

/// What a single call to `Chip8::step` did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The instruction ran to completion
    Executed(Instruction),
    /// `WaitKey` found nothing pressed; the pc still points at it
    AwaitingKey,
    /// The machine recovered from a fault and can keep stepping
    Faulted(Fault),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the random number source used by `Rand`
///
/// Supplies interfaces for:
/// - loading programs
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// It never sleeps or spawns anything; whoever owns it decides how fast to step it and how
/// often to tick its timers.
pub struct Chip8 {
    state: State,
    rng: StdRng,
    // the fault raised by the previous step, so a stuck pc isn't reported every cycle
    last_fault: Option<Fault>,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8::from_rng(StdRng::from_entropy())
    }

    /// A machine whose `Rand` results are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Chip8::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            rng,
            last_fault: None,
        }
    }

    /// Zeroes the whole machine, reloads the font and points the pc back at 0x200.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.last_fault = None;
        debug!("machine reset");
    }

    /// Copies a program image into memory at 0x200.
    ///
    /// Memory is left untouched if the image doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + program.len()].copy_from_slice(program);
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), LoadError> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load_program(&program)
    }

    /// The whole machine as it stands between two steps
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Acknowledges that the current frame has been drawn
    pub fn clear_draw_flag(&mut self) {
        self.state.draw_flag = false;
    }

    /// Returns a copy of the FrameBuffer and lowers the draw flag, if it was raised
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        let frame = self.frame().copied();
        self.clear_draw_flag();
        frame
    }

    /// Set the pressed status of a key
    ///
    /// # Arguments
    /// * `key` the hex key 0x0..=0xF; anything larger names no key and is ignored
    /// * `pressed` whether the key is now held down
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        match self.state.keypad.get_mut(key as usize) {
            Some(slot) => *slot = pressed,
            None => debug!("ignoring key {:#04X}", key),
        }
    }

    /// Advances the CPU by a single instruction
    /// - fetches the word at the pc, decodes it and executes it
    /// - an undefined word or a failing instruction only moves the pc past it
    /// - a pc that can't be fetched from is left where it is
    pub fn step(&mut self) -> Step {
        match self.cycle() {
            Ok(step) => {
                self.last_fault = None;
                step
            }
            Err(fault) => {
                let level = if self.last_fault == Some(fault) {
                    Level::Debug
                } else {
                    Level::Warn
                };
                log!(level, "{} ({})", fault, self.state);
                self.last_fault = Some(fault);
                Step::Faulted(fault)
            }
        }
    }

    fn cycle(&mut self) -> Result<Step, Fault> {
        let pc = self.state.pc;
        let op = self.state.fetch()?;

        let instruction = match Instruction::decode(op) {
            Some(instruction) => instruction,
            None => {
                self.skip();
                return Err(Fault::UnknownOpcode { opcode: op, pc });
            }
        };
        trace!("{:03X}: {:04X} {} [{}]", pc, op, instruction, self.state);

        match instruction.execute(&self.state, &mut self.rng) {
            Ok(next) => {
                let waiting = matches!(instruction, Instruction::WaitKey { .. }) && next.pc == pc;
                self.state = next;
                if waiting {
                    Ok(Step::AwaitingKey)
                } else {
                    Ok(Step::Executed(instruction))
                }
            }
            Err(fault) => {
                self.skip();
                Err(fault)
            }
        }
    }

    fn skip(&mut self) {
        self.state.pc += 0x2;
    }

    /// Counts the delay and sound timers down by one; call this at 60Hz.
    ///
    /// Returns true on the tick where the sound timer runs out, the cue for a tone.
    pub fn tick_timers(&mut self) -> bool {
        self.state.timers.tick()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
