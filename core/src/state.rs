use std::fmt;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT, FONT_END, FONT_START, KEY_COUNT, MEMORY_SIZE,
    PROGRAM_START, REGISTER_COUNT, STACK_DEPTH,
};
use crate::error::Fault;
use crate::opcode;
use crate::timers::Timers;

/// The FrameBuffer is indexed as [y][x]; every cell is either 0 or 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed status of the hex keys 0..F
pub type Keypad = [bool; KEY_COUNT];

/// A snapshot of the Chip-8 machine
///
/// ## CPU
/// Registers
/// - (v) 16 8-bit registers (V0..VF)
///     - VF doubles as the flag written by arithmetic, shift and draw instructions
/// - (i) a 16-bit index register; only addresses up to 0xFFF are valid
///
/// Counter
/// - (pc) a 16-bit program counter, starting at 0x200
///
/// Stack
/// - (stack) 16 return addresses
/// - (sp) the number of occupied slots
///
/// Timers
/// - delay & sound, see `Timers`
///
/// ## Memory
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the font, which programs can't overwrite
///     - 0x200.. holds the loaded program
/// - 64x32 frame buffer
///     - `draw_flag` is raised whenever it changes and lowered by whoever renders it
///
/// ## Input
/// - `keypad` tracks the pressed status of keys 0..F; only the input collaborator writes it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_DEPTH],
    pub timers: Timers,
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: Keypad,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[FONT_START as usize..FONT_END as usize].copy_from_slice(&FONT);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            timers: Timers::new(),
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            keypad: [false; KEY_COUNT],
        }
    }

    /// Gets the instruction word the pc points at.
    pub fn fetch(&self) -> Result<u16, Fault> {
        let bytes = self.read(self.pc, 2)?;
        Ok(opcode::from_bytes(bytes[0], bytes[1]))
    }

    /// Borrows `len` bytes of memory starting at `address`.
    ///
    /// Fails with the first address past the end of memory if the range doesn't fit.
    pub fn read(&self, address: u16, len: usize) -> Result<&[u8], Fault> {
        let start = address as usize;
        if start + len > MEMORY_SIZE {
            return Err(Fault::AddressOutOfRange {
                address: address.max(MEMORY_SIZE as u16),
            });
        }
        Ok(&self.memory[start..start + len])
    }

    /// Checks that programs may write `len` bytes starting at `address`.
    pub fn check_writable(&self, address: u16, len: usize) -> Result<(), Fault> {
        self.read(address, len)?;
        let start = address as usize;
        let end = start + len;
        if start < FONT_END as usize && end > FONT_START as usize {
            return Err(Fault::ProtectedWrite {
                address: address.max(FONT_START),
            });
        }
        Ok(())
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line register dump, e.g. `pc:0200 i:0000 sp:0 dt:00 st:00 v:[00 00 .. 00]`
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "pc:{:04X} i:{:04X} sp:{} dt:{:02X} st:{:02X} v:[",
            self.pc, self.i, self.sp, self.timers.delay, self.timers.sound
        )?;
        for (index, value) in self.v.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", value)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_loads_font() {
        let state = State::new();
        assert_eq!(state.memory[0x050..0x055], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(state.memory[0x09B..0x0A0], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert_eq!(state.memory[0x0A0], 0x0);
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_fetch() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch(), Ok(0xAABB));
    }

    #[test]
    fn test_fetch_past_end_of_memory() {
        let mut state = State::new();
        state.pc = 0xFFF;
        assert_eq!(
            state.fetch(),
            Err(Fault::AddressOutOfRange { address: 0x1000 })
        );
    }

    #[test]
    fn test_read_bounds() {
        let state = State::new();
        assert_eq!(state.read(0xFFD, 3).map(|bytes| bytes.len()), Ok(3));
        assert_eq!(
            state.read(0xFFE, 3),
            Err(Fault::AddressOutOfRange { address: 0x1000 })
        );
        assert_eq!(
            state.read(0x1234, 1),
            Err(Fault::AddressOutOfRange { address: 0x1234 })
        );
    }

    #[test]
    fn test_font_is_not_writable() {
        let state = State::new();
        assert_eq!(state.check_writable(0x200, 16), Ok(()));
        assert_eq!(state.check_writable(0x0A0, 1), Ok(()));
        assert_eq!(state.check_writable(0x04C, 4), Ok(()));
        assert_eq!(
            state.check_writable(0x04E, 3),
            Err(Fault::ProtectedWrite { address: 0x050 })
        );
        assert_eq!(
            state.check_writable(0x09F, 1),
            Err(Fault::ProtectedWrite { address: 0x09F })
        );
    }

    #[test]
    fn test_register_dump() {
        let mut state = State::new();
        state.v[0x0] = 0xAB;
        state.v[0xF] = 0x01;
        state.i = 0x123;
        state.sp = 2;
        state.timers.delay = 0x3C;
        assert_eq!(
            state.to_string(),
            "pc:0200 i:0123 sp:2 dt:3C st:00 v:[AB 00 00 00 00 00 00 00 00 00 00 00 00 00 00 01]"
        );
    }
}
