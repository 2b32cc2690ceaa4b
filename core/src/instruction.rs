use std::fmt;

use rand::Rng;

use crate::error::Fault;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded instruction word and its operands
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipEqN { x: u8, nn: u8 },
    /// 4XNN
    SkipNeN { x: u8, nn: u8 },
    /// 5XY0
    SkipEqV { x: u8, y: u8 },
    /// 6XNN
    LoadN { x: u8, nn: u8 },
    /// 7XNN
    AddN { x: u8, nn: u8 },
    /// 8XY0
    Move { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddC { x: u8, y: u8 },
    /// 8XY5
    SubB { x: u8, y: u8 },
    /// 8XY6
    Shr { x: u8 },
    /// 8XY7
    SubBRev { x: u8, y: u8 },
    /// 8XYE
    Shl { x: u8 },
    /// 9XY0
    SkipNeV { x: u8, y: u8 },
    /// ANNN
    LoadI { nnn: u16 },
    /// BNNN
    JumpOffset { nnn: u16 },
    /// CXNN
    Rand { x: u8, nn: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyDown { x: u8 },
    /// EXA1
    SkipKeyUp { x: u8 },
    /// FX07
    ReadDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    WriteDelay { x: u8 },
    /// FX18
    WriteSound { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    LoadFont { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegs { x: u8 },
    /// FX65
    LoadRegs { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for an instruction word, if it names one
    pub fn decode(op: u16) -> Option<Instruction> {
        use Instruction::*;

        let (x, y) = (op.x(), op.y());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, ..) => Jump { nnn: op.nnn() },
            (0x2, ..) => Call { nnn: op.nnn() },
            (0x3, ..) => SkipEqN { x, nn: op.nn() },
            (0x4, ..) => SkipNeN { x, nn: op.nn() },
            (0x5, .., 0x0) => SkipEqV { x, y },
            (0x6, ..) => LoadN { x, nn: op.nn() },
            (0x7, ..) => AddN { x, nn: op.nn() },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddC { x, y },
            (0x8, .., 0x5) => SubB { x, y },
            (0x8, .., 0x6) => Shr { x },
            (0x8, .., 0x7) => SubBRev { x, y },
            (0x8, .., 0xE) => Shl { x },
            (0x9, .., 0x0) => SkipNeV { x, y },
            (0xA, ..) => LoadI { nnn: op.nnn() },
            (0xB, ..) => JumpOffset { nnn: op.nnn() },
            (0xC, ..) => Rand { x, nn: op.nn() },
            (0xD, ..) => Draw { x, y, n: op.n() },
            (0xE, .., 0x9, 0xE) => SkipKeyDown { x },
            (0xE, .., 0xA, 0x1) => SkipKeyUp { x },
            (0xF, .., 0x0, 0x7) => ReadDelay { x },
            (0xF, .., 0x0, 0xA) => WaitKey { x },
            (0xF, .., 0x1, 0x5) => WriteDelay { x },
            (0xF, .., 0x1, 0x8) => WriteSound { x },
            (0xF, .., 0x1, 0xE) => AddIndex { x },
            (0xF, .., 0x2, 0x9) => LoadFont { x },
            (0xF, .., 0x3, 0x3) => StoreBcd { x },
            (0xF, .., 0x5, 0x5) => StoreRegs { x },
            (0xF, .., 0x6, 0x5) => LoadRegs { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Runs the instruction against `state`, producing the state that follows it.
    ///
    /// `rng` is only drawn from by `Rand`.
    pub fn execute<R: Rng + ?Sized>(self, state: &State, rng: &mut R) -> Result<State, Fault> {
        use Instruction::*;

        match self {
            Clear => clear(state),
            Return => ret(state),
            Jump { nnn } => jump(nnn, state),
            Call { nnn } => call(nnn, state),
            SkipEqN { x, nn } => skip_eq_n(x, nn, state),
            SkipNeN { x, nn } => skip_ne_n(x, nn, state),
            SkipEqV { x, y } => skip_eq_v(x, y, state),
            LoadN { x, nn } => load_n(x, nn, state),
            AddN { x, nn } => add_n(x, nn, state),
            Move { x, y } => mov(x, y, state),
            Or { x, y } => or(x, y, state),
            And { x, y } => and(x, y, state),
            Xor { x, y } => xor(x, y, state),
            AddC { x, y } => add_c(x, y, state),
            SubB { x, y } => sub_b(x, y, state),
            Shr { x } => shr(x, state),
            SubBRev { x, y } => sub_b_rev(x, y, state),
            Shl { x } => shl(x, state),
            SkipNeV { x, y } => skip_ne_v(x, y, state),
            LoadI { nnn } => load_i(nnn, state),
            JumpOffset { nnn } => jump_offset(nnn, state),
            Rand { x, nn } => rnd(x, nn, rng.gen(), state),
            Draw { x, y, n } => draw(x, y, n, state),
            SkipKeyDown { x } => skip_key_down(x, state),
            SkipKeyUp { x } => skip_key_up(x, state),
            ReadDelay { x } => read_delay(x, state),
            WaitKey { x } => wait_key(x, state),
            WriteDelay { x } => write_delay(x, state),
            WriteSound { x } => write_sound(x, state),
            AddIndex { x } => add_index(x, state),
            LoadFont { x } => load_font(x, state),
            StoreBcd { x } => store_bcd(x, state),
            StoreRegs { x } => store_regs(x, state),
            LoadRegs { x } => load_regs(x, state),
        }
    }
}

/// Assembler-style mnemonics, e.g. `DRW V1, V2, 5`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {:03X}", nnn),
            Call { nnn } => write!(f, "CALL {:03X}", nnn),
            SkipEqN { x, nn } => write!(f, "SE V{:X}, {:02X}", x, nn),
            SkipNeN { x, nn } => write!(f, "SNE V{:X}, {:02X}", x, nn),
            SkipEqV { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadN { x, nn } => write!(f, "LD V{:X}, {:02X}", x, nn),
            AddN { x, nn } => write!(f, "ADD V{:X}, {:02X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddC { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            SubB { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x } => write!(f, "SHR V{:X}", x),
            SubBRev { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x } => write!(f, "SHL V{:X}", x),
            SkipNeV { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { nnn } => write!(f, "LD I, {:03X}", nnn),
            JumpOffset { nnn } => write!(f, "JP V0, {:03X}", nnn),
            Rand { x, nn } => write!(f, "RND V{:X}, {:02X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            WriteDelay { x } => write!(f, "LD DT, V{:X}", x),
            WriteSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
