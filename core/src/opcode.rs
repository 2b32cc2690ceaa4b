/// # Opcodes
///
/// Instruction words are 16 bits, stored big-endian as two consecutive bytes of memory.
/// An operation is selected by some combination of its nibbles:
/// - `(n, _, _, _)` the family; every word has one
/// - `(_, _, _, n)` the operation within the `0x5`, `0x8` and `0x9` families
/// - `(_, _, n, n)` the operation within the `0x0`, `0xE` and `0xF` families
///
/// Nibbles not used for selection carry the operands.
/// - `(_, n, n, n)` NNN, a 12-bit address
/// - `(_, _, n, n)` NN, an 8-bit constant
/// - `(_, _, _, n)` N, a 4-bit constant (sprite height)
/// - `(_, n, _, _)` X, the register Vx or the range V0..=Vx
/// - `(_, _, n, _)` Y, the register Vy
pub trait Opcode {
    /// The word's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[_X__]`
    fn x(&self) -> u8;

    /// `[__Y_]`
    fn y(&self) -> u8;

    /// `[___N]`
    fn n(&self) -> u8;

    /// `[__NN]`
    fn nn(&self) -> u8;

    /// `[_NNN]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Combines the two bytes at some address into an instruction word.
pub fn from_bytes(high: u8, low: u8) -> u16 {
    u16::from(high) << 8 | u16::from(low)
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_operand_fields() {
        let op: u16 = 0xD3E7;
        assert_eq!(op.x(), 0x3);
        assert_eq!(op.y(), 0xE);
        assert_eq!(op.n(), 0x7);
        assert_eq!(op.nn(), 0xE7);
        assert_eq!(op.nnn(), 0x3E7);
    }

    #[test]
    fn test_from_bytes_is_big_endian() {
        assert_eq!(from_bytes(0xAA, 0xBB), 0xAABB);
        assert_eq!(from_bytes(0x00, 0xE0), 0x00E0);
    }
}
