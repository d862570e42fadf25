//! Decoding of a single instruction word.
//!
//! Every one of the 65536 possible words decodes to exactly one [Instruction]. Words whose secondary selector is not
//! assigned (classes 0x0, 0x8, 0xE and 0xF) decode to [Instruction::Unknown].

use crate::opcode::Opcode;

/// A decoded Chip8 instruction with its operands.
///
/// Register operands are indices 0 to 15, `kk` is an immediate byte, `addr` a 12-bit address and `n` a nibble count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    SkipEqImm { x: u8, kk: u8 },
    /// 4xkk
    SkipNeImm { x: u8, kk: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xkk
    LoadImm { x: u8, kk: u8 },
    /// 7xkk
    AddImm { x: u8, kk: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4, VF = carry.
    AddCarry { x: u8, y: u8 },
    /// 8xy5, VF = not borrow.
    SubBorrow { x: u8, y: u8 },
    /// 8xy6. `y` is kept from the bit pattern but is never rendered.
    ShiftRight { x: u8, y: u8 },
    /// 8xy7, Vx = Vy - Vx.
    SubReverse { x: u8, y: u8 },
    /// 8xyE. `y` is kept from the bit pattern but is never rendered.
    ShiftLeft { x: u8, y: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadIndex { addr: u16 },
    /// Bnnn
    JumpV0 { addr: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKey { x: u8 },
    /// ExA1
    SkipNotKey { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    LoadFont { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegs { x: u8 },
    /// Fx65
    LoadRegs { x: u8 },
    /// Any word not assigned by the decode table.
    Unknown(Opcode),
}

impl Instruction {
    /// Decodes the given opcode. Never fails.
    pub const fn decode(opcode: Opcode) -> Self {
        use Instruction::*;

        match opcode.class() {
            0x0 => match opcode.low() {
                0xE0 => ClearScreen,
                0xEE => Return,
                _ => Unknown(opcode),
            },
            0x1 => Jump { addr: opcode.nnn() },
            0x2 => Call { addr: opcode.nnn() },
            0x3 => { let (x, kk) = opcode.xkk(); SkipEqImm { x, kk } },
            0x4 => { let (x, kk) = opcode.xkk(); SkipNeImm { x, kk } },
            0x5 => { let (x, y) = opcode.xy(); SkipEqReg { x, y } },
            0x6 => { let (x, kk) = opcode.xkk(); LoadImm { x, kk } },
            0x7 => { let (x, kk) = opcode.xkk(); AddImm { x, kk } },
            0x8 => {
                let (x, y) = opcode.xy();
                match opcode.n() {
                    0x0 => Move { x, y },
                    0x1 => Or { x, y },
                    0x2 => And { x, y },
                    0x3 => Xor { x, y },
                    0x4 => AddCarry { x, y },
                    0x5 => SubBorrow { x, y },
                    0x6 => ShiftRight { x, y },
                    0x7 => SubReverse { x, y },
                    0xE => ShiftLeft { x, y },
                    _ => Unknown(opcode),
                }
            },
            0x9 => { let (x, y) = opcode.xy(); SkipNeReg { x, y } },
            0xA => LoadIndex { addr: opcode.nnn() },
            0xB => JumpV0 { addr: opcode.nnn() },
            0xC => { let (x, kk) = opcode.xkk(); Random { x, kk } },
            0xD => { let (x, y) = opcode.xy(); Draw { x, y, n: opcode.n() } },
            0xE => match opcode.low() {
                0x9E => SkipKey { x: opcode.x() },
                0xA1 => SkipNotKey { x: opcode.x() },
                _ => Unknown(opcode),
            },
            // class() is 4 bits wide, so this is 0xF.
            _ => {
                let x = opcode.x();
                match opcode.low() {
                    0x07 => LoadDelay { x },
                    0x0A => WaitKey { x },
                    0x15 => SetDelay { x },
                    0x18 => SetSound { x },
                    0x1E => AddIndex { x },
                    0x29 => LoadFont { x },
                    0x33 => StoreBcd { x },
                    0x55 => StoreRegs { x },
                    0x65 => LoadRegs { x },
                    _ => Unknown(opcode),
                }
            },
        }
    }

    pub const fn is_unknown(&self) -> bool {
        matches!(self, Instruction::Unknown(_))
    }
}

impl From<Opcode> for Instruction {
    fn from(opcode: Opcode) -> Self {
        Self::decode(opcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(word: u16) -> Instruction {
        Instruction::decode(Opcode(word))
    }

    #[test]
    fn class_0_selectors() {
        assert_eq!(decode(0x00E0), Instruction::ClearScreen);
        assert_eq!(decode(0x00EE), Instruction::Return);
        // 0nnn machine calls are not part of the table.
        assert_eq!(decode(0x0123), Instruction::Unknown(Opcode(0x0123)));
        // Only the low byte selects, the x nibble is ignored.
        assert_eq!(decode(0x05E0), Instruction::ClearScreen);
    }

    #[test]
    fn address_operands() {
        assert_eq!(decode(0x1234), Instruction::Jump { addr: 0x234 });
        assert_eq!(decode(0x2FFF), Instruction::Call { addr: 0xFFF });
        assert_eq!(decode(0xA000), Instruction::LoadIndex { addr: 0x000 });
        assert_eq!(decode(0xB3C0), Instruction::JumpV0 { addr: 0x3C0 });
    }

    #[test]
    fn class_8_family() {
        assert_eq!(decode(0x8AB0), Instruction::Move { x: 0xA, y: 0xB });
        assert_eq!(decode(0x8AB4), Instruction::AddCarry { x: 0xA, y: 0xB });
        assert_eq!(decode(0x8AB6), Instruction::ShiftRight { x: 0xA, y: 0xB });
        assert_eq!(decode(0x8AB7), Instruction::SubReverse { x: 0xA, y: 0xB });
        assert_eq!(decode(0x8ABE), Instruction::ShiftLeft { x: 0xA, y: 0xB });
        for n in [0x8, 0x9, 0xA, 0xB, 0xC, 0xD, 0xF] {
            let word = 0x8120 | n;
            assert!(decode(word).is_unknown(), "{word:04X}");
        }
    }

    #[test]
    fn skip_not_equal_registers_is_not_index_load() {
        assert_eq!(decode(0x9120), Instruction::SkipNeReg { x: 1, y: 2 });
    }

    #[test]
    fn class_e_and_f_selectors() {
        assert_eq!(decode(0xE39E), Instruction::SkipKey { x: 3 });
        assert_eq!(decode(0xE3A1), Instruction::SkipNotKey { x: 3 });
        assert!(decode(0xE300).is_unknown());
        assert_eq!(decode(0xF433), Instruction::StoreBcd { x: 4 });
        assert_eq!(decode(0xFA55), Instruction::StoreRegs { x: 0xA });
        assert_eq!(decode(0xF265), Instruction::LoadRegs { x: 2 });
        assert!(decode(0xF0FF).is_unknown());
    }

    #[test]
    fn draw_operands() {
        assert_eq!(decode(0xDAB5), Instruction::Draw { x: 0xA, y: 0xB, n: 5 });
    }
}
