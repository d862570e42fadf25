//! Text rendering of decoded instructions.

use crate::instruction::Instruction;
use crate::opcode::Opcode;

use std::fmt::{self, Write};

use clap::ValueEnum;

/// Selects the mnemonic templates used to render instructions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Syntax {
    /// Reproduces the historical disassembler output: lowercase registers, unpadded address high nibble, two-digit
    /// immediates, `RAND` without comma, and the key-skip register taken from the low nibble of the word.
    #[default]
    Compat,
    /// Consistent operand padding and separators, uppercase registers, and the real `x` register for `Ex9E`/`ExA1`.
    /// Unknown words render as a `DW` data directive.
    Normalized,
}

impl Syntax {
    /// Returns the other syntax.
    pub const fn toggled(self) -> Self {
        match self {
            Syntax::Compat => Syntax::Normalized,
            Syntax::Normalized => Syntax::Compat,
        }
    }

    /// Writes the mnemonic and operands of `inst`, decoded from `opcode`.
    pub fn write_mnemonic<W: Write>(self, w: &mut W, opcode: Opcode, inst: Instruction) -> fmt::Result {
        match self {
            Syntax::Compat => write_compat(w, opcode, inst),
            Syntax::Normalized => write_normalized(w, inst),
        }
    }

    /// Returns the mnemonic and operands of `inst` as a new string.
    pub fn mnemonic(self, opcode: Opcode, inst: Instruction) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_mnemonic(&mut s, opcode, inst);
        s
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => Ok(()),
        }
    }
}

fn write_compat<W: Write>(w: &mut W, opcode: Opcode, inst: Instruction) -> fmt::Result {
    use Instruction::*;

    match inst {
        ClearScreen => w.write_str("CLS"),
        Return => w.write_str("RTS"),
        Jump { addr } => write!(w, "JUMP #${:x}{:02x}", addr >> 8, addr & 0xFF),
        Call { addr } => write!(w, "CALL #${:x}{:02x}", addr >> 8, addr & 0xFF),
        SkipEqImm { x, kk } => write!(w, "SKIP.EQ V{x:x}, #${kk:02x}"),
        SkipNeImm { x, kk } => write!(w, "SKIP.NQ V{x:x}, #${kk:02x}"),
        SkipEqReg { x, y } => write!(w, "SKIP.EQ V{x:x}, V{y:x}"),
        LoadImm { x, kk } => write!(w, "MVI V{x:x},#${kk:02x}"),
        AddImm { x, kk } => write!(w, "ADD V{x:x},#${kk:02x}"),
        Move { x, y } => write!(w, "MOV V{x:x}, V{y:x}"),
        Or { x, y } => write!(w, "OR V{x:x}, V{y:x}"),
        And { x, y } => write!(w, "AND V{x:x}, V{y:x}"),
        Xor { x, y } => write!(w, "XOR V{x:x}, V{y:x}"),
        AddCarry { x, y } => write!(w, "ADD. V{x:x}, V{y:x}"),
        SubBorrow { x, y } => write!(w, "SUB. V{x:x}, V{y:x}"),
        ShiftRight { x, .. } => write!(w, "SHR. V{x:x}"),
        SubReverse { x, y } => write!(w, "SUBB. V{x:x}, V{y:x}"),
        ShiftLeft { x, .. } => write!(w, "SHL. V{x:x}"),
        SkipNeReg { x, y } => write!(w, "SKIP.NQ V{x:x}, V{y:x}"),
        LoadIndex { addr } => write!(w, "MVI I,#${:x}{:02x}", addr >> 8, addr & 0xFF),
        JumpV0 { addr } => write!(w, "JUMP ${:x}{:02x}(V0)", addr >> 8, addr & 0xFF),
        Random { x, kk } => write!(w, "RAND V{x:x} #${kk:02x}"),
        Draw { x, y, n } => write!(w, "SPRITE V{x:x} V{y:x}, #${n:x}"),
        // The historical output reads the register from the selector byte.
        SkipKey { .. } => write!(w, "SKIP.KEY V{:x}", opcode.n()),
        SkipNotKey { .. } => write!(w, "SKIP.NOKEY V{:x}", opcode.n()),
        LoadDelay { x } => write!(w, "MOV V{x:x}, DELAY"),
        WaitKey { x } => write!(w, "WAITKEY V{x:x}"),
        SetDelay { x } => write!(w, "MOV DELAY, V{x:x}"),
        SetSound { x } => write!(w, "MOV SOUND, V{x:x}"),
        AddIndex { x } => write!(w, "ADD I, V{x:x}"),
        LoadFont { x } => write!(w, "SPRITECHAR V{x:x}"),
        StoreBcd { x } => write!(w, "MOVBCD V{x:x}"),
        StoreRegs { x } => write!(w, "MOVM (I), V0-V{x:x}"),
        LoadRegs { x } => write!(w, "MOVM V0-V{x:x}, (I)"),
        Unknown(_) => w.write_str("UNKNOWN"),
    }
}

fn write_normalized<W: Write>(w: &mut W, inst: Instruction) -> fmt::Result {
    use Instruction::*;

    match inst {
        ClearScreen => w.write_str("CLS"),
        Return => w.write_str("RTS"),
        Jump { addr } => write!(w, "JUMP #${addr:03x}"),
        Call { addr } => write!(w, "CALL #${addr:03x}"),
        SkipEqImm { x, kk } => write!(w, "SKIP.EQ V{x:X}, #${kk:02x}"),
        SkipNeImm { x, kk } => write!(w, "SKIP.NQ V{x:X}, #${kk:02x}"),
        SkipEqReg { x, y } => write!(w, "SKIP.EQ V{x:X}, V{y:X}"),
        LoadImm { x, kk } => write!(w, "MVI V{x:X}, #${kk:02x}"),
        AddImm { x, kk } => write!(w, "ADD V{x:X}, #${kk:02x}"),
        Move { x, y } => write!(w, "MOV V{x:X}, V{y:X}"),
        Or { x, y } => write!(w, "OR V{x:X}, V{y:X}"),
        And { x, y } => write!(w, "AND V{x:X}, V{y:X}"),
        Xor { x, y } => write!(w, "XOR V{x:X}, V{y:X}"),
        AddCarry { x, y } => write!(w, "ADD. V{x:X}, V{y:X}"),
        SubBorrow { x, y } => write!(w, "SUB. V{x:X}, V{y:X}"),
        ShiftRight { x, .. } => write!(w, "SHR. V{x:X}"),
        SubReverse { x, y } => write!(w, "SUBB. V{x:X}, V{y:X}"),
        ShiftLeft { x, .. } => write!(w, "SHL. V{x:X}"),
        SkipNeReg { x, y } => write!(w, "SKIP.NQ V{x:X}, V{y:X}"),
        LoadIndex { addr } => write!(w, "MVI I, #${addr:03x}"),
        JumpV0 { addr } => write!(w, "JUMP ${addr:03x}(V0)"),
        Random { x, kk } => write!(w, "RAND V{x:X}, #${kk:02x}"),
        Draw { x, y, n } => write!(w, "SPRITE V{x:X}, V{y:X}, #${n:x}"),
        SkipKey { x } => write!(w, "SKIP.KEY V{x:X}"),
        SkipNotKey { x } => write!(w, "SKIP.NOKEY V{x:X}"),
        LoadDelay { x } => write!(w, "MOV V{x:X}, DELAY"),
        WaitKey { x } => write!(w, "WAITKEY V{x:X}"),
        SetDelay { x } => write!(w, "MOV DELAY, V{x:X}"),
        SetSound { x } => write!(w, "MOV SOUND, V{x:X}"),
        AddIndex { x } => write!(w, "ADD I, V{x:X}"),
        LoadFont { x } => write!(w, "SPRITECHAR V{x:X}"),
        StoreBcd { x } => write!(w, "MOVBCD V{x:X}"),
        StoreRegs { x } => write!(w, "MOVM (I), V0-V{x:X}"),
        LoadRegs { x } => write!(w, "MOVM V0-V{x:X}, (I)"),
        Unknown(opcode) => write!(w, "DW #${:04x}", opcode.0),
    }
}
