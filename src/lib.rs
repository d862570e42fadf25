//! Chip8 disassembler.
//!
//! The core is [decode], a pure function from a buffer and an offset to a [Decoded] word. [Program] loads a ROM at
//! its base address and lists it, sequentially or over several threads.
//!
//! ```
//! use chip8_dasm::{Program, OddByte, Syntax};
//!
//! let program = Program::from_bytes(&[0x00, 0xE0, 0x12, 0x00], Program::DEFAULT_BASE, OddByte::Ignore).unwrap();
//! assert_eq!(program.listing(Syntax::Compat), ["0200 00 e0 CLS", "0202 12 00 JUMP #$200"]);
//! ```

mod error;
mod instruction;
mod opcode;
mod program;
mod syntax;

pub use error::{Error, Result};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::{Lines, OddByte, Program};
pub use syntax::Syntax;

use std::fmt;

/// A word decoded at a given offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decoded {
    pub offset: usize,
    pub opcode: Opcode,
    pub instruction: Instruction,
}

impl Decoded {
    /// Returns a displayable line `<offset> <high> <low> <mnemonic>` using the given syntax.
    pub const fn display(&self, syntax: Syntax) -> DecodedDisplay<'_> {
        DecodedDisplay {
            decoded: self,
            syntax,
        }
    }
}

/// Renders with [Syntax::Compat].
impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(Syntax::Compat), f)
    }
}

/// Helper returned by [Decoded::display].
#[derive(Clone, Copy, Debug)]
pub struct DecodedDisplay<'a> {
    decoded: &'a Decoded,
    syntax: Syntax,
}

impl fmt::Display for DecodedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Decoded { offset, opcode, instruction } = *self.decoded;
        write!(f, "{offset:04x} {:02x} {:02x} ", opcode.high(), opcode.low())?;
        self.syntax.write_mnemonic(f, opcode, instruction)
    }
}

/// Decodes the instruction word at `offset` in `buffer`.
///
/// # Panics
///
/// Panics if `offset + 1` is not a valid index of `buffer`. [Program::lines] never does that.
pub fn decode(buffer: &[u8], offset: usize) -> Decoded {
    let opcode = Opcode::from_bytes(buffer[offset], buffer[offset + 1]);

    Decoded {
        offset,
        opcode,
        instruction: Instruction::decode(opcode),
    }
}

/// Decodes the word at `offset` and renders it with [Syntax::Compat].
///
/// # Panics
///
/// Same as [decode].
pub fn disassemble(buffer: &[u8], offset: usize) -> String {
    decode(buffer, offset).to_string()
}
