/// A raw 16-bit Chip8 instruction word, big-endian in memory.
///
/// Nibbles are named after the usual `0xCXYN` layout: `class` is the high nibble of the first byte,
/// `x` its low nibble, `y` the high nibble of the second byte and `n` its low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Builds the opcode from the two bytes as they are stored in memory.
    #[inline(always)]
    pub const fn from_bytes(high: u8, low: u8) -> Self {
        Self((high as u16) << 8 | low as u16)
    }

    #[inline(always)]
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline(always)]
    pub const fn low(self) -> u8 {
        self.0 as u8
    }

    /// Primary dispatch key (`n0`).
    #[inline(always)]
    pub const fn class(self) -> u8 {
        (self.0 >> 12) as u8
    }

    #[inline(always)]
    pub const fn x(self) -> u8 {
        (self.0 >> 8) as u8 & 0xF
    }

    #[inline(always)]
    pub const fn y(self) -> u8 {
        (self.0 >> 4) as u8 & 0xF
    }

    #[inline(always)]
    pub const fn xy(self) -> (u8, u8) {
        (self.x(), self.y())
    }

    #[inline(always)]
    pub const fn kk(self) -> u8 {
        self.low()
    }

    #[inline(always)]
    pub const fn xkk(self) -> (u8, u8) {
        (self.x(), self.kk())
    }

    #[inline(always)]
    pub const fn n(self) -> u8 {
        self.0 as u8 & 0xF
    }

    #[inline(always)]
    pub const fn nnn(self) -> u16 {
        self.0 & 0xFFF
    }
}

impl From<u16> for Opcode {
    fn from(opcode: u16) -> Self {
        Opcode(opcode)
    }
}

impl From<[u8; 2]> for Opcode {
    fn from([high, low]: [u8; 2]) -> Self {
        Opcode::from_bytes(high, low)
    }
}

impl std::fmt::UpperHex for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::UpperHex::fmt(&self.0, f)
    }
}

impl std::fmt::LowerHex for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibble_fields() {
        let op = Opcode::from_bytes(0xDA, 0xB5);
        assert_eq!(op.0, 0xDAB5);
        assert_eq!(op.class(), 0xD);
        assert_eq!(op.xy(), (0xA, 0xB));
        assert_eq!(op.n(), 0x5);
        assert_eq!(op.kk(), 0xB5);
        assert_eq!(op.nnn(), 0xAB5);
        assert_eq!((op.high(), op.low()), (0xDA, 0xB5));
    }

    #[test]
    fn hex_formatting() {
        let op = Opcode::from([0x0A, 0xBC]);
        assert_eq!(format!("{op:04X}"), "0ABC");
        assert_eq!(format!("{op:04x}"), "0abc");
    }
}
