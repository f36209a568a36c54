/// Rendering mode selected through the mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Characters from the text buffer are rasterized with the font.
    Text = 0,
    /// The pixel buffer is presented as written.
    Pixel = 1,
}

impl TryFrom<u8> for Mode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Text),
            1 => Ok(Mode::Pixel),
            other => Err(other),
        }
    }
}

/// The adapter's control register block.
///
/// Byte layout as seen on the bus:
///
/// | Offset | Field                    |
/// |--------|--------------------------|
/// | 0      | `mode` (u8)              |
/// | 1..=3  | padding, reads as zero   |
/// | 4..=7  | `bank` (u32, little-endian) |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VideoPorts {
    pub mode: u8,
    pub bank: u32,
}

impl VideoPorts {
    pub const SIZE: u32 = 8;
    pub const MODE_OFFSET: u32 = 0;
    pub const BANK_OFFSET: u32 = 4;

    /// Decoded mode, `None` for values other than 0 and 1.
    pub fn mode(&self) -> Option<Mode> {
        Mode::try_from(self.mode).ok()
    }

    /// Reads the byte at `offset` into the block.
    pub fn read(&self, offset: u32) -> Option<u8> {
        match offset {
            Self::MODE_OFFSET => Some(self.mode),
            1..=3 => Some(0),
            4..=7 => Some(self.bank.to_le_bytes()[(offset - Self::BANK_OFFSET) as usize]),
            _ => None,
        }
    }

    /// Writes the byte at `offset` into the block. Returns false if the
    /// offset is past the end of the block.
    pub fn write(&mut self, offset: u32, value: u8) -> bool {
        match offset {
            Self::MODE_OFFSET => self.mode = value,
            1..=3 => {}
            4..=7 => {
                let mut bytes = self.bank.to_le_bytes();
                bytes[(offset - Self::BANK_OFFSET) as usize] = value;
                self.bank = u32::from_le_bytes(bytes);
            }
            _ => return false,
        }
        true
    }
}
