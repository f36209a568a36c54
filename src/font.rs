use thiserror::Error;

/// An 8x8 monochrome glyph, one byte per row from top to bottom. Bit 0 of a
/// row is the leftmost pixel.
pub type Glyph = [u8; 8];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FontError {
    #[error("Font table must hold 128 or 256 glyphs of 8 bytes, got {0} bytes")]
    InvalidLength(usize),
}

/// Read-only glyph table covering every character code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    glyphs: Box<[Glyph; 256]>,
}

impl Default for Font {
    fn default() -> Self {
        Self::basic()
    }
}

impl Font {
    pub const GLYPH_SIZE: usize = 8;

    /// A font where every glyph is empty.
    pub fn blank() -> Self {
        Self {
            glyphs: Box::new([[0; 8]; 256]),
        }
    }

    /// The public domain font8x8 basic table: printable ASCII, with codes
    /// 0x80 and above left blank.
    pub fn basic() -> Self {
        let mut font = Self::blank();
        font.glyphs[..128].copy_from_slice(&font8x8::legacy::BASIC_LEGACY);
        font
    }

    /// Loads a raw glyph table. Half tables (ASCII only, 128 glyphs) are
    /// accepted and the upper half is left blank.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FontError> {
        if bytes.len() != 128 * Self::GLYPH_SIZE && bytes.len() != 256 * Self::GLYPH_SIZE {
            return Err(FontError::InvalidLength(bytes.len()));
        }

        let mut font = Self::blank();
        for (glyph, rows) in font.glyphs.iter_mut().zip(bytes.chunks_exact(Self::GLYPH_SIZE)) {
            glyph.copy_from_slice(rows);
        }
        Ok(font)
    }

    pub fn with_glyph(mut self, code: u8, glyph: Glyph) -> Self {
        self.set_glyph(code, glyph);
        self
    }

    pub fn set_glyph(&mut self, code: u8, glyph: Glyph) {
        self.glyphs[code as usize] = glyph;
    }

    pub fn glyph(&self, code: u8) -> &Glyph {
        &self.glyphs[code as usize]
    }
}
