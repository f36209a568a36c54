use super::VideoPorts;

/// Terminal geometry and the bus addresses of the adapter's three regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLayout {
    pub columns: usize,
    pub rows: usize,
    pub ports_start: u32,
    pub text_start: u32,
    pub pixels_start: u32,
}

impl Default for DisplayLayout {
    fn default() -> Self {
        Self {
            columns: 32,
            rows: 32,
            ports_start: 0x0001_0000,
            text_start: 0x0001_0100,
            pixels_start: 0x0002_0000,
        }
    }
}

impl DisplayLayout {
    /// Glyph cells are 8x8 pixels.
    pub const CELL_SIZE: usize = 8;
    /// Bytes visible through the pixel window at once.
    pub const BANK_SIZE: u32 = 0x1_0000;

    /// Default region addresses with a custom terminal size.
    pub fn with_terminal(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            ..Default::default()
        }
    }

    pub fn width(&self) -> usize {
        self.columns * Self::CELL_SIZE
    }

    pub fn height(&self) -> usize {
        self.rows * Self::CELL_SIZE
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn text_size(&self) -> usize {
        self.columns * self.rows
    }

    /// Last address of the ports region. Like the other region ends it clamps
    /// at `u32::MAX` instead of wrapping around.
    pub fn ports_end(&self) -> u32 {
        self.ports_start.saturating_add(VideoPorts::SIZE - 1)
    }

    pub fn text_end(&self) -> u32 {
        let size = u32::try_from(self.text_size()).unwrap_or(u32::MAX);
        self.text_start.saturating_add(size.saturating_sub(1))
    }

    pub fn pixels_end(&self) -> u32 {
        self.pixels_start.saturating_add(Self::BANK_SIZE - 1)
    }
}
