use crate::font::Font;

use super::DisplayLayout;

pub const PIXEL_SET: u16 = u16::MAX;
pub const PIXEL_CLEAR: u16 = 0;

/// Expands every character cell of `text` into its 8x8 glyph in `pixels`.
///
/// `text` holds `rows * columns` codes row-major and `pixels` at least
/// `width * height` entries. Cell `(row, column)` covers pixel rows
/// `row * 8..row * 8 + 8` and pixel columns `column * 8..column * 8 + 8`.
#[tracing::instrument(skip_all)]
pub fn draw_terminal(text: &[u8], font: &Font, layout: &DisplayLayout, pixels: &mut [u16]) {
    const CELL: usize = DisplayLayout::CELL_SIZE;
    let width = layout.width();

    for row in 0..layout.rows {
        for column in 0..layout.columns {
            let glyph = font.glyph(text[row * layout.columns + column]);

            for (y, bits) in glyph.iter().enumerate() {
                let line = (row * CELL + y) * width + column * CELL;
                for x in 0..CELL {
                    pixels[line + x] = if bits & (1u8 << x) != 0 {
                        PIXEL_SET
                    } else {
                        PIXEL_CLEAR
                    };
                }
            }
        }
    }
}
