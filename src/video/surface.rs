use super::VideoError;

/// A host-side render target that accepts one frame of 16-bit pixels.
pub trait Surface {
    /// Locks the surface for writing, returning the destination bytes and
    /// the pitch (bytes per row).
    fn lock(&mut self) -> Result<(&mut [u8], usize), VideoError>;
    fn unlock(&mut self);
}

/// Copies `pixels` into `surface` between a lock and an unlock. The surface
/// is unlocked whether or not the copy succeeds.
pub(crate) fn present(
    surface: &mut dyn Surface,
    pixels: &[u16],
    width: usize,
) -> Result<(), VideoError> {
    let (dest, pitch) = surface.lock()?;
    let result = copy_frame(dest, pitch, pixels, width);
    surface.unlock();
    result
}

fn copy_frame(dest: &mut [u8], pitch: usize, pixels: &[u16], width: usize) -> Result<(), VideoError> {
    if width == 0 {
        return Ok(());
    }

    let row_bytes = width * 2;
    if pitch < row_bytes {
        return Err(VideoError::PitchTooSmall { pitch, row_bytes });
    }
    let rows = pixels.len() / width;
    let needed = match rows {
        0 => 0,
        rows => pitch * (rows - 1) + row_bytes,
    };
    if dest.len() < needed {
        return Err(VideoError::SurfaceTooSmall {
            needed,
            available: dest.len(),
        });
    }

    for (row, line) in pixels.chunks_exact(width).enumerate() {
        let start = row * pitch;
        let out = &mut dest[start..start + row_bytes];
        for (bytes, pixel) in out.chunks_exact_mut(2).zip(line) {
            bytes.copy_from_slice(&pixel.to_le_bytes());
        }
    }
    Ok(())
}

/// An in-memory surface of little-endian 16-bit pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
    width: usize,
    height: usize,
    pitch: usize,
    locked: bool,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_pitch(width, height, width * 2)
    }

    /// A frame buffer whose rows are `pitch` bytes apart.
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Self {
        Self {
            bytes: vec![0; pitch * height],
            width,
            height,
            pitch,
            locked: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y * self.pitch + x * 2;
        let bytes = self.bytes.get(offset..offset + 2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Renders the frame as text, `#` for lit pixels and `.` for dark ones.
    pub fn to_ascii(&self) -> String {
        let mut str = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                str.push(match self.pixel(x, y) {
                    Some(0) | None => '.',
                    Some(_) => '#',
                });
            }
            str.push('\n');
        }
        str
    }
}

impl Surface for FrameBuffer {
    fn lock(&mut self) -> Result<(&mut [u8], usize), VideoError> {
        if self.locked {
            return Err(VideoError::Surface("frame buffer is already locked".into()));
        }
        self.locked = true;
        Ok((self.bytes.as_mut_slice(), self.pitch))
    }

    fn unlock(&mut self) {
        self.locked = false;
    }
}
