mod layout;
mod ports;
/// Glyph rasterization for text mode.
pub mod raster;
mod surface;

pub use layout::DisplayLayout;
pub use ports::{Mode, VideoPorts};
pub use surface::{FrameBuffer, Surface};

use std::{cell::RefCell, rc::Rc};

use thiserror::Error;

use crate::{
    bus::{Access, AddressSpace, BusError, Device, RegionHandle},
    font::Font,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VideoError {
    #[error("Failed to lock surface: {0}")]
    Surface(String),
    #[error("Surface too small: needed {needed} bytes, got {available}")]
    SurfaceTooSmall { needed: usize, available: usize },
    #[error("Surface pitch {pitch} is smaller than a row of {row_bytes} bytes")]
    PitchTooSmall { pitch: usize, row_bytes: usize },
}

/// Storage shared between the adapter and its three bus regions.
#[derive(Debug)]
struct VideoState {
    ports: VideoPorts,
    text: Vec<u8>,
    /// `width * height` pixels, addressed byte-wise little-endian on the bus.
    pixels: Vec<u16>,
}

type SharedState = Rc<RefCell<VideoState>>;

fn out_of_range(address: u32, size: usize) -> BusError {
    tracing::warn!(address, size, "video access out of range");
    BusError::OutOfRange { address, size }
}

struct PortsDevice {
    state: SharedState,
    start: u32,
}

impl Device for PortsDevice {
    fn access(&mut self, address: u32, data: &mut u8, access: Access) -> Result<(), BusError> {
        let offset = address - self.start;
        let mut state = self.state.borrow_mut();
        let ports = &mut state.ports;

        let in_range = match access {
            Access::Read => match ports.read(offset) {
                Some(value) => {
                    *data = value;
                    true
                }
                None => false,
            },
            Access::Write => {
                let previous = ports.mode;
                let written = ports.write(offset, *data);
                if ports.mode != previous {
                    tracing::debug!(mode = ports.mode, "video mode changed");
                }
                written
            }
        };
        if !in_range {
            return Err(out_of_range(address, VideoPorts::SIZE as usize));
        }
        Ok(())
    }
}

struct TextDevice {
    state: SharedState,
    start: u32,
}

impl Device for TextDevice {
    fn access(&mut self, address: u32, data: &mut u8, access: Access) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        let size = state.text.len();
        let cell = state
            .text
            .get_mut((address - self.start) as usize)
            .ok_or_else(|| out_of_range(address, size))?;

        match access {
            Access::Read => *data = *cell,
            Access::Write => *cell = *data,
        }
        Ok(())
    }
}

struct PixelDevice {
    state: SharedState,
    start: u32,
}

impl Device for PixelDevice {
    fn access(&mut self, address: u32, data: &mut u8, access: Access) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        if state.ports.mode() != Some(Mode::Pixel) {
            // The pixel window is disconnected outside of pixel mode
            if access == Access::Read {
                *data = 0;
            }
            return Ok(());
        }

        let index = u64::from(address - self.start) + (u64::from(state.ports.bank) << 16);
        let size = state.pixels.len() * 2;
        let pixel = match usize::try_from(index / 2) {
            Ok(i) if i < state.pixels.len() => &mut state.pixels[i],
            _ => return Err(out_of_range(address, size)),
        };

        let mut bytes = pixel.to_le_bytes();
        let byte = (index % 2) as usize;
        match access {
            Access::Read => *data = bytes[byte],
            Access::Write => {
                bytes[byte] = *data;
                *pixel = u16::from_le_bytes(bytes);
            }
        }
        Ok(())
    }
}

/// A display adapter with a text mode and a banked pixel mode.
///
/// The adapter maps three regions onto the bus when it is created:
/// - the control ports ([`VideoPorts`]),
/// - the text buffer, one character code per cell, row-major,
/// - a 64 KiB window into the pixel buffer, selected by the bank register.
///
/// Pixel window accesses only reach the pixel buffer in [`Mode::Pixel`].
#[derive(Debug)]
pub struct DisplayAdapter {
    layout: DisplayLayout,
    font: Font,
    state: SharedState,
    handles: [RegionHandle; 3],
}

impl DisplayAdapter {
    #[tracing::instrument(skip(bus, font))]
    pub fn new(bus: &mut AddressSpace, layout: DisplayLayout, font: Font) -> Self {
        let state = Rc::new(RefCell::new(VideoState {
            ports: VideoPorts::default(),
            text: vec![0; layout.text_size()],
            pixels: vec![0; layout.pixel_count()],
        }));

        let ports = bus.add_region(
            layout.ports_start,
            layout.ports_end(),
            PortsDevice {
                state: state.clone(),
                start: layout.ports_start,
            },
        );
        let text = bus.add_region(
            layout.text_start,
            layout.text_end(),
            TextDevice {
                state: state.clone(),
                start: layout.text_start,
            },
        );
        let pixels = bus.add_region(
            layout.pixels_start,
            layout.pixels_end(),
            PixelDevice {
                state: state.clone(),
                start: layout.pixels_start,
            },
        );

        Self {
            layout,
            font,
            state,
            handles: [ports, text, pixels],
        }
    }

    pub fn layout(&self) -> &DisplayLayout {
        &self.layout
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Handles of the ports, text and pixel regions, in that order.
    pub fn handles(&self) -> [RegionHandle; 3] {
        self.handles
    }

    pub fn ports(&self) -> VideoPorts {
        self.state.borrow().ports
    }

    pub fn mode(&self) -> Option<Mode> {
        self.state.borrow().ports.mode()
    }

    /// Snapshot of the text buffer.
    pub fn text(&self) -> Vec<u8> {
        self.state.borrow().text.clone()
    }

    /// Snapshot of the whole pixel buffer, both banks.
    pub fn pixels(&self) -> Vec<u16> {
        self.state.borrow().pixels.clone()
    }

    /// Produces one frame. In text mode the text buffer is rasterized into the
    /// pixel buffer first; in every mode the pixel buffer is then copied to
    /// `surface`.
    #[tracing::instrument(skip_all)]
    pub fn render(&mut self, surface: &mut dyn Surface) -> Result<(), VideoError> {
        let mut state = self.state.borrow_mut();
        let VideoState {
            ports,
            text,
            pixels,
        } = &mut *state;

        if ports.mode() == Some(Mode::Text) {
            raster::draw_terminal(text, &self.font, &self.layout, pixels);
        }
        surface::present(surface, pixels, self.layout.width())
    }

    /// Unregisters the adapter's regions from `bus`.
    #[tracing::instrument(skip_all)]
    pub fn detach(self, bus: &mut AddressSpace) {
        for handle in self.handles {
            bus.remove_region(handle);
        }
    }
}
