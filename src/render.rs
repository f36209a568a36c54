use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    bus::AddressSpace,
    font::Font,
    hexdump::hexdump,
    video::{DisplayAdapter, DisplayLayout, FrameBuffer, Mode, VideoPorts},
};

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[clap(long)]
    #[clap(help = "Raw 8x8 font table with 128 or 256 glyphs")]
    #[clap(long_help = "Raw 8x8 font table with 128 or 256 glyphs, one byte per
glyph row with bit 0 as the leftmost pixel. Defaults to the
built-in font8x8 basic table.")]
    pub font: Option<PathBuf>,
    #[clap(long)]
    #[clap(help = "Text shown on the terminal, one line per row")]
    pub text: PathBuf,
    #[clap(short, long, default_value_t = 32)]
    #[clap(help = "Terminal columns")]
    pub columns: usize,
    #[clap(short, long, default_value_t = 32)]
    #[clap(help = "Terminal rows")]
    pub rows: usize,
    #[clap(short, long)]
    #[clap(help = "Write the rendered frame as raw little-endian 16-bit pixels")]
    pub output: Option<PathBuf>,
    #[clap(long)]
    #[clap(help = "Print the rendered frame as ASCII art")]
    pub ascii: bool,
    #[clap(long)]
    #[clap(help = "Hexdump the text buffer as seen on the bus")]
    pub dump_text: bool,
}

/// Writes `text` into the terminal through the bus, clipping lines to the
/// terminal size.
fn write_text(bus: &mut AddressSpace, layout: &DisplayLayout, text: &[u8]) -> Result<()> {
    for (row, line) in text.split(|&b| b == b'\n').take(layout.rows).enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let line = &line[..line.len().min(layout.columns)];
        let start = layout.text_start + (row * layout.columns) as u32;
        bus.load(start, line)
            .with_context(|| format!("Failed to write row {row}"))?;
    }
    Ok(())
}

fn load_font(path: Option<&Path>) -> Result<Font> {
    let Some(path) = path else {
        return Ok(Font::basic());
    };
    let bytes =
        fs::read(path).with_context(|| format!("Unable to read font {}", path.display()))?;
    Ok(Font::from_bytes(&bytes)?)
}

/// Renders a text file through a display adapter.
pub fn render(args: &RenderArgs) -> Result<()> {
    let font = load_font(args.font.as_deref())?;
    let text = fs::read(&args.text)
        .with_context(|| format!("Unable to read text {}", args.text.display()))?;

    let layout = DisplayLayout::with_terminal(args.columns, args.rows);
    let mut bus = AddressSpace::default();
    let mut adapter = DisplayAdapter::new(&mut bus, layout, font);

    bus.put(layout.ports_start + VideoPorts::MODE_OFFSET, Mode::Text as u8)?;
    write_text(&mut bus, &layout, &text)?;

    let mut frame = FrameBuffer::new(layout.width(), layout.height());
    adapter
        .render(&mut frame)
        .with_context(|| "Rendering failed")?;

    if args.dump_text {
        let dump = hexdump(&mut bus, layout.text_start, layout.text_size(), layout.columns)?;
        println!("{}", dump);
    }
    if let Some(output) = &args.output {
        fs::write(output, frame.bytes())
            .with_context(|| format!("Unable to write {}", output.display()))?;
    }
    if args.ascii || args.output.is_none() {
        print!("{}", frame.to_ascii());
    }

    Ok(())
}
