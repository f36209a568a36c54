use pretty_assertions::assert_eq;

use vidbus::{
    bus::AddressSpace,
    font::Font,
    video::{DisplayAdapter, DisplayLayout, FrameBuffer, Mode, VideoPorts},
};

fn set_mode(bus: &mut AddressSpace, layout: &DisplayLayout, mode: Mode) {
    let address = layout.ports_start + VideoPorts::MODE_OFFSET;
    bus.put(address, mode as u8).unwrap();
}

#[test]
fn test_render_letter_on_small_terminal() {
    let layout = DisplayLayout::with_terminal(2, 2);
    let mut bus = AddressSpace::default();
    let mut adapter = DisplayAdapter::new(&mut bus, layout, Font::basic());

    bus.put(layout.text_start, b'A').unwrap();
    set_mode(&mut bus, &layout, Mode::Text);

    let mut frame = FrameBuffer::new(16, 16);
    adapter.render(&mut frame).unwrap();

    let expected = [
        "..##............",
        ".####...........",
        "##..##..........",
        "##..##..........",
        "######..........",
        "##..##..........",
        "##..##..........",
        "................",
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .chain(std::iter::repeat("................\n".to_string()).take(8))
    .collect::<String>();
    assert_eq!(frame.to_ascii(), expected);
    assert_eq!(frame.pixel(2, 0), Some(0xffff));
    assert_eq!(frame.pixel(0, 0), Some(0x0000));
}

#[test]
fn test_text_cells_follow_row_major_order() {
    let layout = DisplayLayout::with_terminal(2, 2);
    let mut bus = AddressSpace::default();
    let font = Font::blank().with_glyph(b'#', [0xff; 8]);
    let mut adapter = DisplayAdapter::new(&mut bus, layout, font);

    // Cell (1, 0) is the third byte of the text buffer
    bus.put(layout.text_start + 2, b'#').unwrap();

    let mut frame = FrameBuffer::new(16, 16);
    adapter.render(&mut frame).unwrap();

    assert_eq!(frame.pixel(0, 8), Some(0xffff));
    assert_eq!(frame.pixel(7, 15), Some(0xffff));
    assert_eq!(frame.pixel(8, 8), Some(0x0000));
    assert_eq!(frame.pixel(0, 7), Some(0x0000));
}

#[test]
fn test_pixel_mode_frame_from_bus() {
    let layout = DisplayLayout::with_terminal(1, 1);
    let mut bus = AddressSpace::default();
    let mut adapter = DisplayAdapter::new(&mut bus, layout, Font::blank());

    set_mode(&mut bus, &layout, Mode::Pixel);
    // Diagonal of lit pixels
    for i in 0..8u32 {
        let address = layout.pixels_start + (i * 8 + i) * 2;
        bus.load(address, &[0xff, 0xff]).unwrap();
    }

    let mut frame = FrameBuffer::new(8, 8);
    adapter.render(&mut frame).unwrap();

    for y in 0..8 {
        for x in 0..8 {
            let expected = if x == y { 0xffff } else { 0 };
            assert_eq!(frame.pixel(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_switching_back_to_text_mode_redraws() {
    let layout = DisplayLayout::with_terminal(1, 1);
    let mut bus = AddressSpace::default();
    let mut adapter = DisplayAdapter::new(&mut bus, layout, Font::blank());

    set_mode(&mut bus, &layout, Mode::Pixel);
    bus.load(layout.pixels_start, &[0xff; 128]).unwrap();
    set_mode(&mut bus, &layout, Mode::Text);

    let mut frame = FrameBuffer::new(8, 8);
    adapter.render(&mut frame).unwrap();
    assert!(frame.bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_adapter_behind_chained_address_space() {
    let layout = DisplayLayout::with_terminal(1, 1);
    let mut video_bus = AddressSpace::new(0);
    let font = Font::blank().with_glyph(b'x', [0x01; 8]);
    let mut adapter = DisplayAdapter::new(&mut video_bus, layout, font);

    let mut bus = AddressSpace::new(0x1_0000);
    bus.add_region(layout.ports_start, layout.pixels_end(), video_bus);

    bus.put(layout.text_start, b'x').unwrap();
    assert_eq!(bus.get(layout.text_start), Ok(b'x'));
    bus.put(0x1234, 0x56).unwrap();
    assert_eq!(bus.get(0x1234), Ok(0x56));

    let mut frame = FrameBuffer::new(8, 8);
    adapter.render(&mut frame).unwrap();
    assert_eq!(frame.to_ascii(), "#.......\n".repeat(8));
}
