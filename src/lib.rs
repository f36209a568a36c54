/// Byte-addressable memory with memory-mapped device regions.
///
/// Every access goes through [`bus::AddressSpace::access`]:
/// 1. **Decoding** - the registered regions are scanned in registration order
/// 2. **Dispatch** - the first region containing the address handles the whole access
/// 3. **Fallback** - unclaimed addresses read and write plain memory
pub mod bus;

/// 8x8 monochrome glyph tables
pub mod font;

/// Hexdump utility
pub mod hexdump;

/// Command line rendering through the display adapter
pub mod render;

/// Display adapter with text and banked pixel modes
pub mod video;
