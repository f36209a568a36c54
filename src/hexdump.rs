use crate::bus::{AddressSpace, BusError};

/// Hexdump `len` bytes of `bus` starting at `start`, `stride` bytes per line.
///
/// Every byte is read through [`AddressSpace::get`], so mapped devices show
/// their own contents rather than the memory underneath them.
pub fn hexdump(
    bus: &mut AddressSpace,
    start: u32,
    len: usize,
    stride: usize,
) -> Result<String, BusError> {
    let stride = stride.max(1);
    let mut str = String::new();

    for ix in 0..len {
        let address = bus.offset_address(start, ix)?;
        if ix % stride == 0 {
            if ix != 0 {
                str.push('\n');
            }
            str.push_str(format!("{:08x}:", address).as_str());
        }
        str.push(' ');
        str.push_str(format!("{:02x}", bus.get(address)?).as_str());
    }

    Ok(str)
}
