mod region;

pub use region::{Region, RegionHandle};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("Address out of range: {address:#010x} (size {size:#x})")]
    OutOfRange { address: u32, size: usize },
}

/// Direction of a single bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The device writes the byte at the address into the data slot.
    Read,
    /// The device stores the byte in the data slot at the address.
    Write,
}

/// A memory-mapped device.
///
/// A device registered as a region receives every access whose address falls
/// inside that region, with the absolute address as seen on the bus.
pub trait Device {
    fn access(&mut self, address: u32, data: &mut u8, access: Access) -> Result<(), BusError>;
}

impl<F> Device for F
where
    F: FnMut(u32, &mut u8, Access) -> Result<(), BusError>,
{
    fn access(&mut self, address: u32, data: &mut u8, access: Access) -> Result<(), BusError> {
        self(address, data, access)
    }
}

/// Byte-addressable memory with memory-mapped device regions.
///
/// Regions are searched in registration order and the first region containing
/// the address owns the whole access. Regions may overlap, so a broad region
/// registered early shadows any narrower one registered after it. Addresses
/// not claimed by any region read and write the backing buffer.
#[derive(Debug)]
pub struct AddressSpace {
    buffer: Vec<u8>,
    regions: Vec<Region>,
    next_handle: u64,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl AddressSpace {
    pub const DEFAULT_SIZE: usize = 0x3_0000;

    #[tracing::instrument]
    pub fn new(size: usize) -> Self {
        Self {
            buffer: vec![0; size],
            regions: Vec::new(),
            next_handle: 0,
        }
    }

    /// Size of the backing buffer in bytes.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Number of currently registered regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn get(&mut self, address: u32) -> Result<u8, BusError> {
        let mut data = 0;
        self.access(address, &mut data, Access::Read)?;
        Ok(data)
    }

    pub fn put(&mut self, address: u32, data: u8) -> Result<(), BusError> {
        let mut data = data;
        self.access(address, &mut data, Access::Write)
    }

    /// Routes a single access either to the first matching region or to the
    /// backing buffer.
    pub fn access(&mut self, address: u32, data: &mut u8, access: Access) -> Result<(), BusError> {
        if let Some(region) = self.regions.iter_mut().find(|r| r.contains(address)) {
            return region.access(address, data, access);
        }

        let size = self.buffer.len();
        let Some(cell) = self.buffer.get_mut(address as usize) else {
            tracing::warn!(address, size, "unmapped access past end of memory");
            return Err(BusError::OutOfRange { address, size });
        };
        match access {
            Access::Read => *data = *cell,
            Access::Write => *cell = *data,
        }
        Ok(())
    }

    /// Writes `data` starting at `start_address`, going through any mapped
    /// devices on the way. Stops with an error instead of wrapping past the
    /// top of the address space.
    pub fn load(&mut self, start_address: u32, data: &[u8]) -> Result<(), BusError> {
        for (offset, byte) in data.iter().enumerate() {
            let address = self.offset_address(start_address, offset)?;
            self.put(address, *byte)?;
        }
        Ok(())
    }

    /// `start + offset`, or `OutOfRange` if that lies beyond `u32::MAX`.
    pub fn offset_address(&self, start: u32, offset: usize) -> Result<u32, BusError> {
        u32::try_from(offset)
            .ok()
            .and_then(|offset| start.checked_add(offset))
            .ok_or(BusError::OutOfRange {
                address: u32::MAX,
                size: self.buffer.len(),
            })
    }

    /// Registers `device` for the inclusive range `start..=end`.
    #[tracing::instrument(skip(self, device))]
    pub fn add_region(
        &mut self,
        start: u32,
        end: u32,
        device: impl Device + 'static,
    ) -> RegionHandle {
        let handle = RegionHandle::new(self.next_handle);
        self.next_handle += 1;
        self.regions.push(Region::new(handle, start, end, Box::new(device)));
        tracing::debug!(?handle, "region added");
        handle
    }

    /// Unregisters the region behind `handle` and hands its device back.
    /// Unknown or already removed handles leave the registry untouched.
    #[tracing::instrument(skip(self))]
    pub fn remove_region(&mut self, handle: RegionHandle) -> Option<Box<dyn Device>> {
        let index = self.regions.iter().position(|r| r.handle() == handle)?;
        tracing::debug!(?handle, "region removed");
        Some(self.regions.remove(index).into_device())
    }
}

impl Device for AddressSpace {
    fn access(&mut self, address: u32, data: &mut u8, access: Access) -> Result<(), BusError> {
        AddressSpace::access(self, address, data, access)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    /// Device that counts its calls and answers reads with `value`.
    fn counting(value: u8, calls: Rc<Cell<usize>>) -> impl Device {
        move |_address: u32, data: &mut u8, access: Access| -> Result<(), BusError> {
            calls.set(calls.get() + 1);
            if access == Access::Read {
                *data = value;
            }
            Ok(())
        }
    }

    #[test]
    fn test_plain_memory() {
        let mut bus = AddressSpace::new(0x100);
        bus.put(0x10, 0xab).unwrap();
        bus.put(0xff, 0x01).unwrap();
        assert_eq!(bus.get(0x10), Ok(0xab));
        assert_eq!(bus.get(0xff), Ok(0x01));
        assert_eq!(bus.get(0x11), Ok(0x00));
    }

    #[test]
    fn test_out_of_range() {
        let mut bus = AddressSpace::new(0x100);
        assert_eq!(
            bus.get(0x100),
            Err(BusError::OutOfRange {
                address: 0x100,
                size: 0x100
            })
        );
        assert!(bus.put(0xffff_ffff, 1).is_err());
    }

    #[test]
    fn test_region_intercepts_access() {
        let calls = Rc::new(Cell::new(0));
        let mut bus = AddressSpace::new(0x100);
        bus.add_region(0x20, 0x2f, counting(0x55, calls.clone()));

        bus.put(0x20, 0x99).unwrap();
        bus.put(0x2f, 0x99).unwrap();
        assert_eq!(bus.get(0x25), Ok(0x55));
        assert_eq!(calls.get(), 3);

        // The backing buffer under the region is never touched
        bus.remove_region(RegionHandle::new(0));
        assert_eq!(bus.get(0x20), Ok(0x00));
        assert_eq!(bus.get(0x2f), Ok(0x00));
    }

    #[test]
    fn test_region_boundaries() {
        let calls = Rc::new(Cell::new(0));
        let mut bus = AddressSpace::new(0x100);
        bus.add_region(0x20, 0x2f, counting(0x55, calls.clone()));

        bus.put(0x1f, 0x11).unwrap();
        bus.put(0x30, 0x22).unwrap();
        assert_eq!(bus.get(0x1f), Ok(0x11));
        assert_eq!(bus.get(0x30), Ok(0x22));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_region_past_end_of_memory() {
        let mut bus = AddressSpace::new(0x10);
        let fixed = |_: u32, data: &mut u8, _: Access| -> Result<(), BusError> {
            *data = 0x42;
            Ok(())
        };
        bus.add_region(0x1000, 0x1fff, fixed);
        assert_eq!(bus.get(0x1800), Ok(0x42));
    }

    #[test]
    fn test_first_registered_region_wins() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut bus = AddressSpace::new(0x100);
        bus.add_region(0x00, 0x7f, counting(1, first.clone()));
        bus.add_region(0x40, 0x4f, counting(2, second.clone()));

        assert_eq!(bus.get(0x44), Ok(1));
        bus.put(0x48, 0).unwrap();
        assert_eq!(first.get(), 2);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_remove_region() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut bus = AddressSpace::new(0x100);
        let broad = bus.add_region(0x00, 0x7f, counting(1, first.clone()));
        let narrow = bus.add_region(0x40, 0x4f, counting(2, second.clone()));
        assert_ne!(broad, narrow);

        assert!(bus.remove_region(broad).is_some());
        assert_eq!(bus.region_count(), 1);
        assert_eq!(bus.get(0x44), Ok(2));
        assert_eq!(bus.get(0x10), Ok(0));
    }

    #[test]
    fn test_remove_unknown_region_is_noop() {
        let calls = Rc::new(Cell::new(0));
        let mut bus = AddressSpace::new(0x100);
        let handle = bus.add_region(0x00, 0x0f, counting(7, calls.clone()));

        assert!(bus.remove_region(handle).is_some());
        assert!(bus.remove_region(handle).is_none());
        assert!(bus.remove_region(RegionHandle::new(1234)).is_none());
        assert_eq!(bus.region_count(), 0);

        // Handles are never reused
        let again = bus.add_region(0x00, 0x0f, counting(7, calls.clone()));
        assert_ne!(again, handle);
        assert!(bus.remove_region(handle).is_none());
        assert_eq!(bus.get(0x00), Ok(7));
    }

    #[test]
    fn test_chained_address_space() {
        let mut inner = AddressSpace::new(0x200);
        inner.put(0x180, 0x5a).unwrap();

        let mut outer = AddressSpace::new(0x100);
        outer.add_region(0x100, 0x1ff, inner);

        assert_eq!(outer.get(0x180), Ok(0x5a));
        outer.put(0x1ff, 0x33).unwrap();
        assert_eq!(outer.get(0x1ff), Ok(0x33));
        assert!(outer.get(0x200).is_err());
    }

    #[test]
    fn test_load_stops_at_top_of_address_space() {
        let mut bus = AddressSpace::new(0x10);
        let top = Rc::new(Cell::new(0));
        bus.add_region(0xffff_fff0, u32::MAX, counting(0, top.clone()));

        assert_eq!(
            bus.load(0xffff_fffe, &[1, 2, 3]),
            Err(BusError::OutOfRange {
                address: u32::MAX,
                size: 0x10
            })
        );
        assert_eq!(top.get(), 2);
        assert_eq!(bus.get(0x00), Ok(0));
    }

    #[test]
    fn test_load() {
        let mut bus = AddressSpace::new(0x10);
        bus.load(0x0c, &[1, 2, 3, 4]).unwrap();
        assert_eq!(bus.get(0x0f), Ok(4));
        assert!(bus.load(0x0e, &[1, 2, 3]).is_err());
    }
}
