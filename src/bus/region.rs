use std::fmt;

use super::{Access, BusError, Device};

/// Identifies a registered region until it is removed. Handles are never
/// reused by the address space that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionHandle(u64);

impl RegionHandle {
    pub(super) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// An inclusive address range claimed by a device.
pub struct Region {
    handle: RegionHandle,
    start: u32,
    end: u32,
    device: Box<dyn Device>,
}

impl Region {
    pub(super) fn new(handle: RegionHandle, start: u32, end: u32, device: Box<dyn Device>) -> Self {
        Self {
            handle,
            start,
            end,
            device,
        }
    }

    pub fn handle(&self) -> RegionHandle {
        self.handle
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, address: u32) -> bool {
        (self.start..=self.end).contains(&address)
    }

    pub(super) fn access(
        &mut self,
        address: u32,
        data: &mut u8,
        access: Access,
    ) -> Result<(), BusError> {
        self.device.access(address, data, access)
    }

    pub(super) fn into_device(self) -> Box<dyn Device> {
        self.device
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("handle", &self.handle)
            .field("start", &format_args!("{:#010x}", self.start))
            .field("end", &format_args!("{:#010x}", self.end))
            .finish_non_exhaustive()
    }
}
