//! Seam to the generic memory-mapped access layer.
//!
//! The driver does not talk to the VME bus itself; a host-provided
//! implementation of [`BusAccess`] does. The driver only ever touches the
//! bus through two fixed [`MemoryWindow`]s configured at construction,
//! and always while holding the instance lock (see [`Ucd`](crate::Ucd)).

use crate::error::Error;

/// Word-at-a-time access to a bus address space.
///
/// Implemented by the host's memory-mapped access layer. Writes carry a
/// confirm-write contract: the implementation is expected to verify the
/// written value and report a mismatch through its error type. The driver
/// treats any such failure as fatal for the call that caused it.
pub trait BusAccess {
    /// Failure surfaced by the access layer. The driver propagates these
    /// opaquely and never retries.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads an 8-bit word from `address`.
    fn read_word_8(&mut self, address: u64) -> Result<u8, Self::Error>;

    /// Reads a 16-bit word from `address`.
    fn read_word_16(&mut self, address: u64) -> Result<u16, Self::Error>;

    /// Writes an 8-bit word to `address` and confirms it.
    fn write_word_8(&mut self, address: u64, data: u8) -> Result<(), Self::Error>;

    /// Writes a 16-bit word to `address` and confirms it.
    fn write_word_16(&mut self, address: u64, data: u16) -> Result<(), Self::Error>;
}

/// A bounded, fixed-base window into the bus address space.
///
/// Windows are configured once at driver construction and never
/// relocated. All offsets handed to a window come from the register map
/// in [`crate::registers`] and are statically within bounds. Only the
/// driver constructs windows; the type is public because it appears in
/// the [`crate::registers::RegisterValue`] dispatch interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWindow {
    base: u64,
    len: u64,
}

impl MemoryWindow {
    pub(crate) fn new(base: u64, len: u64) -> Self {
        MemoryWindow { base, len }
    }

    fn address(&self, offset: u64, width: u64) -> u64 {
        debug_assert!(
            offset + width <= self.len,
            "register offset {offset:#x} outside window of {:#x} bytes",
            self.len
        );
        self.base + offset
    }

    pub(crate) fn read_8<B: BusAccess>(&self, bus: &mut B, offset: u64) -> Result<u8, Error> {
        bus.read_word_8(self.address(offset, 1)).map_err(Error::bus)
    }

    pub(crate) fn read_16<B: BusAccess>(&self, bus: &mut B, offset: u64) -> Result<u16, Error> {
        bus.read_word_16(self.address(offset, 2)).map_err(Error::bus)
    }

    pub(crate) fn write_8<B: BusAccess>(
        &self,
        bus: &mut B,
        offset: u64,
        data: u8,
    ) -> Result<(), Error> {
        bus.write_word_8(self.address(offset, 1), data)
            .map_err(Error::bus)
    }

    pub(crate) fn write_16<B: BusAccess>(
        &self,
        bus: &mut B,
        offset: u64,
        data: u16,
    ) -> Result<(), Error> {
        bus.write_word_16(self.address(offset, 2), data)
            .map_err(Error::bus)
    }
}
