//! Helpers for testing the crate.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bus::BusAccess;

/// One recorded bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transaction {
    Read8(u64),
    Read16(u64),
    Write8(u64, u8),
    Write16(u64, u16),
}

#[derive(Debug, Default)]
struct MockState {
    mem8: BTreeMap<u64, u8>,
    mem16: BTreeMap<u64, u16>,
    fail_at: BTreeSet<u64>,
    log: Vec<Transaction>,
}

/// A sparse in-memory bus that records every transaction.
///
/// Cloning yields a second handle on the same state, so a test can keep
/// one handle for seeding and inspection while the driver owns the
/// other. Unseeded addresses read as zero; addresses registered with
/// [`MockBus::fail_at`] fail every access, mimicking a bus fault or a
/// failed confirm-write.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockBus {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, thiserror::Error)]
#[error("mock bus fault at {0:#010x}")]
pub(crate) struct MockBusError(u64);

impl MockBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_8(&self, address: u64, value: u8) {
        self.state.lock().mem8.insert(address, value);
    }

    pub(crate) fn set_16(&self, address: u64, value: u16) {
        self.state.lock().mem16.insert(address, value);
    }

    pub(crate) fn mem_16(&self, address: u64) -> u16 {
        self.state.lock().mem16.get(&address).copied().unwrap_or(0)
    }

    pub(crate) fn fail_at(&self, address: u64) {
        self.state.lock().fail_at.insert(address);
    }

    pub(crate) fn log(&self) -> Vec<Transaction> {
        self.state.lock().log.clone()
    }

    pub(crate) fn clear_log(&self) {
        self.state.lock().log.clear();
    }
}

impl MockState {
    fn check(&self, address: u64) -> Result<(), MockBusError> {
        if self.fail_at.contains(&address) {
            return Err(MockBusError(address));
        }

        Ok(())
    }
}

impl BusAccess for MockBus {
    type Error = MockBusError;

    fn read_word_8(&mut self, address: u64) -> Result<u8, Self::Error> {
        let mut state = self.state.lock();
        state.check(address)?;
        state.log.push(Transaction::Read8(address));

        Ok(state.mem8.get(&address).copied().unwrap_or(0))
    }

    fn read_word_16(&mut self, address: u64) -> Result<u16, Self::Error> {
        let mut state = self.state.lock();
        state.check(address)?;
        state.log.push(Transaction::Read16(address));

        Ok(state.mem16.get(&address).copied().unwrap_or(0))
    }

    fn write_word_8(&mut self, address: u64, data: u8) -> Result<(), Self::Error> {
        let mut state = self.state.lock();
        state.check(address)?;
        state.log.push(Transaction::Write8(address, data));
        state.mem8.insert(address, data);

        Ok(())
    }

    fn write_word_16(&mut self, address: u64, data: u16) -> Result<(), Self::Error> {
        let mut state = self.state.lock();
        state.check(address)?;
        state.log.push(Transaction::Write16(address, data));
        state.mem16.insert(address, data);

        Ok(())
    }
}
