//! Driver state machine and trigger routing for one IP-UCD module.
//!
//! [`Ucd::new`] walks the module through probe, software reset and
//! trigger configuration, and leaves it collecting TCLK events. Every
//! public operation acquires the instance lock exactly once and performs
//! its whole register transaction under it; the locked [`Inner`] value is
//! the proof that the lock is held, so internal helpers take
//! `&mut Inner<B>` instead of re-locking.

use parking_lot::Mutex;

use crate::bus::{BusAccess, MemoryWindow};
use crate::error::Error;
use crate::fifo::FifoEntry;
use crate::registers::{
    ConfirmWritable, Control, ControlCommand, FifoClearTrigger, FifoData, FifoThreshold,
    FifoWriteTrigger, IdHigh, IdLow, Readable, RegisterSpec, RegisterValue, Status, StatusFlags,
    TriggerTable, Window, CSR_WINDOW_LEN, EVENT_WINDOW_LEN, MODULE_ID,
};

/// Driver for one IP-UCD industry pack.
///
/// An instance is self-contained: it owns the two bus address windows of
/// its module and the mutual exclusion primitive that serializes all
/// register access, so it can be shared between tasks. Instances for
/// different physical modules are fully independent.
///
/// Construction runs the initialization state machine; a constructed
/// value is always in the collecting state, with the hardware
/// timestamping and queueing matching TCLK events autonomously.
#[derive(Debug)]
pub struct Ucd<B: BusAccess> {
    inner: Mutex<Inner<B>>,
}

/// The lock-protected half of the driver: the bus handle and the two
/// address windows. Holding a `&mut Inner` is the proof-of-lock every
/// register helper requires.
#[derive(Debug)]
struct Inner<B> {
    bus: B,
    csr: MemoryWindow,
    event: MemoryWindow,
}

impl<B: BusAccess> Inner<B> {
    fn window(&self, window: Window) -> MemoryWindow {
        match window {
            Window::ControlStatus => self.csr,
            Window::Event => self.event,
        }
    }

    fn read<R: Readable>(&mut self) -> Result<R::Value, Error> {
        let window = self.window(R::WINDOW);
        R::Value::read_from(window, &mut self.bus, R::OFFSET)
    }

    fn write<R: ConfirmWritable>(&mut self, value: R::Value) -> Result<(), Error> {
        tracing::trace!("{} <- {:x?}", R::NAME, value);
        let window = self.window(R::WINDOW);
        R::Value::write_to(window, &mut self.bus, R::OFFSET, value)
    }

    fn command(&mut self, command: ControlCommand) -> Result<(), Error> {
        self.write::<Control>(command.into())
    }

    /// Reads the module ID from the PROM region. The ID bytes are ROM
    /// contents, so the order of the two reads does not matter.
    fn module_id(&mut self) -> Result<u16, Error> {
        let high = self.read::<IdHigh>()?;
        let low = self.read::<IdLow>()?;

        Ok((u16::from(high) << 8) + u16::from(low))
    }

    fn trigger_entry(&mut self, event: u8) -> Result<u16, Error> {
        self.event
            .read_16(&mut self.bus, TriggerTable::entry_offset(event))
    }

    fn set_trigger_entry(&mut self, event: u8, value: u16) -> Result<(), Error> {
        self.event
            .write_16(&mut self.bus, TriggerTable::entry_offset(event), value)
    }

    /// Extension point for interrupt-driven FIFO drain. Invoked under
    /// the lock while trigger routing changes; the hardware interrupt
    /// path is not wired up yet.
    fn setup_interrupt(&mut self) {}

    /// Reads one logical FIFO entry as two adjacent 16-bit halves, high
    /// half first. Each half-read pops hardware state, so the pair must
    /// stay back-to-back under the same lock acquisition.
    fn read_fifo_raw(&mut self) -> Result<u32, Error> {
        let high = self.event.read_16(&mut self.bus, FifoData::OFFSET)?;
        let low = self.event.read_16(&mut self.bus, FifoData::OFFSET + 2)?;

        Ok((u32::from(high) << 16) | u32::from(low))
    }

    /// Returns the oldest FIFO entry, or `None` when the FIFO is empty.
    /// The empty check uses a plain status read; the destructive FIFO
    /// read is only issued when there is something to pop.
    fn read_fifo(&mut self) -> Result<Option<FifoEntry>, Error> {
        let status = StatusFlags::from_bits(self.read::<Status>()?);

        if status.fifo_empty() {
            return Ok(None);
        }

        Ok(FifoEntry::from_raw(self.read_fifo_raw()?))
    }
}

impl<B: BusAccess> Ucd<B> {
    /// Creates a driver instance and initializes the associated
    /// hardware: probe the module ID, software-reset the module, zero
    /// the trigger selectors and all 256 trigger table entries, then
    /// enable TCLK collection. On success the module is collecting.
    ///
    /// `csr_base` and `event_base` are the base offsets of the module's
    /// control/status and event windows within the host's bus address
    /// space; they are the only configuration surface.
    ///
    /// If the probed ID is not `0xbb15` this fails with
    /// [`Error::DeviceNotFound`] before any write reaches the hardware.
    /// Any later failure aborts initialization; no partially-initialized
    /// instance is returned and no TCLK enable has taken effect.
    pub fn new(bus: B, csr_base: u64, event_base: u64) -> Result<Self, Error> {
        let ucd = Ucd {
            inner: Mutex::new(Inner {
                bus,
                csr: MemoryWindow::new(csr_base, CSR_WINDOW_LEN),
                event: MemoryWindow::new(event_base, EVENT_WINDOW_LEN),
            }),
        };

        let mut inner = ucd.inner.lock();

        let id = inner.module_id()?;
        if id != MODULE_ID {
            return Err(Error::DeviceNotFound { id });
        }

        tracing::debug!("IP-UCD found at {csr_base:#x}, resetting");
        inner.command(ControlCommand::SwReset)?;

        // Neutral trigger selectors, then a clean routing table.
        inner.write::<FifoWriteTrigger>(0x00)?;
        inner.write::<FifoClearTrigger>(0x00)?;

        for event in 0..=u8::MAX {
            inner.set_trigger_entry(event, 0x00)?;
        }

        inner.command(ControlCommand::EnableTclk)?;
        tracing::debug!("IP-UCD collecting TCLK events");

        drop(inner);
        Ok(ucd)
    }

    /// Routes or unroutes event code `event` to output trigger line
    /// `trigger_bit` (0..=7).
    ///
    /// The read-modify-write of the table entry happens under a single
    /// lock acquisition, so concurrent routing changes never lose
    /// updates. All 8-bit `event` values are valid event codes; there is
    /// no further range to check.
    pub fn set_trigger(&self, event: u8, trigger_bit: u8, enable: bool) -> Result<(), Error> {
        if trigger_bit > 7 {
            return Err(Error::InvalidParameter("illegal trigger bit value"));
        }

        let mut inner = self.inner.lock();
        inner.setup_interrupt();

        let mask = 1u16 << trigger_bit;
        let prev = inner.trigger_entry(event)?;
        let value = if enable { prev | mask } else { prev & !mask };

        inner.set_trigger_entry(event, value)
    }

    /// Returns whether event code `event` is routed to output trigger
    /// line `trigger_bit` (0..=7).
    pub fn get_trigger(&self, event: u8, trigger_bit: u8) -> Result<bool, Error> {
        if trigger_bit > 7 {
            return Err(Error::InvalidParameter("illegal trigger bit value"));
        }

        let mask = 1u16 << trigger_bit;

        Ok(self.inner.lock().trigger_entry(event)? & mask != 0)
    }

    /// Selects the trigger line (1..=7) that resets the timestamp
    /// counter used to tag FIFO entries. Line 0 cannot be selected; the
    /// hardware reserves the zero selector value for "no trigger", so
    /// line `n` is written as `n + 1`.
    pub fn set_reset_timestamp_trigger(&self, trigger_bit: u8) -> Result<(), Error> {
        if !(1..=7).contains(&trigger_bit) {
            return Err(Error::InvalidParameter("illegal trigger bit value"));
        }

        self.inner.lock().write::<FifoClearTrigger>(trigger_bit + 1)
    }

    /// Selects the trigger line (1..=7) that forces a FIFO write. Same
    /// selector encoding as [`Ucd::set_reset_timestamp_trigger`].
    pub fn set_write_trigger(&self, trigger_bit: u8) -> Result<(), Error> {
        if !(1..=7).contains(&trigger_bit) {
            return Err(Error::InvalidParameter("illegal trigger bit value"));
        }

        self.inner.lock().write::<FifoWriteTrigger>(trigger_bit + 1)
    }

    /// Programs the FIFO depth at which the hardware raises the
    /// threshold status flag. The register only accepts 1..=255; zero is
    /// a programming error.
    pub fn set_fifo_threshold(&self, level: u8) -> Result<(), Error> {
        if level == 0 {
            return Err(Error::InvalidParameter("illegal FIFO threshold value"));
        }

        self.inner.lock().write::<FifoThreshold>(u16::from(level))
    }

    /// Takes a snapshot of the status register.
    ///
    /// The just-read value is written straight back, which clears the
    /// edge-triggered flags (parity errors, overflow, underflow,
    /// threshold). A second read will not observe them again.
    pub fn read_status(&self) -> Result<StatusFlags, Error> {
        let mut inner = self.inner.lock();

        let bits = inner.read::<Status>()?;
        inner.write::<Status>(bits)?;

        Ok(StatusFlags::from_bits(bits))
    }

    /// Returns the oldest entry in the FIFO, or `None` when the FIFO is
    /// empty. An empty FIFO is detected from the status register before
    /// any destructive FIFO read is issued.
    pub fn read_fifo(&self) -> Result<Option<FifoEntry>, Error> {
        self.inner.lock().read_fifo()
    }

    /// Interrupt-context-safe variant of [`Ucd::read_fifo`]: acquires
    /// the lock without blocking and returns `None` when it is
    /// contended, so a caller in interrupt context can retry later
    /// instead of waiting on a task that holds the lock.
    pub fn try_read_fifo(&self) -> Option<Result<Option<FifoEntry>, Error>> {
        let mut inner = self.inner.try_lock()?;

        Some(inner.read_fifo())
    }

    /// Resumes TCLK event collection.
    pub fn enable_tclk(&self) -> Result<(), Error> {
        self.inner.lock().command(ControlCommand::EnableTclk)
    }

    /// Stops TCLK event collection. Entries already queued stay readable
    /// through [`Ucd::read_fifo`].
    pub fn disable_tclk(&self) -> Result<(), Error> {
        self.inner.lock().command(ControlCommand::DisableTclk)
    }
}
