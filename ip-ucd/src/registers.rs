//! The IP-UCD register map.
//!
//! A typed map from symbolic register name to offset, width and access
//! mode. Nothing in here validates parameters or implements behavior;
//! the driver ([`Ucd`](crate::Ucd)) consumes these definitions while
//! holding the instance lock.
//!
//! The module decodes two address windows: a control/status window of
//! [`CSR_WINDOW_LEN`] bytes holding the command, status, MDAT and FIFO
//! configuration registers plus the read-only PROM identification bytes,
//! and an event window of [`EVENT_WINDOW_LEN`] bytes holding the
//! per-event-code trigger routing table and the FIFO data registers.

use bitfield::bitfield;

use crate::bus::{BusAccess, MemoryWindow};
use crate::error::Error;

/// Size of the control/status window in bytes.
pub const CSR_WINDOW_LEN: u64 = 0x100;

/// Size of the event window in bytes.
pub const EVENT_WINDOW_LEN: u64 = 0x2000;

/// Module ID an IP-UCD reports through its PROM region.
pub const MODULE_ID: u16 = 0xbb15;

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// An atomic access width supported by the module. Sub-word composition
/// is the access layer's concern; this driver only issues 8- and 16-bit
/// transactions.
pub trait RegisterValue: private::Sealed + Copy + core::fmt::Debug {
    #[doc(hidden)]
    fn read_from<B: BusAccess>(
        window: MemoryWindow,
        bus: &mut B,
        offset: u64,
    ) -> Result<Self, Error>;

    #[doc(hidden)]
    fn write_to<B: BusAccess>(
        window: MemoryWindow,
        bus: &mut B,
        offset: u64,
        value: Self,
    ) -> Result<(), Error>;
}

impl RegisterValue for u8 {
    fn read_from<B: BusAccess>(
        window: MemoryWindow,
        bus: &mut B,
        offset: u64,
    ) -> Result<Self, Error> {
        window.read_8(bus, offset)
    }

    fn write_to<B: BusAccess>(
        window: MemoryWindow,
        bus: &mut B,
        offset: u64,
        value: Self,
    ) -> Result<(), Error> {
        window.write_8(bus, offset, value)
    }
}

impl RegisterValue for u16 {
    fn read_from<B: BusAccess>(
        window: MemoryWindow,
        bus: &mut B,
        offset: u64,
    ) -> Result<Self, Error> {
        window.read_16(bus, offset)
    }

    fn write_to<B: BusAccess>(
        window: MemoryWindow,
        bus: &mut B,
        offset: u64,
        value: Self,
    ) -> Result<(), Error> {
        window.write_16(bus, offset, value)
    }
}

/// The address window a register lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Control/status window (command, status, MDAT and FIFO
    /// configuration, PROM identification bytes).
    ControlStatus,
    /// Event window (trigger routing table, FIFO data).
    Event,
}

/// A named hardware register.
pub trait RegisterSpec {
    /// Atomic width of the register.
    type Value: RegisterValue;
    /// Offset relative to the base of the register's window.
    const OFFSET: u64;
    /// Window the register lives in.
    const WINDOW: Window;
    /// Symbolic name, for diagnostics.
    const NAME: &'static str;
}

/// Plain read access with no hardware side effect.
pub trait Readable: RegisterSpec {}

/// Read/confirm-write access. The confirm half of a write is owned by
/// the access layer; a failed confirm surfaces as a bus error.
pub trait ConfirmWritable: RegisterSpec {}

/// Reading pops hardware state (the FIFO pointer advances on every
/// read). A value must be captured on first read; re-reading the same
/// logical entry is impossible.
pub trait DestructiveReadable: RegisterSpec {}

/// Defines a named register: doc comment, marker type, value type,
/// window, offset and the access capabilities it supports.
macro_rules! register {
    (
        $(#[$doc:meta])*
        $name:ident, $value:ty, $window:expr, $offset:expr, [$($cap:ident),+]
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {}

        impl RegisterSpec for $name {
            type Value = $value;
            const OFFSET: u64 = $offset;
            const WINDOW: Window = $window;
            const NAME: &'static str = stringify!($name);
        }

        $(impl $cap for $name {})+
    };
}

register!(
    /// Control command register. Accepts the [`ControlCommand`] values.
    Control, u16, Window::ControlStatus, 0x40, [Readable, ConfirmWritable]
);

register!(
    /// Status register. Writing back a just-read value clears the
    /// edge-triggered flags it contains (see [`StatusFlags`]).
    Status, u16, Window::ControlStatus, 0x42, [Readable, ConfirmWritable]
);

register!(
    /// MDAT interrupt type. Named for completeness; this driver
    /// configures MDAT but does not decode it.
    MdatIntType, u8, Window::ControlStatus, 0x44, [Readable, ConfirmWritable]
);

register!(
    /// MDAT buffer switch.
    MdatBufSwitch, u8, Window::ControlStatus, 0x45, [Readable, ConfirmWritable]
);

register!(
    /// Timestamp-reset value, low half.
    TimestampLow, u16, Window::ControlStatus, 0x46, [Readable, ConfirmWritable]
);

register!(
    /// Timestamp-reset value, high half.
    TimestampHigh, u16, Window::ControlStatus, 0x48, [Readable, ConfirmWritable]
);

register!(
    /// Selects the trigger line that forces a FIFO write. Zero means no
    /// trigger selected; line `n` is encoded as `n + 1`.
    FifoWriteTrigger, u8, Window::ControlStatus, 0x4a, [Readable, ConfirmWritable]
);

register!(
    /// Selects the trigger line that resets the FIFO timestamp counter.
    /// Same encoding as [`FifoWriteTrigger`].
    FifoClearTrigger, u8, Window::ControlStatus, 0x4b, [Readable, ConfirmWritable]
);

register!(
    /// FIFO depth at which the hardware raises the threshold status
    /// flag. The register is 16 bits wide but only accepts 1..=255.
    FifoThreshold, u16, Window::ControlStatus, 0x4c, [Readable, ConfirmWritable]
);

register!(
    /// Module ID high byte, from the PROM region.
    IdHigh, u8, Window::ControlStatus, 0x89, [Readable]
);

register!(
    /// Module ID low byte, from the PROM region.
    IdLow, u8, Window::ControlStatus, 0x8b, [Readable]
);

register!(
    /// FIFO data register. One logical 32-bit entry is read as two
    /// adjacent 16-bit halves, high half at [`FifoData::OFFSET`], low
    /// half 2 bytes above it; the hardware pops half an entry on each
    /// read, so the two half-reads must stay back-to-back under one
    /// lock acquisition.
    FifoData, u16, Window::Event, 0x1200, [DestructiveReadable]
);

/// The trigger routing table: one 16-bit mask per possible event code.
/// Bit `n` (0..=7) set in the entry for code `c` asserts output trigger
/// line `n` whenever event `c` arrives. Bits 8..=15 are unused in this
/// driver's scope. There is no batch access; entries are read and
/// written one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTable {}

impl TriggerTable {
    /// Offset of the table within the event window.
    pub const OFFSET: u64 = 0x0;

    /// Number of entries, one per 8-bit event code.
    pub const ENTRIES: usize = 256;

    /// Offset of the entry for `event`. All 8-bit values are valid event
    /// codes; there is no further range to check.
    pub fn entry_offset(event: u8) -> u64 {
        Self::OFFSET + 2 * u64::from(event)
    }
}

/// Commands accepted by the [`Control`] register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ControlCommand {
    /// No effect.
    NoOp = 0x0,
    /// Start timestamping and queueing TCLK events.
    EnableTclk = 0x1,
    /// Stop TCLK event collection.
    DisableTclk = 0x2,
    /// Enable the MDAT channel.
    EnableMdat = 0x3,
    /// Disable the MDAT channel.
    DisableMdat = 0x4,
    /// Select MDAT buffer 0.
    MdatBuf0 = 0x5,
    /// Select MDAT buffer 1.
    MdatBuf1 = 0x6,
    /// Enable automatic MDAT buffer switching.
    EnableMdatBufAuto = 0x7,
    /// Disable automatic MDAT buffer switching.
    DisableMdatBufAuto = 0x8,
    /// Raise a software interrupt.
    SwInterrupt = 0x9,
    /// Software reset. No acknowledgement is read back; the reset is
    /// hardware-synchronous.
    SwReset = 0xff,
}

impl From<ControlCommand> for u16 {
    fn from(command: ControlCommand) -> u16 {
        command as u16
    }
}

bitfield! {
    /// Snapshot of the [`Status`] register.
    ///
    /// The parity-error, overflow, underflow and threshold flags are
    /// edge-triggered and cleared by the read that produced the
    /// snapshot (the driver writes the value straight back, see
    /// [`Ucd::read_status`](crate::Ucd::read_status)). Callers must not
    /// expect those flags to still be observable on a second read.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags(u16);
    impl Debug;
    /// An MDAT parity error was seen since the last status read.
    pub mdat_parity_error, _: 14;
    /// Which MDAT buffer the hardware is currently filling.
    pub mdat_buffer_0_1, _: 13;
    /// The FIFO underflowed since the last status read.
    pub fifo_underflow, _: 12;
    /// The FIFO overflowed since the last status read.
    pub fifo_overflow, _: 11;
    /// The FIFO is full.
    pub fifo_full, _: 10;
    /// The FIFO crossed the programmed threshold depth.
    pub fifo_threshold, _: 9;
    /// The FIFO holds no entries.
    pub fifo_empty, _: 8;
    /// A TCLK parity error was seen since the last status read.
    pub tclk_parity_error, _: 7;
    /// MDAT buffer 1 is enabled.
    pub mdat_buffer_1_enabled, _: 6;
    /// MDAT buffer 0 is enabled.
    pub mdat_buffer_0_enabled, _: 5;
    /// Automatic MDAT buffer switching is enabled.
    pub mdat_auto_buffer_enabled, _: 4;
    /// The MDAT channel is enabled.
    pub mdat_enabled, _: 3;
    /// TCLK event collection is enabled.
    pub tclk_enabled, _: 2;
    /// An MDAT signal is present.
    pub mdat_present, _: 1;
    /// A TCLK signal is present.
    pub tclk_present, _: 0;
}

impl StatusFlags {
    pub(crate) fn from_bits(bits: u16) -> Self {
        StatusFlags(bits)
    }

    /// The raw register value the snapshot was taken from.
    pub fn bits(&self) -> u16 {
        self.0
    }
}
