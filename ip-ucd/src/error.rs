use thiserror::Error;

/// The error type for all IP-UCD driver operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No IP-UCD answered at the probed location. The module ID read from
    /// the PROM region did not match [`MODULE_ID`](crate::registers::MODULE_ID);
    /// the hardware was left untouched.
    #[error("IP-UCD not found: module ID {id:#06x}, expected 0xbb15")]
    DeviceNotFound {
        /// The ID that was actually read from the PROM region.
        id: u16,
    },
    /// A caller passed an out-of-range value (trigger bit, FIFO threshold).
    /// This is a programming error; no hardware access was attempted for
    /// the offending call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// The underlying bus access layer failed (bus timeout, failed
    /// confirm-write). The failure is propagated unchanged; the driver
    /// never retries, since re-issuing a command-register write could
    /// double-trigger an action such as a software reset.
    #[error("bus access failed")]
    Bus(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn bus(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Bus(Box::new(error))
    }
}
