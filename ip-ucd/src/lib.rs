//! # Driver core for the IP-UCD industry pack
//!
//! The IP-UCD is a VME-bus module that timestamps incoming TCLK events
//! and queues them in a hardware FIFO, while asserting up to 8 output
//! trigger lines for event codes the software routes to them. This crate
//! implements the driver core: hardware probe and initialization, the
//! per-event-code trigger routing table, FIFO drain, and the locking
//! discipline that keeps register access safe from multiple tasks and
//! from interrupt context.
//!
//! Bus access itself is delegated to the host through the [`BusAccess`]
//! trait; the driver only knows register names, offsets and access modes
//! (see [`registers`]).
//!
//! # Examples
//!
//! ```no_run
//! use ip_ucd::{BusAccess, Ucd};
//!
//! # struct Vme;
//! # impl BusAccess for Vme {
//! #     type Error = std::io::Error;
//! #     fn read_word_8(&mut self, _: u64) -> Result<u8, Self::Error> { unimplemented!() }
//! #     fn read_word_16(&mut self, _: u64) -> Result<u16, Self::Error> { unimplemented!() }
//! #     fn write_word_8(&mut self, _: u64, _: u8) -> Result<(), Self::Error> { unimplemented!() }
//! #     fn write_word_16(&mut self, _: u64, _: u16) -> Result<(), Self::Error> { unimplemented!() }
//! # }
//! # fn vme_bus() -> Vme { Vme }
//! // Probe and initialize the module at the given window base offsets.
//! let ucd = Ucd::new(vme_bus(), 0x3000, 0x0080_0000)?;
//!
//! // Route TCLK event $02 to output trigger line 3.
//! ucd.set_trigger(0x02, 3, true)?;
//!
//! // Drain whatever the hardware captured so far.
//! while let Some(entry) = ucd.read_fifo()? {
//!     println!("event {:#04x} at {} us", entry.event(), entry.timestamp());
//! }
//! # Ok::<(), ip_ucd::Error>(())
//! ```
#![warn(missing_docs)]

pub mod bus;
mod driver;
mod error;
mod fifo;
pub mod registers;
#[cfg(test)]
pub(crate) mod test;

pub use bus::BusAccess;
pub use driver::Ucd;
pub use error::Error;
pub use fifo::FifoEntry;
pub use registers::{ControlCommand, StatusFlags};
