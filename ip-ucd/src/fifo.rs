//! Decoding of the hardware FIFO record format.
//!
//! The FIFO stores each captured event as one 32-bit word: the top 24 bits
//! hold the microsecond count since the last timestamp-reset trigger
//! (typically TCLK event $02), the low 8 bits hold the TCLK event code.
//! The all-ones word is reserved by the hardware to report an empty FIFO
//! and never occurs as real capture data.

/// Reserved "no data" word returned by the hardware when the FIFO has
/// nothing to deliver.
pub(crate) const NO_VALUE: u32 = 0xffff_ffff;

/// One hardware-captured TCLK event.
///
/// Entries are produced transiently by each FIFO read; the read that
/// produced an entry also popped it from the hardware, so the decoded
/// value is the only copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoEntry {
    event: u8,
    timestamp: u32,
}

impl FifoEntry {
    /// Decodes a raw FIFO word. Returns `None` for the reserved
    /// all-ones "no data" sentinel.
    pub fn from_raw(raw: u32) -> Option<Self> {
        if raw == NO_VALUE {
            return None;
        }

        Some(FifoEntry {
            event: (raw & 0xff) as u8,
            timestamp: raw >> 8,
        })
    }

    /// The TCLK event code.
    pub fn event(&self) -> u8 {
        self.event
    }

    /// Microseconds since the last timestamp-reset trigger. Only the low
    /// 24 bits are significant; the counter wraps.
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sentinel_is_empty() {
        assert_eq!(FifoEntry::from_raw(NO_VALUE), None);
    }

    #[test]
    fn splits_event_and_timestamp() {
        let entry = FifoEntry::from_raw(0x1234_5678).unwrap();
        assert_eq!(entry.event(), 0x78);
        assert_eq!(entry.timestamp(), 0x12_3456);
    }

    #[test]
    fn zero_word_is_a_real_event() {
        let entry = FifoEntry::from_raw(0).unwrap();
        assert_eq!(entry.event(), 0);
        assert_eq!(entry.timestamp(), 0);
    }

    #[test]
    fn near_sentinel_words_still_decode() {
        // Only the exact all-ones word is reserved.
        let entry = FifoEntry::from_raw(0xffff_fffe).unwrap();
        assert_eq!(entry.event(), 0xfe);
        assert_eq!(entry.timestamp(), 0xff_ffff);

        let entry = FifoEntry::from_raw(0x7fff_ffff).unwrap();
        assert_eq!(entry.event(), 0xff);
        assert_eq!(entry.timestamp(), 0x7f_ffff);
    }
}
