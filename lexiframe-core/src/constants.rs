//! Constants of the LEXI telemetry wire format
//!
//! Every frame is exactly [`FRAME_LEN`] bytes:
//!
//! ```text
//! offset  size  field
//!      0     2  primary sync marker (ground relay)
//!      2     8  capture time, big-endian f64 seconds
//!     10     2  reserved
//!     12     4  secondary sync marker (instrument)
//!     16     4  control word (kind flag, commanded flag, 30-bit ticks)
//!     20     8  four big-endian u16 fields
//! ```

use serde::{Deserialize, Serialize};

/// Length of one telemetry frame; also the scan stride
pub const FRAME_LEN: usize = 28;

/// Primary sync marker written by the ground relay at offset 0
pub const PRIMARY_SYNC: &[u8; 2] = b"\x54\x53";

/// Secondary sync marker written by the instrument
pub const SECONDARY_SYNC: &[u8; 4] = b"\xFE\x6B\x28\x40";

/// Offset of [`SECONDARY_SYNC`] within a well-aligned frame
pub const SECONDARY_SYNC_OFFSET: usize = 12;

/// Offset of the big-endian f64 capture time
pub const CAPTURE_TIME_OFFSET: usize = 2;

/// Offset of the 32-bit control word
pub const CONTROL_WORD_OFFSET: usize = SECONDARY_SYNC_OFFSET + SECONDARY_SYNC.len();

/// Size of the relay header preceding the secondary marker
pub const HEADER_LEN: usize = SECONDARY_SYNC_OFFSET;

/// Number of instrument bytes carried by one frame (secondary marker onwards)
pub const INSTRUMENT_LEN: usize = FRAME_LEN - HEADER_LEN;

/// Bytes that must remain at the cursor before resynchronization is attempted
pub const RESYNC_MIN_REMAINING: usize = FRAME_LEN + INSTRUMENT_LEN;

/// Largest backward shift tried by the resynchronizer
pub const MAX_BACKWARD_SHIFT: usize = 3;

/// Volts per ADC count for science channels
pub const VOLTS_PER_COUNT: f64 = 4.5126 / 65536.0;

/// Housekeeping channel ids whose 12-bit value is reported without the 4-bit shift
pub const UNSHIFTED_HK_CHANNELS: [u8; 2] = [10, 11];

/// Mask for the 12-bit housekeeping value
pub const HK_VALUE_MASK: u16 = 0x0FFF;

/// Left shift applied to housekeeping values outside [`UNSHIFTED_HK_CHANNELS`]
pub const HK_VALUE_SHIFT: u32 = 4;

/// The 32-bit word following the secondary marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlWord(u32);

impl ControlWord {
    /// Set on housekeeping frames, clear on science frames
    pub const HOUSEKEEPING: u32 = 0x8000_0000;

    /// Science frames only: the event was commanded
    pub const COMMANDED: u32 = 0x4000_0000;

    /// Instrument timestamp in milliseconds (bits 0-29)
    pub const TIMESTAMP_MASK: u32 = 0x3FFF_FFFF;

    /// Create a control word from its raw value
    pub const fn new(word: u32) -> Self {
        Self(word)
    }

    /// Get the raw word
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Check if the housekeeping flag is set
    pub const fn is_housekeeping(&self) -> bool {
        (self.0 & Self::HOUSEKEEPING) != 0
    }

    /// Check if the commanded flag is set
    pub const fn is_commanded(&self) -> bool {
        (self.0 & Self::COMMANDED) != 0
    }

    /// The 30-bit timestamp field
    pub const fn timestamp_ticks(&self) -> u32 {
        self.0 & Self::TIMESTAMP_MASK
    }
}
