//! Frame encoding
//!
//! Produces bit-exact frames for synthetic captures, tests and benches.

use crate::constants::{ControlWord, FRAME_LEN, HK_VALUE_MASK, PRIMARY_SYNC, SECONDARY_SYNC};
use crate::error::FrameError;
use bytes::{BufMut, BytesMut};

/// Record-specific part of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Science {
        counts: [u16; 4],
    },
    Housekeeping {
        channel_id: u8,
        value: u16,
        deltas: [u16; 3],
    },
}

/// Builder for constructing frames
///
/// ```
/// use lexiframe_core::encoder::FrameBuilder;
///
/// let frame = FrameBuilder::new(1_700_000_000.5)
///     .timestamp_ticks(42)
///     .science([100, 200, 300, 400])
///     .build()
///     .unwrap();
/// assert_eq!(frame.len(), 28);
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    capture_time: f64,
    reserved: [u8; 2],
    timestamp_ticks: u32,
    commanded: bool,
    body: Body,
}

impl FrameBuilder {
    /// Create a new builder for a science frame with zeroed fields
    pub fn new(capture_time: f64) -> Self {
        Self {
            capture_time,
            reserved: [0u8; 2],
            timestamp_ticks: 0,
            commanded: false,
            body: Body::Science { counts: [0; 4] },
        }
    }

    /// Set the two reserved header bytes
    pub fn reserved(mut self, reserved: [u8; 2]) -> Self {
        self.reserved = reserved;
        self
    }

    /// Set the 30-bit instrument timestamp
    pub fn timestamp_ticks(mut self, ticks: u32) -> Self {
        self.timestamp_ticks = ticks;
        self
    }

    /// Mark a science event as commanded
    pub fn commanded(mut self, commanded: bool) -> Self {
        self.commanded = commanded;
        self
    }

    /// Encode a science frame with four raw ADC counts
    pub fn science(mut self, counts: [u16; 4]) -> Self {
        self.body = Body::Science { counts };
        self
    }

    /// Encode a housekeeping frame
    ///
    /// `value` is the 12-bit field as transmitted, before any shift.
    pub fn housekeeping(mut self, channel_id: u8, value: u16, deltas: [u16; 3]) -> Self {
        self.body = Body::Housekeeping {
            channel_id,
            value,
            deltas,
        };
        self
    }

    /// Validate and encode the frame
    ///
    /// Layout:
    /// 1. Primary sync (2 bytes)
    /// 2. Capture time (f64, big-endian)
    /// 3. Reserved (2 bytes)
    /// 4. Secondary sync (4 bytes)
    /// 5. Control word (u32, big-endian)
    /// 6. Four u16 fields (big-endian)
    pub fn build(self) -> Result<[u8; FRAME_LEN], FrameError> {
        check_range(
            "timestamp_ticks",
            self.timestamp_ticks.into(),
            ControlWord::TIMESTAMP_MASK.into(),
        )?;

        let mut word = self.timestamp_ticks;
        let fields = match self.body {
            Body::Science { counts } => {
                if self.commanded {
                    word |= ControlWord::COMMANDED;
                }
                counts
            }
            Body::Housekeeping {
                channel_id,
                value,
                deltas,
            } => {
                check_range("channel_id", channel_id.into(), 0xF)?;
                check_range("value", value.into(), HK_VALUE_MASK.into())?;
                word |= ControlWord::HOUSEKEEPING;
                [
                    (u16::from(channel_id) << 12) | value,
                    deltas[0],
                    deltas[1],
                    deltas[2],
                ]
            }
        };

        let mut buf = BytesMut::with_capacity(FRAME_LEN);
        buf.put_slice(PRIMARY_SYNC);
        buf.put_f64(self.capture_time);
        buf.put_slice(&self.reserved);
        buf.put_slice(SECONDARY_SYNC);
        buf.put_u32(word);
        for field in fields {
            buf.put_u16(field);
        }

        let mut frame = [0u8; FRAME_LEN];
        frame.copy_from_slice(&buf);
        Ok(frame)
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), FrameError> {
    if value > max {
        return Err(FrameError::FieldOutOfRange { field, value, max });
    }
    Ok(())
}
