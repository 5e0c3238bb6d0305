//! Error types for single-frame operations
//!
//! Buffer-level decoding never fails; these errors come from the strict
//! per-frame API and from the encoder.

use crate::types::FrameKind;

/// Errors that can occur while handling a single telemetry frame
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Primary sync marker missing at offset 0
    #[cfg_attr(feature = "std", error("Invalid primary sync marker: got {0:02x?}"))]
    BadPrimarySync([u8; 2]),

    /// Secondary sync marker missing at its fixed offset
    #[cfg_attr(feature = "std", error("Invalid secondary sync marker: got {0:02x?}"))]
    BadSecondarySync([u8; 4]),

    /// Not enough bytes for a frame or a field
    #[cfg_attr(feature = "std", error("Incomplete frame: expected {expected} bytes, got {actual}"))]
    IncompleteFrame {
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// The classification bit selects the other record kind
    #[cfg_attr(feature = "std", error("Wrong record kind: expected {expected:?}, frame is {found:?}"))]
    WrongRecordKind {
        /// The kind the caller asked for.
        expected: FrameKind,
        /// The kind the frame is classified as.
        found: FrameKind,
    },

    /// A value does not fit in its wire field
    #[cfg_attr(feature = "std", error("Field {field} value {value} exceeds maximum {max}"))]
    FieldOutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: u64,
        /// Largest encodable value.
        max: u64,
    },
}
