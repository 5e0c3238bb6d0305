//! Resynchronization of displaced frames
//!
//! The relay packs the instrument's 16-byte packets into its own 28-byte
//! frames. When the instrument stream slips against the relay stride, the
//! secondary marker no longer sits at offset 12: either the packet starts
//! later in the current frame and finishes after the next relay header, or
//! its first bytes were left at the end of the previous frame.
//!
//! Each recovery hypothesis is a pure function of the buffer and cursor.
//! [`HYPOTHESES`] lists them in the order they are tried; the first that
//! reconstructs a frame wins.

use crate::constants::{
    FRAME_LEN, HEADER_LEN, INSTRUMENT_LEN, MAX_BACKWARD_SHIFT, RESYNC_MIN_REMAINING,
    SECONDARY_SYNC, SECONDARY_SYNC_OFFSET,
};
use crate::types::RawFrame;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::debug;

/// Which hypothesis reconstructed a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "bytes", rename_all = "snake_case")]
pub enum ResyncStrategy {
    /// Marker found this many bytes after its expected offset
    ForwardSearch(u8),
    /// Marker started this many bytes before the cursor
    BackwardShift(u8),
}

/// A frame rebuilt from displaced bytes
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    /// The hypothesis that matched
    pub strategy: ResyncStrategy,

    /// The reassembled frame
    pub frame: RawFrame<'static>,
}

/// Outcome of one resynchronization attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ResyncOutcome {
    /// A hypothesis reconstructed the frame
    Recovered(Recovered),
    /// Too close to the end of the buffer to attempt recovery
    NearTail,
    /// No hypothesis matched
    Unrecoverable,
}

/// A recovery hypothesis: buffer and cursor in, reconstructed frame out
pub type Hypothesis = fn(&[u8], usize) -> Option<Recovered>;

/// Hypotheses in priority order
pub const HYPOTHESES: [Hypothesis; 1 + MAX_BACKWARD_SHIFT] = [
    forward_search,
    backward_shift::<1>,
    backward_shift::<2>,
    backward_shift::<3>,
];

/// Try to recover a frame whose primary marker sits at `cursor` but whose
/// secondary marker is missing
pub fn resynchronize(data: &[u8], cursor: usize) -> ResyncOutcome {
    if data.len().saturating_sub(cursor) < RESYNC_MIN_REMAINING {
        return ResyncOutcome::NearTail;
    }

    match HYPOTHESES.iter().find_map(|hypothesis| hypothesis(data, cursor)) {
        Some(recovered) => {
            #[cfg(feature = "logging")]
            debug!(
                "Resynchronized frame at offset {} via {:?}",
                cursor, recovered.strategy
            );

            ResyncOutcome::Recovered(recovered)
        }
        None => ResyncOutcome::Unrecoverable,
    }
}

/// Secondary marker found later in the current frame
///
/// The packet starts at the marker and runs to the end of the frame; its
/// last bytes follow the next relay header. The next header also supplies
/// the capture time, since that is when the packet was complete.
pub fn forward_search(data: &[u8], cursor: usize) -> Option<Recovered> {
    let window_start = cursor + SECONDARY_SYNC_OFFSET;
    let frame_end = cursor + FRAME_LEN;
    let window = data.get(window_start..frame_end)?;

    let displacement = memchr::memmem::find(window, SECONDARY_SYNC)?;
    if displacement == 0 {
        return None;
    }

    let next_header = data.get(frame_end..frame_end + HEADER_LEN)?;
    let head = &window[displacement..];
    let tail_start = frame_end + HEADER_LEN;
    let tail = data.get(tail_start..tail_start + displacement)?;

    let frame = splice(&[next_header, head, tail])?;

    Some(Recovered {
        strategy: ResyncStrategy::ForwardSearch(displacement as u8),
        frame: RawFrame::spliced(frame),
    })
}

/// Secondary marker split across the cursor
///
/// The first `SHIFT` marker bytes are the last bytes before the cursor; the
/// rest of the packet follows this frame's header.
pub fn backward_shift<const SHIFT: usize>(data: &[u8], cursor: usize) -> Option<Recovered> {
    let before = data.get(cursor.checked_sub(SHIFT)?..cursor)?;
    let header = data.get(cursor..cursor + HEADER_LEN)?;
    let body_start = cursor + SECONDARY_SYNC_OFFSET;
    let body = data.get(body_start..body_start + INSTRUMENT_LEN - SHIFT)?;

    if before != &SECONDARY_SYNC[..SHIFT] || !body.starts_with(&SECONDARY_SYNC[SHIFT..]) {
        return None;
    }

    let frame = splice(&[header, before, body])?;

    Some(Recovered {
        strategy: ResyncStrategy::BackwardShift(SHIFT as u8),
        frame: RawFrame::spliced(frame),
    })
}

/// Concatenate parts into a frame; `None` unless they total exactly one frame
fn splice(parts: &[&[u8]]) -> Option<[u8; FRAME_LEN]> {
    let total: usize = parts.iter().map(|p| p.len()).sum();
    if total != FRAME_LEN {
        return None;
    }

    let mut frame = [0u8; FRAME_LEN];
    let mut pos = 0;
    for part in parts {
        frame[pos..pos + part.len()].copy_from_slice(part);
        pos += part.len();
    }
    Some(frame)
}
