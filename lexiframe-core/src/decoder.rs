//! Frame classification and field decoding
//!
//! The two record decoders read the same control word and accept
//! complementary values of its housekeeping bit, so at most one of them
//! returns a record for any frame.

use crate::constants::{
    ControlWord, HK_VALUE_MASK, HK_VALUE_SHIFT, UNSHIFTED_HK_CHANNELS, VOLTS_PER_COUNT,
};
use crate::error::FrameError;
use crate::types::{DecodedRecord, FrameKind, HousekeepingSample, RawFrame, ScienceSample};
use bytes::Buf;

/// Control word plus four 16-bit fields
const PAYLOAD_LEN: usize = 4 + 4 * 2;

/// Fields shared by both record layouts
struct PayloadFields {
    word: ControlWord,
    fields: [u16; 4],
}

fn read_payload(frame: &RawFrame<'_>) -> Result<PayloadFields, FrameError> {
    let mut buf = frame.payload();
    if buf.remaining() < PAYLOAD_LEN {
        return Err(FrameError::IncompleteFrame {
            expected: PAYLOAD_LEN,
            actual: buf.remaining(),
        });
    }

    let word = ControlWord::new(buf.get_u32());
    let fields = [buf.get_u16(), buf.get_u16(), buf.get_u16(), buf.get_u16()];

    Ok(PayloadFields { word, fields })
}

/// Classify a frame by its housekeeping bit
pub fn classify(frame: &RawFrame<'_>) -> FrameKind {
    if frame.control_word().is_housekeeping() {
        FrameKind::Housekeeping
    } else {
        FrameKind::Science
    }
}

/// Convert a raw ADC count to volts
pub fn counts_to_volts(counts: u16) -> f64 {
    f64::from(counts) * VOLTS_PER_COUNT
}

/// Split the 16-bit housekeeping field into channel id and value
///
/// Channels 10 and 11 carry counters and report the 12-bit value as is;
/// every other channel is scaled up by 4 bits.
pub fn split_hk_field(field: u16) -> (u8, u16) {
    let channel_id = ((field >> 12) & 0xF) as u8;
    let value = field & HK_VALUE_MASK;
    let raw_value = if UNSHIFTED_HK_CHANNELS.contains(&channel_id) {
        value
    } else {
        value << HK_VALUE_SHIFT
    };
    (channel_id, raw_value)
}

/// Decode a science frame, failing if the frame is housekeeping
pub fn try_decode_science(frame: &RawFrame<'_>) -> Result<ScienceSample, FrameError> {
    let PayloadFields { word, fields } = read_payload(frame)?;

    if word.is_housekeeping() {
        return Err(FrameError::WrongRecordKind {
            expected: FrameKind::Science,
            found: FrameKind::Housekeeping,
        });
    }

    Ok(ScienceSample {
        capture_time: frame.capture_time(),
        is_commanded: word.is_commanded(),
        timestamp_ticks: word.timestamp_ticks(),
        channel1: counts_to_volts(fields[0]),
        channel2: counts_to_volts(fields[1]),
        channel3: counts_to_volts(fields[2]),
        channel4: counts_to_volts(fields[3]),
    })
}

/// Decode a housekeeping frame, failing if the frame is science
pub fn try_decode_housekeeping(frame: &RawFrame<'_>) -> Result<HousekeepingSample, FrameError> {
    let PayloadFields { word, fields } = read_payload(frame)?;

    if !word.is_housekeeping() {
        return Err(FrameError::WrongRecordKind {
            expected: FrameKind::Housekeeping,
            found: FrameKind::Science,
        });
    }

    let (channel_id, raw_value) = split_hk_field(fields[0]);

    Ok(HousekeepingSample {
        capture_time: frame.capture_time(),
        timestamp_ticks: word.timestamp_ticks(),
        channel_id,
        raw_value,
        delta_event_count: u32::from(fields[1]),
        delta_dropped_count: u32::from(fields[2]),
        delta_lost_count: u32::from(fields[3]),
    })
}

/// Science sample, or `None` for housekeeping frames
pub fn decode_science(frame: &RawFrame<'_>) -> Option<ScienceSample> {
    try_decode_science(frame).ok()
}

/// Housekeeping sample, or `None` for science frames
pub fn decode_housekeeping(frame: &RawFrame<'_>) -> Option<HousekeepingSample> {
    try_decode_housekeeping(frame).ok()
}

/// Classify and decode a frame into exactly one record variant
pub fn decode_frame(frame: &RawFrame<'_>) -> DecodedRecord {
    let decoded = match classify(frame) {
        FrameKind::Science => try_decode_science(frame).map(DecodedRecord::Science),
        FrameKind::Housekeeping => try_decode_housekeeping(frame).map(DecodedRecord::Housekeeping),
    };
    decoded.unwrap_or(DecodedRecord::Unclassifiable)
}
