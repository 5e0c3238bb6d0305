//! Stream scanner for misaligned telemetry captures
//!
//! The scanner walks the buffer in fixed [`FRAME_LEN`] strides. Every stride
//! produces exactly one [`ScanStep`]: an aligned frame, a frame rebuilt by
//! the resynchronizer, or a skipped region. Bytes past the last full stride
//! are discarded.

use crate::constants::FRAME_LEN;
use crate::decoder::{decode_frame, decode_housekeeping, decode_science};
use crate::resync::{resynchronize, ResyncOutcome, ResyncStrategy};
use crate::types::{DecodedRecord, HousekeepingSample, RawFrame, ScienceSample};
use alloc::vec::Vec;
use core::iter::FusedIterator;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

/// A frame found at a specific offset in the buffer
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedFrame<'a> {
    /// Cursor offset of the stride that produced this frame
    pub offset: usize,

    /// The frame, borrowed when aligned and owned when spliced
    pub frame: RawFrame<'a>,

    /// Set when the frame was rebuilt by the resynchronizer
    pub strategy: Option<ResyncStrategy>,
}

/// Why a stride produced no frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No primary marker at the cursor
    NoPrimarySync,
    /// Secondary marker missing too close to the end of the buffer
    NearTail,
    /// Secondary marker missing and no hypothesis matched
    Unrecoverable,
}

/// Outcome of one scan stride
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStep<'a> {
    /// A frame, aligned or recovered
    Frame(LocatedFrame<'a>),
    /// A stride with no usable frame
    Skipped {
        /// Cursor offset of the stride
        offset: usize,
        /// Why it was skipped
        reason: SkipReason,
    },
}

/// Iterator over the scan strides of a buffer
#[derive(Debug, Clone)]
pub struct FrameScanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameScanner<'a> {
    /// Start scanning at the beginning of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed; once exhausted, these are the discarded tail
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn step_at(&self, offset: usize) -> ScanStep<'a> {
        let data: &'a [u8] = self.data;
        let window: &'a [u8; FRAME_LEN] = match data
            .get(offset..offset + FRAME_LEN)
            .and_then(|w| w.try_into().ok())
        {
            Some(window) => window,
            None => return skip(offset, SkipReason::NearTail),
        };

        let frame = RawFrame::borrowed(window);
        if !frame.has_primary_sync() {
            return skip(offset, SkipReason::NoPrimarySync);
        }
        if frame.has_secondary_sync() {
            return ScanStep::Frame(LocatedFrame {
                offset,
                frame,
                strategy: None,
            });
        }

        match resynchronize(data, offset) {
            ResyncOutcome::Recovered(recovered) => ScanStep::Frame(LocatedFrame {
                offset,
                frame: recovered.frame,
                strategy: Some(recovered.strategy),
            }),
            ResyncOutcome::NearTail => skip(offset, SkipReason::NearTail),
            ResyncOutcome::Unrecoverable => {
                #[cfg(feature = "logging")]
                warn!("Dropping unrecoverable frame at offset {}", offset);

                skip(offset, SkipReason::Unrecoverable)
            }
        }
    }
}

fn skip<'a>(offset: usize, reason: SkipReason) -> ScanStep<'a> {
    #[cfg(feature = "logging")]
    trace!("Skipped stride at offset {}: {:?}", offset, reason);

    ScanStep::Skipped { offset, reason }
}

impl<'a> Iterator for FrameScanner<'a> {
    type Item = ScanStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() < FRAME_LEN {
            return None;
        }

        let step = self.step_at(self.pos);
        // Every path advances one full stride
        self.pos += FRAME_LEN;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let strides = self.remaining() / FRAME_LEN;
        (strides, Some(strides))
    }
}

impl ExactSizeIterator for FrameScanner<'_> {}

impl FusedIterator for FrameScanner<'_> {}

/// Scan a buffer and collect every usable frame in cursor order
pub fn scan_frames(data: &[u8]) -> Vec<LocatedFrame<'_>> {
    FrameScanner::new(data)
        .filter_map(|step| match step {
            ScanStep::Frame(located) => Some(located),
            ScanStep::Skipped { .. } => None,
        })
        .collect()
}

/// Decode statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Total bytes in the buffer
    pub bytes_scanned: usize,

    /// Frames read in place
    pub frames_aligned: usize,

    /// Frames rebuilt by forward search
    pub recovered_forward: usize,

    /// Frames rebuilt by backward shifts of 1, 2 and 3 bytes
    pub recovered_backward: [usize; 3],

    /// Strides without a primary marker
    pub skipped_no_sync: usize,

    /// Strides skipped by the near-tail guard
    pub skipped_near_tail: usize,

    /// Strides where no hypothesis matched
    pub skipped_unrecoverable: usize,

    /// Bytes after the last full stride
    pub tail_bytes_discarded: usize,

    /// Science records produced
    pub science_records: usize,

    /// Housekeeping records produced
    pub housekeeping_records: usize,

    /// Frames whose fields could not be extracted
    pub unclassifiable: usize,
}

impl DecodeStats {
    /// Frames rebuilt by any hypothesis
    pub fn frames_recovered(&self) -> usize {
        self.recovered_forward + self.recovered_backward.iter().sum::<usize>()
    }

    /// Frames found, aligned or recovered
    pub fn frames_found(&self) -> usize {
        self.frames_aligned + self.frames_recovered()
    }

    /// Strides that produced no frame
    pub fn strides_skipped(&self) -> usize {
        self.skipped_no_sync + self.skipped_near_tail + self.skipped_unrecoverable
    }

    /// Share of scanned bytes that ended up in a record, as a percentage
    pub fn recovery_rate(&self) -> f64 {
        if self.bytes_scanned == 0 {
            0.0
        } else {
            let records = self.science_records + self.housekeeping_records;
            (records * FRAME_LEN) as f64 / self.bytes_scanned as f64 * 100.0
        }
    }

    fn record_step(&mut self, step: &ScanStep<'_>) {
        match step {
            ScanStep::Frame(located) => match located.strategy {
                None => self.frames_aligned += 1,
                Some(ResyncStrategy::ForwardSearch(_)) => self.recovered_forward += 1,
                Some(ResyncStrategy::BackwardShift(shift)) => {
                    let slot = usize::from(shift)
                        .checked_sub(1)
                        .and_then(|i| self.recovered_backward.get_mut(i));
                    if let Some(slot) = slot {
                        *slot += 1;
                    }
                }
            },
            ScanStep::Skipped { reason, .. } => match reason {
                SkipReason::NoPrimarySync => self.skipped_no_sync += 1,
                SkipReason::NearTail => self.skipped_near_tail += 1,
                SkipReason::Unrecoverable => self.skipped_unrecoverable += 1,
            },
        }
    }

    fn record_decoded(&mut self, record: &DecodedRecord) {
        match record {
            DecodedRecord::Science(_) => self.science_records += 1,
            DecodedRecord::Housekeeping(_) => self.housekeeping_records += 1,
            DecodedRecord::Unclassifiable => self.unclassifiable += 1,
        }
    }
}

/// Decode a whole buffer into records in discovery order
///
/// Never fails: damaged regions only reduce the number of records.
pub fn decode_buffer(data: &[u8]) -> Vec<DecodedRecord> {
    decode_buffer_with_stats(data).0
}

/// Decode a whole buffer, also reporting what happened to every stride
pub fn decode_buffer_with_stats(data: &[u8]) -> (Vec<DecodedRecord>, DecodeStats) {
    #[cfg(feature = "logging")]
    debug!("Starting decode of {} bytes", data.len());

    let mut stats = DecodeStats {
        bytes_scanned: data.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(data.len() / FRAME_LEN);

    let mut scanner = FrameScanner::new(data);
    for step in scanner.by_ref() {
        stats.record_step(&step);

        if let ScanStep::Frame(located) = step {
            let record = decode_frame(&located.frame);
            stats.record_decoded(&record);
            if !matches!(record, DecodedRecord::Unclassifiable) {
                records.push(record);
            }
        }
    }
    stats.tail_bytes_discarded = scanner.remaining();

    #[cfg(feature = "logging")]
    debug!(
        "Decode complete: {} science, {} housekeeping, {} recovered, {} strides skipped",
        stats.science_records,
        stats.housekeeping_records,
        stats.frames_recovered(),
        stats.strides_skipped()
    );

    (records, stats)
}

/// Science samples only, in discovery order
pub fn science_samples(data: &[u8]) -> Vec<ScienceSample> {
    scan_frames(data)
        .iter()
        .filter_map(|located| decode_science(&located.frame))
        .collect()
}

/// Housekeeping samples only, in discovery order
pub fn housekeeping_samples(data: &[u8]) -> Vec<HousekeepingSample> {
    scan_frames(data)
        .iter()
        .filter_map(|located| decode_housekeeping(&located.frame))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FrameBuilder;

    fn science(time: f64, counts: [u16; 4]) -> [u8; FRAME_LEN] {
        FrameBuilder::new(time).science(counts).build().unwrap()
    }

    fn housekeeping(time: f64, channel_id: u8) -> [u8; FRAME_LEN] {
        FrameBuilder::new(time)
            .housekeeping(channel_id, 0x123, [1, 2, 3])
            .build()
            .unwrap()
    }

    #[test]
    fn test_scan_clean_stream() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&science(1.0, [1, 2, 3, 4]));
        stream.extend_from_slice(&housekeeping(2.0, 4));
        stream.extend_from_slice(&science(3.0, [5, 6, 7, 8]));

        let frames = scan_frames(&stream);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].offset, FRAME_LEN);
        assert!(frames.iter().all(|f| f.strategy.is_none()));
        assert!(frames.iter().all(|f| !f.frame.is_spliced()));
    }

    #[test]
    fn test_scan_skips_garbage_stride() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&science(1.0, [1, 2, 3, 4]));
        stream.extend_from_slice(&[0xEE; FRAME_LEN]);
        stream.extend_from_slice(&science(3.0, [5, 6, 7, 8]));

        let steps: Vec<_> = FrameScanner::new(&stream).collect();

        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[1],
            ScanStep::Skipped {
                offset: FRAME_LEN,
                reason: SkipReason::NoPrimarySync
            }
        );
    }

    #[test]
    fn test_tail_is_discarded() {
        let mut stream = science(1.0, [1, 2, 3, 4]).to_vec();
        stream.extend_from_slice(&science(2.0, [1, 2, 3, 4])[..20]);

        let (records, stats) = decode_buffer_with_stats(&stream);

        assert_eq!(records.len(), 1);
        assert_eq!(stats.tail_bytes_discarded, 20);
        assert_eq!(stats.strides_skipped(), 0);
    }

    #[test]
    fn test_near_tail_guard() {
        let mut stream = science(1.0, [1, 2, 3, 4]).to_vec();
        let mut broken = science(2.0, [1, 2, 3, 4]);
        broken[12] = 0x00;
        stream.extend_from_slice(&broken);

        let (records, stats) = decode_buffer_with_stats(&stream);

        assert_eq!(records.len(), 1);
        assert_eq!(stats.skipped_near_tail, 1);
    }

    #[test]
    fn test_stats_and_splitters() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&science(1.0, [1, 2, 3, 4]));
        stream.extend_from_slice(&housekeeping(2.0, 10));
        stream.extend_from_slice(&housekeeping(3.0, 0));

        let (records, stats) = decode_buffer_with_stats(&stream);

        assert_eq!(records.len(), 3);
        assert_eq!(stats.frames_aligned, 3);
        assert_eq!(stats.science_records, 1);
        assert_eq!(stats.housekeeping_records, 2);
        assert!(stats.recovery_rate() > 99.0);

        assert_eq!(science_samples(&stream).len(), 1);
        let hk = housekeeping_samples(&stream);
        assert_eq!(hk.len(), 2);
        assert_eq!(hk[0].raw_value, 0x123);
        assert_eq!(hk[1].raw_value, 0x1230);
    }

    #[test]
    fn test_scanner_is_exact_size() {
        let data = [0u8; FRAME_LEN * 3 + 5];
        let scanner = FrameScanner::new(&data);
        assert_eq!(scanner.len(), 3);
        assert_eq!(scanner.count(), 3);
    }

    #[test]
    fn test_empty_and_short_buffers() {
        assert!(decode_buffer(&[]).is_empty());
        assert!(decode_buffer(&science(1.0, [0; 4])[..FRAME_LEN - 1]).is_empty());
    }
}
