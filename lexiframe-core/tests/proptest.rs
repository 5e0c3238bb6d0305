//! Property-based tests using proptest

mod common;

use common::{science_packet, slipped_backward, slipped_forward};
use lexiframe_core::{
    constants::{FRAME_LEN, PRIMARY_SYNC, SECONDARY_SYNC, VOLTS_PER_COUNT},
    decode_buffer, decode_buffer_with_stats,
    decoder::{decode_frame, decode_housekeeping, decode_science},
    encoder::FrameBuilder,
    scanner::FrameScanner,
    DecodedRecord, RawFrame,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum FrameSpec {
    Science {
        ticks: u32,
        commanded: bool,
        counts: [u16; 4],
    },
    Housekeeping {
        ticks: u32,
        channel_id: u8,
        value: u16,
        deltas: [u16; 3],
    },
}

fn frame_spec() -> impl Strategy<Value = FrameSpec> {
    prop_oneof![
        (0u32..0x4000_0000, any::<bool>(), any::<[u16; 4]>()).prop_map(
            |(ticks, commanded, counts)| FrameSpec::Science {
                ticks,
                commanded,
                counts
            }
        ),
        (0u32..0x4000_0000, 0u8..16, 0u16..0x1000, any::<[u16; 3]>()).prop_map(
            |(ticks, channel_id, value, deltas)| FrameSpec::Housekeeping {
                ticks,
                channel_id,
                value,
                deltas
            }
        ),
    ]
}

fn encode(spec: &FrameSpec, capture_time: f64) -> [u8; FRAME_LEN] {
    let builder = FrameBuilder::new(capture_time);
    let builder = match *spec {
        FrameSpec::Science {
            ticks,
            commanded,
            counts,
        } => builder
            .timestamp_ticks(ticks)
            .commanded(commanded)
            .science(counts),
        FrameSpec::Housekeeping {
            ticks,
            channel_id,
            value,
            deltas,
        } => builder
            .timestamp_ticks(ticks)
            .housekeeping(channel_id, value, deltas),
    };
    builder.build().unwrap()
}

/// Counts and ticks small enough that payload bytes can never form a marker
fn quiet_packet() -> impl Strategy<Value = [u8; 16]> {
    (0u32..0x8000, prop::array::uniform4(0u16..0x4000))
        .prop_map(|(ticks, counts)| science_packet(ticks, counts))
}

proptest! {
    #[test]
    fn prop_decode_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..4096)
    ) {
        let records = decode_buffer(&data);
        prop_assert!(records.len() <= data.len() / FRAME_LEN);
    }

    #[test]
    fn prop_marker_rich_data_never_panics(
        chunks in prop::collection::vec(
            prop_oneof![
                Just(PRIMARY_SYNC.to_vec()),
                Just(SECONDARY_SYNC.to_vec()),
                Just(SECONDARY_SYNC[1..].to_vec()),
                prop::collection::vec(any::<u8>(), 0..30),
            ],
            0..200
        )
    ) {
        let data: Vec<u8> = chunks.concat();
        let (records, stats) = decode_buffer_with_stats(&data);

        prop_assert_eq!(stats.frames_found() + stats.strides_skipped(), data.len() / FRAME_LEN);
        prop_assert_eq!(stats.tail_bytes_discarded, data.len() % FRAME_LEN);
        prop_assert_eq!(
            records.len(),
            stats.science_records + stats.housekeeping_records
        );
    }

    #[test]
    fn prop_every_stride_consumed(
        data in prop::collection::vec(any::<u8>(), 0..2048)
    ) {
        let mut scanner = FrameScanner::new(&data);
        let mut expected = 0;
        while let Some(_) = scanner.next() {
            expected += FRAME_LEN;
            prop_assert_eq!(scanner.position(), expected);
        }
        prop_assert!(scanner.remaining() < FRAME_LEN);
    }

    #[test]
    fn prop_round_trip(
        specs in prop::collection::vec(frame_spec(), 0..64),
        base_time in 0.0f64..2e9
    ) {
        let mut stream = Vec::new();
        for (i, spec) in specs.iter().enumerate() {
            stream.extend_from_slice(&encode(spec, base_time + i as f64));
        }

        let records = decode_buffer(&stream);
        prop_assert_eq!(records.len(), specs.len());

        for (i, (record, spec)) in records.iter().zip(&specs).enumerate() {
            prop_assert_eq!(record.capture_time(), Some(base_time + i as f64));
            match (record, spec) {
                (DecodedRecord::Science(s), FrameSpec::Science { ticks, commanded, counts }) => {
                    prop_assert_eq!(s.timestamp_ticks, *ticks);
                    prop_assert_eq!(s.is_commanded, *commanded);
                    prop_assert_eq!(s.channel1, f64::from(counts[0]) * VOLTS_PER_COUNT);
                    prop_assert_eq!(s.channel4, f64::from(counts[3]) * VOLTS_PER_COUNT);
                }
                (
                    DecodedRecord::Housekeeping(h),
                    FrameSpec::Housekeeping { ticks, channel_id, deltas, .. },
                ) => {
                    prop_assert_eq!(h.timestamp_ticks, *ticks);
                    prop_assert_eq!(h.channel_id, *channel_id);
                    prop_assert_eq!(h.delta_event_count, u32::from(deltas[0]));
                    prop_assert_eq!(h.delta_lost_count, u32::from(deltas[2]));
                }
                (record, spec) => {
                    prop_assert!(false, "kind mismatch: {:?} vs {:?}", record, spec);
                }
            }
        }
    }

    #[test]
    fn prop_hk_shift_exception(channel_id in 0u8..16, value in 0u16..0x1000) {
        let bytes = FrameBuilder::new(0.0)
            .housekeeping(channel_id, value, [0; 3])
            .build()
            .unwrap();
        let frame = RawFrame::from_slice(&bytes).unwrap();
        let sample = decode_housekeeping(&frame).unwrap();

        if channel_id == 10 || channel_id == 11 {
            prop_assert_eq!(sample.raw_value, value);
        } else {
            prop_assert_eq!(sample.raw_value, value << 4);
        }
    }

    #[test]
    fn prop_mutual_exclusivity(body in any::<[u8; 12]>(), time in any::<[u8; 10]>()) {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[..2].copy_from_slice(PRIMARY_SYNC);
        bytes[2..12].copy_from_slice(&time);
        bytes[12..16].copy_from_slice(SECONDARY_SYNC);
        bytes[16..].copy_from_slice(&body);
        let frame = RawFrame::from_slice(&bytes).unwrap();

        let science = decode_science(&frame);
        let housekeeping = decode_housekeeping(&frame);

        prop_assert!(science.is_some() != housekeeping.is_some());
        prop_assert!(!matches!(decode_frame(&frame), DecodedRecord::Unclassifiable));
    }

    #[test]
    fn prop_forward_slip_recovers(
        packets in prop::collection::vec(quiet_packet(), 1..12),
        slip in 1usize..=3
    ) {
        let stream = slipped_forward(&packets, slip);
        let records = decode_buffer(&stream);

        prop_assert_eq!(records.len(), packets.len());
        for (record, packet) in records.iter().zip(&packets) {
            let expected = u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]);
            prop_assert_eq!(record.as_science().unwrap().timestamp_ticks, expected);
        }
    }

    #[test]
    fn prop_backward_slip_recovers(
        packets in prop::collection::vec(quiet_packet(), 1..12),
        shift in 1usize..=3
    ) {
        let stream = slipped_backward(&packets, shift);
        let records = decode_buffer(&stream);

        prop_assert_eq!(records.len(), packets.len());
        for (record, packet) in records.iter().zip(&packets) {
            let expected = u16::from_be_bytes([packet[8], packet[9]]);
            prop_assert_eq!(
                record.as_science().unwrap().channel1,
                f64::from(expected) * VOLTS_PER_COUNT
            );
        }
    }
}
