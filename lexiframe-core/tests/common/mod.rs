//! Helpers for building relay captures in tests

#![allow(dead_code)]

use lexiframe_core::constants::{FRAME_LEN, HEADER_LEN, INSTRUMENT_LEN, PRIMARY_SYNC};
use lexiframe_core::encoder::FrameBuilder;

/// Filler that can never form part of a sync marker
pub const FILLER: u8 = 0xAA;

/// A 12-byte relay header
pub fn relay_header(capture_time: f64) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..2].copy_from_slice(PRIMARY_SYNC);
    header[2..10].copy_from_slice(&capture_time.to_be_bytes());
    header
}

/// The instrument part (secondary marker onwards) of a science packet
pub fn science_packet(ticks: u32, counts: [u16; 4]) -> [u8; INSTRUMENT_LEN] {
    let frame = FrameBuilder::new(0.0)
        .timestamp_ticks(ticks)
        .science(counts)
        .build()
        .unwrap();
    let mut packet = [0u8; INSTRUMENT_LEN];
    packet.copy_from_slice(&frame[HEADER_LEN..]);
    packet
}

/// Pack an instrument byte stream into relay frames, padding the last one
///
/// Frame `j` gets capture time `j as f64`.
pub fn relay_frames(instrument: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for (j, chunk) in instrument.chunks(INSTRUMENT_LEN).enumerate() {
        out.extend_from_slice(&relay_header(j as f64));
        out.extend_from_slice(chunk);
        out.extend(std::iter::repeat(FILLER).take(INSTRUMENT_LEN - chunk.len()));
    }
    debug_assert_eq!(out.len() % FRAME_LEN, 0);
    out
}

/// Instrument stream with `slip` filler bytes inserted before the first packet
pub fn slipped_forward(packets: &[[u8; INSTRUMENT_LEN]], slip: usize) -> Vec<u8> {
    let mut instrument = vec![FILLER; slip];
    for packet in packets {
        instrument.extend_from_slice(packet);
    }
    relay_frames(&instrument)
}

/// Instrument stream where every packet starts `shift` bytes before a
/// relay frame boundary, followed by one padding frame
pub fn slipped_backward(packets: &[[u8; INSTRUMENT_LEN]], shift: usize) -> Vec<u8> {
    let mut instrument = vec![FILLER; INSTRUMENT_LEN - shift];
    for packet in packets {
        instrument.extend_from_slice(packet);
    }
    instrument.extend(std::iter::repeat(FILLER).take(shift + INSTRUMENT_LEN));
    relay_frames(&instrument)
}
