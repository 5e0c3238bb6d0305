//! Fuzz entry points for lexiframe-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_scan

use lexiframe_core::{
    constants::FRAME_LEN, decode_buffer_with_stats, decoder::decode_frame, resync::resynchronize,
    RawFrame,
};

/// Decode one frame-sized input; never panics
pub fn fuzz_decode(data: &[u8]) {
    if let Ok(frame) = RawFrame::from_slice(data) {
        let _ = decode_frame(&frame);
    }
}

/// Decode a whole buffer and check every stride is accounted for
pub fn fuzz_scan(data: &[u8]) {
    let (records, stats) = decode_buffer_with_stats(data);

    assert!(records.len() <= data.len() / FRAME_LEN);
    assert_eq!(
        stats.frames_found() + stats.strides_skipped(),
        data.len() / FRAME_LEN
    );
}

/// Run the recovery hypotheses at every cursor of the input
pub fn fuzz_resync(data: &[u8]) {
    for cursor in 0..data.len() {
        let _ = resynchronize(data, cursor);
    }
}
