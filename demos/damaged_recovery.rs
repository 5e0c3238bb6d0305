//! Example demonstrating recovery from a slipped relay stream

use lexiframe_core::{
    constants::{HEADER_LEN, INSTRUMENT_LEN, PRIMARY_SYNC},
    decode_buffer_with_stats,
    encoder::FrameBuilder,
};

fn relay_header(capture_time: f64) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..2].copy_from_slice(PRIMARY_SYNC);
    header[2..10].copy_from_slice(&capture_time.to_be_bytes());
    header
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Lexiframe Damaged Stream Recovery Example\n");

    // Step 1: Build the instrument side: 10 science packets
    println!("Step 1: Creating 10 instrument packets...");
    let mut instrument = Vec::new();
    for i in 0..10u16 {
        let frame = FrameBuilder::new(0.0)
            .timestamp_ticks(u32::from(i) * 100)
            .science([i, i + 1, i + 2, i + 3])
            .build()?;
        instrument.extend_from_slice(&frame[HEADER_LEN..]);
    }

    // Step 2: Simulate a relay byte slip
    println!("Step 2: Inserting 2 stray bytes ahead of the first packet...");
    instrument.splice(0..0, [0x13, 0x37]);

    // Step 3: Let the relay repack the stream into 28-byte frames
    println!("Step 3: Repacking into relay frames...");
    let mut stream = Vec::new();
    for (j, chunk) in instrument.chunks(INSTRUMENT_LEN).enumerate() {
        stream.extend_from_slice(&relay_header(1_700_000_000.0 + j as f64));
        stream.extend_from_slice(chunk);
        stream.resize(stream.len() + INSTRUMENT_LEN - chunk.len(), 0);
    }
    println!("Relayed stream: {} bytes\n", stream.len());

    // Step 4: Decode
    println!("Step 4: Decoding...");
    let (records, stats) = decode_buffer_with_stats(&stream);

    println!("Decode Results:");
    println!("  Bytes scanned:       {}", stats.bytes_scanned);
    println!("  Aligned frames:      {}", stats.frames_aligned);
    println!("  Recovered frames:    {}", stats.frames_recovered());
    println!("  Skipped strides:     {}", stats.strides_skipped());
    println!("  Science records:     {}", stats.science_records);

    println!("\nRecovered samples:");
    for record in &records {
        if let Some(sample) = record.as_science() {
            println!(
                "  t={:.3}s  ch1={:.6} V  captured at {}",
                sample.timestamp_seconds(),
                sample.channel1,
                sample.capture_time
            );
        }
    }

    println!(
        "\n✓ Recovered {}/10 packets despite the slip!",
        stats.science_records
    );

    Ok(())
}
