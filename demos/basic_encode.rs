//! Basic encoding example

use lexiframe_core::encoder::FrameBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Lexiframe Basic Encoding Example\n");

    let start = 1_700_000_000.0;
    let mut output = Vec::new();

    for i in 0..16u16 {
        let builder = FrameBuilder::new(start + f64::from(i) * 0.25)
            .timestamp_ticks(u32::from(i) * 250);

        // One housekeeping reading every fourth frame, cycling through channels
        let builder = if i % 4 == 0 {
            builder.housekeeping((i / 4) as u8, 0x800 + i, [i, 0, 0])
        } else {
            builder.science([1000 * i, 2000, 3000, 4000])
        };

        let frame = builder.build()?;
        println!("Frame {:2}: {}", i, hex::encode(frame));
        output.extend_from_slice(&frame);
    }

    std::fs::write("example_output.lxi", &output)?;

    println!("\nWrote {} bytes to example_output.lxi", output.len());
    println!("Use 'lexiframe scan --input example_output.lxi' to read it back");

    Ok(())
}
