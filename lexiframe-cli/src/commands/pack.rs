use anyhow::{Context, Result};
use lexiframe_core::encoder::FrameBuilder;
use serde::Deserialize;
use std::fs;
use tracing::info;

/// One record description in the pack input
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordSpec {
    Science {
        capture_time: f64,
        #[serde(default)]
        timestamp_ticks: u32,
        #[serde(default)]
        commanded: bool,
        counts: [u16; 4],
    },
    Housekeeping {
        capture_time: f64,
        #[serde(default)]
        timestamp_ticks: u32,
        channel_id: u8,
        value: u16,
        #[serde(default)]
        deltas: [u16; 3],
    },
}

impl RecordSpec {
    fn builder(&self) -> FrameBuilder {
        match *self {
            RecordSpec::Science {
                capture_time,
                timestamp_ticks,
                commanded,
                counts,
            } => FrameBuilder::new(capture_time)
                .timestamp_ticks(timestamp_ticks)
                .commanded(commanded)
                .science(counts),
            RecordSpec::Housekeeping {
                capture_time,
                timestamp_ticks,
                channel_id,
                value,
                deltas,
            } => FrameBuilder::new(capture_time)
                .timestamp_ticks(timestamp_ticks)
                .housekeeping(channel_id, value, deltas),
        }
    }
}

pub fn execute(input: &str, output: &str) -> Result<()> {
    info!("Packing records from {} to {}", input, output);

    // Read input JSON
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let specs: Vec<RecordSpec> =
        serde_json::from_str(&content).with_context(|| "Failed to parse JSON input")?;

    info!("Found {} records to pack", specs.len());

    let mut output_data = Vec::new();
    for (i, spec) in specs.iter().enumerate() {
        let frame = spec
            .builder()
            .build()
            .with_context(|| format!("Failed to build frame {}", i))?;
        output_data.extend_from_slice(&frame);
    }

    // Write output file
    fs::write(output, &output_data)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Successfully packed {} frames ({} bytes total)",
        specs.len(),
        output_data.len()
    );

    Ok(())
}
