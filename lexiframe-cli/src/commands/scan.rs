use anyhow::{Context, Result};
use colored::*;
use lexiframe_core::{
    decode_buffer_with_stats,
    decoder::classify,
    resync::ResyncStrategy,
    scanner::{FrameScanner, ScanStep, SkipReason},
    FrameKind,
};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

/// One frame slot of the scan, as written to the JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanRecord {
    pub offset: usize,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ResyncStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FrameKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Aligned,
    Recovered,
    Skipped,
}

impl From<ScanStep<'_>> for ScanRecord {
    fn from(step: ScanStep<'_>) -> Self {
        match step {
            ScanStep::Frame(located) => ScanRecord {
                offset: located.offset,
                outcome: if located.strategy.is_some() {
                    Outcome::Recovered
                } else {
                    Outcome::Aligned
                },
                strategy: located.strategy,
                reason: None,
                kind: Some(classify(&located.frame)),
                frame: Some(hex::encode(located.frame.as_bytes())),
            },
            ScanStep::Skipped { offset, reason } => ScanRecord {
                offset,
                outcome: Outcome::Skipped,
                strategy: None,
                reason: Some(reason),
                kind: None,
                frame: None,
            },
        }
    }
}

pub fn execute(input: &str, output: Option<&str>, stats_only: bool) -> Result<()> {
    info!("Scanning file: {}", input);

    // Read input file
    let data = fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?;

    info!("File size: {} bytes", data.len());

    let (_, stats) = decode_buffer_with_stats(&data);

    // Print statistics
    println!("\n=== Scan Results ===");
    println!("Bytes scanned:     {} bytes", stats.bytes_scanned);
    println!("Aligned frames:    {}", stats.frames_aligned);
    println!(
        "Recovered frames:  {} (forward {}, backward {:?})",
        stats.frames_recovered().to_string().green(),
        stats.recovered_forward,
        stats.recovered_backward
    );
    if stats.strides_skipped() > 0 {
        println!(
            "Skipped strides:   {} (no sync {}, near tail {}, unrecoverable {})",
            stats.strides_skipped().to_string().red(),
            stats.skipped_no_sync,
            stats.skipped_near_tail,
            stats.skipped_unrecoverable
        );
    } else {
        println!("Skipped strides:   0");
    }
    println!("Science records:   {}", stats.science_records);
    println!("Housekeeping:      {}", stats.housekeeping_records);
    println!("Tail discarded:    {} bytes", stats.tail_bytes_discarded);
    println!("Recovery rate:     {:.2}%", stats.recovery_rate());
    println!();

    if stats_only {
        return Ok(());
    }

    let records: Vec<ScanRecord> = FrameScanner::new(&data).map(ScanRecord::from).collect();

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&records)
            .with_context(|| "Failed to serialize scan steps")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Scan steps written to: {}", output_path);
    } else {
        println!("=== Frame Slots ===");
        for record in &records {
            match (record.outcome, record.kind) {
                (Outcome::Skipped, _) => println!(
                    "{} @ offset {}: {:?}",
                    "skipped".red(),
                    record.offset,
                    record.reason
                ),
                (outcome, kind) => println!(
                    "{:?} {:?} @ offset {}",
                    outcome,
                    kind,
                    record.offset
                ),
            }
        }
    }

    Ok(())
}
