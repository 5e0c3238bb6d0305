use crate::{OutputFormat, RecordKind};
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lexiframe_core::{decode_buffer_with_stats, DecodedRecord};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tracing::{info, warn};

pub fn execute(
    inputs: &[String],
    output: &str,
    format: OutputFormat,
    kind: RecordKind,
) -> Result<()> {
    if inputs.is_empty() {
        bail!("No input files given");
    }

    info!("Decoding {} capture(s) into {}", inputs.len(), output);

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .with_context(|| "Invalid progress template")?,
    );

    let mut records: Vec<DecodedRecord> = Vec::new();
    for input in inputs {
        progress.set_message(input.clone());

        let data =
            fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?;
        let (decoded, stats) = decode_buffer_with_stats(&data);

        if stats.strides_skipped() > 0 {
            warn!(
                "{}: {} of {} frame slots skipped",
                input,
                stats.strides_skipped(),
                stats.frames_found() + stats.strides_skipped()
            );
        }
        info!(
            "{}: {} science, {} housekeeping, {} recovered",
            input,
            stats.science_records,
            stats.housekeeping_records,
            stats.frames_recovered()
        );

        records.extend(decoded.into_iter().filter(|record| kind.accepts(record)));
        progress.inc(1);
    }
    progress.finish_and_clear();

    write_records(&records, output, format)?;

    info!("Wrote {} records to {}", records.len(), output);

    Ok(())
}

fn write_records(records: &[DecodedRecord], output: &str, format: OutputFormat) -> Result<()> {
    let file =
        File::create(output).with_context(|| format!("Failed to create output file: {}", output))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)
                .with_context(|| "Failed to serialize records")?;
        }
        OutputFormat::Jsonl => {
            for record in records {
                serde_json::to_writer(&mut writer, record)
                    .with_context(|| "Failed to serialize record")?;
                writeln!(writer)?;
            }
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", output))?;
    Ok(())
}
