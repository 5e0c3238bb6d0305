use anyhow::Result;
use clap::{Parser, Subcommand};
use lexiframe_cli::{commands, OutputFormat, RecordKind};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lexiframe")]
#[command(about = "Lexiframe - LEXI relay telemetry decoder", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a capture and report what happened to every frame slot
    Scan {
        /// Input capture file
        #[arg(short, long)]
        input: String,

        /// Output JSON file for the scan steps
        #[arg(short, long)]
        output: Option<String>,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,
    },

    /// Decode captures into science and housekeeping records
    Decode {
        /// Input capture files
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<String>,

        /// Output file for the decoded records
        #[arg(short, long)]
        output: String,

        /// Output serialization
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Which records to keep
        #[arg(long, value_enum, default_value_t = RecordKind::All)]
        kind: RecordKind,
    },

    /// Pack JSON record descriptions into a binary capture
    Pack {
        /// Input JSON file (array of record descriptions)
        #[arg(short, long)]
        input: String,

        /// Output capture file
        #[arg(short, long)]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Scan {
            input,
            output,
            stats_only,
        } => commands::scan::execute(&input, output.as_deref(), stats_only),

        Commands::Decode {
            input,
            output,
            format,
            kind,
        } => commands::decode::execute(&input, &output, format, kind),

        Commands::Pack { input, output } => commands::pack::execute(&input, &output),
    }
}
