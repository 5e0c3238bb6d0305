//! Library entry for lexiframe-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

/// Serialization used by decode output
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON array holding every record
    #[default]
    Json,
    /// One JSON record per line
    Jsonl,
}

/// Which records decode keeps
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RecordKind {
    /// Science and housekeeping
    #[default]
    All,
    /// Science events only
    Science,
    /// Housekeeping readings only
    Housekeeping,
}

impl RecordKind {
    /// Whether a decoded record passes this filter
    pub fn accepts(self, record: &lexiframe_core::DecodedRecord) -> bool {
        use lexiframe_core::DecodedRecord;

        match (self, record) {
            (_, DecodedRecord::Unclassifiable) => false,
            (RecordKind::All, _) => true,
            (RecordKind::Science, DecodedRecord::Science(_)) => true,
            (RecordKind::Housekeeping, DecodedRecord::Housekeeping(_)) => true,
            _ => false,
        }
    }
}
