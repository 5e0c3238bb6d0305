//! # Lexiframe Core
//!
//! Decoder for the LEXI instrument telemetry stream: fixed 28-byte relay
//! frames carrying interleaved science and housekeeping packets, recovered
//! even when the instrument stream slips against the relay stride.
//!
//! ## Modules
//!
//! - `constants`: Wire format constants and the control word
//! - `types`: Raw frames and decoded records
//! - `decoder`: Classification and field decoding
//! - `resync`: Recovery hypotheses for displaced frames
//! - `scanner`: Buffer scanning and whole-buffer decoding
//! - `encoder`: Synthetic frame encoding
//!
//! Decoding is a pure function of the input buffer; captures can be decoded
//! independently on any number of threads.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod resync;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::FrameError;
pub use scanner::{decode_buffer, decode_buffer_with_stats, DecodeStats};
pub use types::{DecodedRecord, FrameKind, HousekeepingSample, RawFrame, ScienceSample};

/// Result type alias for Lexiframe operations
pub type Result<T> = core::result::Result<T, FrameError>;
