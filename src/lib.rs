//! mapbed: mappability FASTA to BED conversion
//!
//! Reads a FASTA file whose sequence holds one mappability code per base
//! and reports every maximal run of the uniquely mappable code (`3`) as a
//! BED3 interval.
//!
//! # Example
//!
//! ```rust,no_run
//! use mapbed::commands::ExtractCommand;
//!
//! let stats = ExtractCommand::new()
//!     .run("k100.umap.fa", "k100.unique.bed")
//!     .unwrap();
//! println!("{}", stats);
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod fasta;
pub mod interval;
pub mod runs;
pub mod streaming;

// Re-export commonly used types
pub use commands::{ExtractCommand, ExtractStats};
pub use config::TARGET_CODE;
pub use error::{MapbedError, Result};
pub use fasta::{FastaReader, SequenceRecord};
pub use interval::Interval;
pub use runs::{code_runs, CodeRuns};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
