//! Streaming output utilities.
//!
//! Records are converted and written as they are read, so memory stays
//! bounded by the longest single FASTA record.

pub mod output;

pub use output::BedWriter;
