//! Error types shared by the FASTA reader, the BED writer and the extractor.

use std::io;
use thiserror::Error;

/// Errors that can occur while converting a mappability FASTA to BED.
#[derive(Error, Debug)]
pub enum MapbedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed FASTA. `record` is the 1-based ordinal of the record being read.
    #[error("Parse error in FASTA record {record}: {message}")]
    Parse { record: usize, message: String },
}

pub type Result<T> = std::result::Result<T, MapbedError>;

/// Message `bio::io::fasta` uses when a record does not start with `>`.
const MISSING_HEADER_MESSAGE: &str = "Expected > at record start.";

impl MapbedError {
    /// Classify an error raised by the FASTA parser.
    ///
    /// Invalid UTF-8 surfaces as `InvalidData`. `bio` reports a line that
    /// should start a record but lacks `>` as an `Other` error carrying
    /// [`MISSING_HEADER_MESSAGE`]; any other `Other` error came from the source
    /// itself and stays an I/O failure.
    pub(crate) fn from_fasta(err: io::Error, record: usize) -> Self {
        let is_format_error = match err.kind() {
            io::ErrorKind::InvalidData => true,
            io::ErrorKind::Other => err.to_string() == MISSING_HEADER_MESSAGE,
            _ => false,
        };
        if is_format_error {
            MapbedError::Parse {
                record,
                message: err.to_string(),
            }
        } else {
            MapbedError::Io(err)
        }
    }
}
