//! Extract command implementation.
//!
//! Converts a mappability FASTA (one code per base) into BED3 intervals
//! covering every maximal run of [`TARGET_CODE`].
//!
//! # Algorithm
//!
//! For each record, in input order:
//! 1. Scan the codes left to right (see [`crate::runs`])
//! 2. Emit `(id, start, end)` for each run as soon as it closes
//! 3. Drop the record before reading the next one
//!
//! No state crosses a record boundary, so a run open at the end of one
//! record is closed at that record's length.
//!
//! # Memory Complexity
//!
//! O(L) where L is the length of the longest record.

use crate::config::{input_buffer_size, output_buffer_size, TARGET_CODE};
use crate::error::Result;
use crate::fasta::{FastaReader, SequenceRecord};
use crate::interval::Interval;
use crate::runs::code_runs;
use crate::streaming::BedWriter;
use log::{debug, info};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Extract command configuration.
#[derive(Debug, Clone, Default)]
pub struct ExtractCommand {
    /// Use smaller I/O buffers
    pub low_memory: bool,
}

impl ExtractCommand {
    pub fn new() -> Self {
        Self { low_memory: false }
    }

    /// Set low-memory buffering (builder pattern).
    pub fn with_low_memory(mut self, low_memory: bool) -> Self {
        self.low_memory = low_memory;
        self
    }

    /// Convert the FASTA at `input` into a BED file at `output`.
    ///
    /// The input is opened first, so a missing input never truncates an
    /// existing output file.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ExtractStats> {
        let input = input.as_ref();
        let output = output.as_ref();
        info!(
            "Extracting code '{}' runs from {} into {}",
            TARGET_CODE as char,
            input.display(),
            output.display()
        );

        let file = File::open(input)?;
        let reader = FastaReader::with_capacity(input_buffer_size(self.low_memory), file);
        let mut out = File::create(output)?;
        self.run_streaming(reader, &mut out)
    }

    /// Read FASTA from stdin.
    pub fn run_stdin<W: Write>(&self, output: &mut W) -> Result<ExtractStats> {
        info!("Extracting code '{}' runs from stdin", TARGET_CODE as char);
        let stdin = io::stdin();
        let reader = FastaReader::with_capacity(input_buffer_size(self.low_memory), stdin.lock());
        self.run_streaming(reader, output)
    }

    /// Core streaming loop: one record in memory at a time.
    pub fn run_streaming<R: Read, W: Write>(
        &self,
        mut reader: FastaReader<R>,
        output: &mut W,
    ) -> Result<ExtractStats> {
        let mut stats = ExtractStats::default();
        let mut writer = BedWriter::with_capacity(output_buffer_size(self.low_memory), output);

        while let Some(record) = reader.read_record()? {
            stats.records_read += 1;
            stats.bases_scanned += record.len() as u64;

            let before = writer.rows_written();
            for interval in record_intervals(&record) {
                writer.write_interval(&interval)?;
                stats.bases_covered += interval.len();
            }
            let emitted = writer.rows_written() - before;
            stats.intervals_written += emitted;

            debug!("{}: {} bases, {} intervals", record.id(), record.len(), emitted);
        }

        writer.flush()?;
        info!("Extraction complete: {}", stats);
        Ok(stats)
    }

    /// Intervals for a single record, in ascending order.
    pub fn extract_record(&self, record: &SequenceRecord) -> Vec<Interval> {
        record_intervals(record).collect()
    }
}

/// Target-code runs of one record as intervals named after the record.
fn record_intervals(record: &SequenceRecord) -> impl Iterator<Item = Interval> + '_ {
    code_runs(record.seq()).map(move |(start, end)| {
        let interval = Interval::new(record.id(), start, end);
        debug_assert!(!interval.is_empty());
        interval
    })
}

/// Statistics from an extract run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractStats {
    /// Number of FASTA records read
    pub records_read: usize,
    /// Number of BED rows written
    pub intervals_written: usize,
    /// Total sequence length across records
    pub bases_scanned: u64,
    /// Bases inside written intervals
    pub bases_covered: u64,
}

impl ExtractStats {
    /// Fraction of scanned bases carrying the target code.
    pub fn coverage_fraction(&self) -> f64 {
        if self.bases_scanned == 0 {
            0.0
        } else {
            self.bases_covered as f64 / self.bases_scanned as f64
        }
    }
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Records: {}, Intervals: {}, Bases: {}, Covered: {} ({:.2}%)",
            self.records_read,
            self.intervals_written,
            self.bases_scanned,
            self.bases_covered,
            self.coverage_fraction() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapbedError;

    fn extract(content: &str) -> (String, ExtractStats) {
        let cmd = ExtractCommand::new();
        let reader = FastaReader::new(content.as_bytes());
        let mut output = Vec::new();
        let stats = cmd.run_streaming(reader, &mut output).unwrap();
        (String::from_utf8(output).unwrap(), stats)
    }

    #[test]
    fn test_single_record() {
        let (bed, stats) = extract(">chr1\nAA333AA33A\n");
        assert_eq!(bed, "chr1\t2\t5\nchr1\t7\t9\n");
        assert_eq!(stats.records_read, 1);
        assert_eq!(stats.intervals_written, 2);
        assert_eq!(stats.bases_scanned, 10);
        assert_eq!(stats.bases_covered, 5);
    }

    #[test]
    fn test_all_target() {
        let (bed, _) = extract(">chr2\n3333333\n");
        assert_eq!(bed, "chr2\t0\t7\n");
    }

    #[test]
    fn test_no_target() {
        let (bed, stats) = extract(">chr3\n0120120\n");
        assert!(bed.is_empty());
        assert_eq!(stats.records_read, 1);
        assert_eq!(stats.intervals_written, 0);
    }

    #[test]
    fn test_empty_sequence() {
        let (bed, stats) = extract(">chrM\n");
        assert!(bed.is_empty());
        assert_eq!(stats.records_read, 1);
        assert_eq!(stats.bases_scanned, 0);
    }

    #[test]
    fn test_empty_input() {
        let (bed, stats) = extract("");
        assert!(bed.is_empty());
        assert_eq!(stats, ExtractStats::default());
    }

    #[test]
    fn test_run_does_not_leak_across_records() {
        // chr1 ends inside a run and chr2 starts inside one
        let (bed, _) = extract(">chr1\n0033\n>chr2\n3300\n");
        assert_eq!(bed, "chr1\t2\t4\nchr2\t0\t2\n");
    }

    #[test]
    fn test_multiline_record_runs_span_lines() {
        let (bed, _) = extract(">chr1\n0003\n3330\n0333\n");
        assert_eq!(bed, "chr1\t3\t7\nchr1\t9\t12\n");
    }

    #[test]
    fn test_record_order_preserved() {
        let (bed, _) = extract(">chrY\n3\n>chr1\n03\n>chr10\n003\n");
        assert_eq!(bed, "chrY\t0\t1\nchr1\t1\t2\nchr10\t2\t3\n");
    }

    #[test]
    fn test_header_description_ignored() {
        let (bed, _) = extract(">chr5 k100 umap\n33\n");
        assert_eq!(bed, "chr5\t0\t2\n");
    }

    #[test]
    fn test_malformed_input_fails() {
        let cmd = ExtractCommand::new();
        let reader = FastaReader::new("0033\n".as_bytes());
        let mut output = Vec::new();
        let result = cmd.run_streaming(reader, &mut output);
        assert!(matches!(result, Err(MapbedError::Parse { record: 1, .. })));
    }

    #[test]
    fn test_header_only_line_aborts_instead_of_truncating() {
        let cmd = ExtractCommand::new();
        let reader = FastaReader::new(">chr1\n33\n>\n>chr2\n3333\n".as_bytes());
        let mut output = Vec::new();
        let result = cmd.run_streaming(reader, &mut output);
        assert!(
            matches!(result, Err(MapbedError::Parse { record: 2, .. })),
            "{:?}",
            result
        );
    }

    #[test]
    fn test_empty_records_between_runs() {
        let (bed, stats) = extract(">chr1\n33\n>chrM\n>chr2\n3333\n");
        assert_eq!(bed, "chr1\t0\t2\nchr2\t0\t4\n");
        assert_eq!(stats.records_read, 3);
        assert_eq!(stats.bases_covered, 6);
    }

    #[test]
    fn test_streaming_matches_extract_record() {
        let content = ">chr1\n30333\n>chr2\n033003\n";
        let cmd = ExtractCommand::new();
        let mut expected = String::new();
        for record in crate::fasta::parse_records(content).unwrap() {
            for interval in cmd.extract_record(&record) {
                expected.push_str(&format!("{}\n", interval));
            }
        }
        let (bed, stats) = extract(content);
        assert_eq!(bed, expected);
        assert_eq!(stats.bases_covered, 4 + 3);
    }

    #[test]
    fn test_extract_record() {
        let cmd = ExtractCommand::new();
        let record = SequenceRecord::new("chr1", "AA333AA33A");
        let intervals = cmd.extract_record(&record);
        assert_eq!(
            intervals,
            vec![Interval::new("chr1", 2, 5), Interval::new("chr1", 7, 9)]
        );
    }

    #[test]
    fn test_low_memory_same_output() {
        let content = ">chr1\n30303333\n>chr2\n3\n";
        let mut normal = Vec::new();
        let mut small = Vec::new();
        ExtractCommand::new()
            .run_streaming(FastaReader::new(content.as_bytes()), &mut normal)
            .unwrap();
        ExtractCommand::new()
            .with_low_memory(true)
            .run_streaming(FastaReader::new(content.as_bytes()), &mut small)
            .unwrap();
        assert_eq!(normal, small);
    }

    #[test]
    fn test_stats_display() {
        let stats = ExtractStats {
            records_read: 2,
            intervals_written: 3,
            bases_scanned: 200,
            bases_covered: 50,
        };
        assert_eq!(stats.coverage_fraction(), 0.25);
        assert_eq!(
            stats.to_string(),
            "Records: 2, Intervals: 3, Bases: 200, Covered: 50 (25.00%)"
        );
    }
}
