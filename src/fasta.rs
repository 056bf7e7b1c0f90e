//! Streaming FASTA reader for mappability tracks.
//!
//! Parsing is delegated to `bio::io::fasta`; this module reads one record at
//! a time, validates it, and turns `bio` failures into [`MapbedError`]s that
//! carry the ordinal of the offending record.
//!
//! Input is read strictly:
//! - text before the first `>` (including a blank line) is a parse error,
//!   not skipped
//! - sequence lines are taken byte for byte apart from the line terminator,
//!   so a space inside a line occupies a coordinate. `3 3` yields runs
//!   `(0, 1)` and `(2, 3)`, not `(0, 2)`
//! - a `>` line with no identifier is a parse error wherever it appears

use crate::error::{MapbedError, Result};
use bio::io::fasta::{self, FastaRead};
use memchr::{memchr_iter, memrchr};
use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::rc::Rc;

/// One FASTA record: the chromosome name and its per-base codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    id: String,
    seq: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            seq: seq.into(),
        }
    }

    /// First whitespace-delimited token of the header, used verbatim as chrom.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Concatenated sequence lines without line terminators.
    #[inline]
    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Line bookkeeping shared between [`LineTracker`] and [`FastaReader`].
#[derive(Debug, Clone, Copy)]
struct LineState {
    /// Lines whose first byte has been consumed
    lines_started: usize,
    /// Whether the most recently started line begins with `>`
    last_is_header: bool,
    /// Next consumed byte begins a line
    at_line_start: bool,
}

/// `BufRead` adapter that counts the lines `bio` pulls from the source.
///
/// `bio` keeps the next header line as private lookahead and signals end of
/// input with an empty record, which a header-only `>` line also produces.
/// Counting consumed lines tells the two apart.
struct LineTracker<B> {
    inner: B,
    state: Rc<Cell<LineState>>,
}

impl<B: BufRead> Read for LineTracker<B> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<B: BufRead> BufRead for LineTracker<B> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        if amt > 0 {
            // Buffered bytes are still in place, so this does no I/O.
            if let Ok(buf) = self.inner.fill_buf() {
                let chunk = &buf[..amt.min(buf.len())];
                if let Some((&last, body)) = chunk.split_last() {
                    let mut state = self.state.get();
                    let mut starts = memchr_iter(b'\n', body).count();
                    let mut last_start = memrchr(b'\n', body).map(|i| i + 1);
                    if state.at_line_start {
                        starts += 1;
                        last_start = last_start.or(Some(0));
                    }
                    if let Some(i) = last_start {
                        state.last_is_header = chunk[i] == b'>';
                    }
                    state.lines_started += starts;
                    state.at_line_start = last == b'\n';
                    self.state.set(state);
                }
            }
        }
        self.inner.consume(amt);
    }
}

/// A streaming FASTA reader.
pub struct FastaReader<R: Read> {
    reader: fasta::Reader<LineTracker<BufReader<R>>>,
    record: fasta::Record,
    lines: Rc<Cell<LineState>>,
    /// `bio` holds an unread header line
    header_pending: bool,
    records_read: usize,
}

impl FastaReader<File> {
    /// Open a FASTA file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> FastaReader<R> {
    /// Create a new FASTA reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self::from_buf_reader(BufReader::new(reader))
    }

    /// Create a FASTA reader with custom buffer capacity.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self::from_buf_reader(BufReader::with_capacity(capacity, reader))
    }

    fn from_buf_reader(inner: BufReader<R>) -> Self {
        let lines = Rc::new(Cell::new(LineState {
            lines_started: 0,
            last_is_header: false,
            at_line_start: true,
        }));
        let tracker = LineTracker {
            inner,
            state: Rc::clone(&lines),
        };
        Self {
            reader: fasta::Reader::from_bufread(tracker),
            record: fasta::Record::new(),
            lines,
            header_pending: false,
            records_read: 0,
        }
    }

    /// Number of records successfully read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Read the next record, or `None` at end of input.
    pub fn read_record(&mut self) -> Result<Option<SequenceRecord>> {
        let ordinal = self.records_read + 1;
        let before = self.lines.get().lines_started;

        self.reader
            .read(&mut self.record)
            .map_err(|e| MapbedError::from_fasta(e, ordinal))?;

        let after = self.lines.get();
        let started = after.lines_started - before;
        if !self.header_pending && started == 0 {
            return Ok(None);
        }

        // Lines started past this record's own header; the last of them is
        // lookahead when it is a header.
        let past_header = if self.header_pending {
            started
        } else {
            started - 1
        };
        self.header_pending = past_header > 0 && after.last_is_header;

        self.record.check().map_err(|msg| MapbedError::Parse {
            record: ordinal,
            message: msg.to_string(),
        })?;

        self.records_read = ordinal;
        Ok(Some(SequenceRecord::new(self.record.id(), self.record.seq())))
    }

    /// Get an iterator over all records.
    pub fn records(self) -> FastaRecordIter<R> {
        FastaRecordIter {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over FASTA records. Stops after the first error.
pub struct FastaRecordIter<R: Read> {
    reader: FastaReader<R>,
    done: bool,
}

impl<R: Read> Iterator for FastaRecordIter<R> {
    type Item = Result<SequenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse records from a string (useful for testing).
pub fn parse_records(content: &str) -> Result<Vec<SequenceRecord>> {
    FastaReader::new(content.as_bytes()).records().collect()
}
