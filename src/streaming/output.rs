//! Buffered BED3 output.
//!
//! Uses itoa for coordinate formatting to avoid allocation per row.

use crate::config::DEFAULT_OUTPUT_BUFFER;
use crate::error::Result;
use crate::interval::Interval;
use std::io::{BufWriter, Write};

/// BED3 output writer.
///
/// Rows are `chrom\tstart\tend\n` with no header line.
pub struct BedWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    rows_written: usize,
}

impl<W: Write> BedWriter<W> {
    /// Create a new BedWriter with the default buffer size.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new BedWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            rows_written: 0,
        }
    }

    /// Write a BED3 record followed by newline.
    #[inline]
    pub fn write_bed3_line(&mut self, chrom: &[u8], start: u64, end: u64) -> Result<()> {
        self.writer.write_all(chrom)?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(end).as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    /// Write an interval as a BED3 line.
    #[inline]
    pub fn write_interval(&mut self, interval: &Interval) -> Result<()> {
        self.write_bed3_line(interval.chrom.as_bytes(), interval.start, interval.end)
    }

    /// Number of rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bed3() {
        let mut output = Vec::new();
        {
            let mut writer = BedWriter::new(&mut output);
            writer.write_bed3_line(b"chr1", 2, 5).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"chr1\t2\t5\n");
    }

    #[test]
    fn test_write_interval() {
        let mut writer = BedWriter::with_capacity(16, Vec::new());
        writer
            .write_interval(&Interval::new("chr10", 0, 18446744073709551615))
            .unwrap();
        writer.write_interval(&Interval::new("chr10", 7, 9)).unwrap();
        assert_eq!(writer.rows_written(), 2);

        let output = writer.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "chr10\t0\t18446744073709551615\nchr10\t7\t9\n"
        );
    }

    #[test]
    fn test_nothing_written() {
        let writer = BedWriter::new(Vec::new());
        assert_eq!(writer.rows_written(), 0);
        assert!(writer.into_inner().unwrap().is_empty());
    }
}
