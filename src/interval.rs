//! Interval type for reported runs.

use std::fmt;

/// One run of the target code on a record: `[start, end)`, 0-based.
///
/// `chrom` is the FASTA record id. Intervals built from runs are never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Create a new interval.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    /// Number of bases covered.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True if the interval covers no bases.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// BED3 text without the trailing newline.
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.start, self.end)
    }
}
