//! Run detection over a per-base code buffer.
//!
//! # Algorithm
//!
//! Scanning a sequence left to right with a single "in run" flag:
//! 1. A target byte with no open run opens one at its position
//! 2. A non-target byte closes the open run at its position
//! 3. The end of the sequence closes any run still open
//!
//! `CodeRuns` computes the same runs but jumps to the next run start with
//! `memchr`, so long non-target stretches are skipped without a per-byte
//! branch. Runs are yielded lazily in ascending order.
//!
//! # Memory Complexity
//!
//! O(1) - only the cursor position is tracked.

use crate::config::TARGET_CODE;
use memchr::memchr;
use std::iter::FusedIterator;

/// Iterator over maximal runs of one byte value, as half-open `(start, end)`.
///
/// Every yielded run is non-empty, and consecutive runs are separated by at
/// least one other byte.
#[derive(Debug, Clone)]
pub struct CodeRuns<'a> {
    seq: &'a [u8],
    code: u8,
    pos: usize,
}

impl<'a> CodeRuns<'a> {
    pub fn new(seq: &'a [u8], code: u8) -> Self {
        Self { seq, code, pos: 0 }
    }
}

impl Iterator for CodeRuns<'_> {
    type Item = (u64, u64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.seq[self.pos..];
        let start = self.pos + memchr(self.code, rest)?;
        let len = self.seq[start..]
            .iter()
            .take_while(|&&b| b == self.code)
            .count();
        let end = start + len;
        self.pos = end;
        Some((start as u64, end as u64))
    }
}

impl FusedIterator for CodeRuns<'_> {}

/// Runs of [`TARGET_CODE`] in `seq`.
#[inline]
pub fn code_runs(seq: &[u8]) -> CodeRuns<'_> {
    CodeRuns::new(seq, TARGET_CODE)
}
