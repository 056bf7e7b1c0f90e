//! Runtime constants for mapbed.
//!
//! The target mappability code is fixed. Buffer sizes are the only tunable
//! and are selected once per run from the `--low-memory` flag.

/// Mappability code marking a uniquely mappable base.
///
/// Only runs of this byte are reported. It is deliberately not exposed on
/// the command line.
pub const TARGET_CODE: u8 = b'3';

/// Default output buffer size (2 MB).
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Low-memory output buffer size (256 KB).
pub const LOW_MEMORY_OUTPUT_BUFFER: usize = 256 * 1024;

/// Default input buffer size (256 KB).
/// Mappability FASTA lines are short, so this mostly amortizes syscalls.
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Low-memory input buffer size (64 KB).
pub const LOW_MEMORY_INPUT_BUFFER: usize = 64 * 1024;

/// Returns the appropriate output buffer size based on low_memory flag.
#[inline]
pub const fn output_buffer_size(low_memory: bool) -> usize {
    if low_memory {
        LOW_MEMORY_OUTPUT_BUFFER
    } else {
        DEFAULT_OUTPUT_BUFFER
    }
}

/// Returns the appropriate input buffer size based on low_memory flag.
#[inline]
pub const fn input_buffer_size(low_memory: bool) -> usize {
    if low_memory {
        LOW_MEMORY_INPUT_BUFFER
    } else {
        DEFAULT_INPUT_BUFFER
    }
}
