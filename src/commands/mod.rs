//! Command implementations for mapbed.

pub mod extract;

pub use extract::{ExtractCommand, ExtractStats};
