//! Reporting utilities: the diagnostic text printed at pipeline checkpoints.

pub mod format;

pub use format::*;
