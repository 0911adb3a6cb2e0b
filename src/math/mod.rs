//! Numeric utilities: differencing and least squares.

pub mod diff;
pub mod ols;

pub use diff::*;
pub use ols::*;
