//! Time-series shaping: month-end calendar helpers, monthly sums, forecast axis.

pub mod aggregate;
pub mod calendar;

pub use aggregate::*;
pub use calendar::*;
