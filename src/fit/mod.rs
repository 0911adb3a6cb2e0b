//! Model fitting.
//!
//! Responsibilities:
//!
//! - search ARMA coefficients on the differenced series (coarse grid, regression
//!   seed, refinement)
//! - wrap the winning coefficients into an `ArimaModel` that forecasts on the
//!   original scale

pub mod arima;
pub mod search;

pub use arima::*;
pub use search::*;
