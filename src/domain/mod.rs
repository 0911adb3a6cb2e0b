//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`PipelineConfig`, `ArimaOrder`, `RenderTarget`)
//! - the loaded table and cleaned observations (`SalesTable`, `CleanedSeries`)
//! - monthly and forecast series (`MonthlySeries`, `ForecastSeries`)

pub mod types;

pub use types::*;
