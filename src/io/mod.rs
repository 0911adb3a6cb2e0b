//! Input/output helpers.
//!
//! - CSV load + sales cleaning (`ingest`)
//! - history/forecast CSV export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
