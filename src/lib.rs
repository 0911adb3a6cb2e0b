//! `sales-forecast` library crate.
//!
//! The binary (`forecast`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes or opening a display
//! - rendering is swappable (terminal, SVG, ASCII) behind one trait
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod series;
pub mod tui;
