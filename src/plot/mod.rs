//! Charts: what to draw (`chart`), where to draw it (`sink`), and the sinks
//! themselves (`svg`, `ascii`; the terminal sink lives in `crate::tui`).

pub mod ascii;
pub mod chart;
pub mod draw;
pub mod sink;
pub mod svg;

pub use ascii::*;
pub use chart::*;
pub use draw::*;
pub use sink::*;
pub use svg::*;
