//! Rendering sinks.
//!
//! The pipeline computes `ChartSpec`s and hands them to a `RenderSink`; which
//! surface they land on (terminal, SVG file, text) is the caller's choice.

use crate::error::AppError;
use crate::plot::chart::ChartSpec;

/// A place charts are rendered to.
///
/// `render` may block (the terminal sink waits for a key press).
pub trait RenderSink {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), AppError>;
}

/// Keeps every chart it is given. Used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub charts: Vec<ChartSpec>,
}

#[cfg(test)]
impl RenderSink for RecordingSink {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), AppError> {
        self.charts.push(chart.clone());
        Ok(())
    }
}
