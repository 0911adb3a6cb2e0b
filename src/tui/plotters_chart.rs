//! Plotters-powered chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`,
//! reusing the same drawing routine as the SVG sink.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{ChartSpec, DrawOptions, draw_chart};

/// Render-only wrapper around a precomputed `ChartSpec`.
pub struct SalesPlottersChart<'a> {
    pub chart: &'a ChartSpec,
}

impl<'a> Widget for SalesPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.chart.x_bounds().is_none() || self.chart.y_bounds().is_none() {
            buf.set_string(
                area.x,
                area.y,
                "No data to plot.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let chart = self.chart;
        let opts = DrawOptions::terminal();
        let widget = widget_fn(move |root| {
            draw_chart(&root, chart, &opts)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
