//! Plotters drawing routine shared by the SVG and terminal sinks.
//!
//! Both sinks hand us a `DrawingArea`; the only differences between them are
//! captured in `DrawOptions` (font sizes, label areas, marker shape).

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, DrawingAreaErrorKind};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::plot::chart::{ChartSpec, LineKind, x_to_month_label};

/// How markers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Filled circles. Good on pixel backends.
    Circle,
    /// Single pixels. `plotters-ratatui-backend` scales circle radii wrongly,
    /// so terminal output uses these.
    Pixel,
}

/// Backend-specific drawing knobs.
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub caption: bool,
    pub title_size: u32,
    pub font_size: u32,
    pub margin: u32,
    pub left_label_area: u32,
    pub bottom_label_area: u32,
    pub stroke_width: u32,
    pub marker: MarkerShape,
    pub marker_size: u32,
    pub dash_size: u32,
    pub dash_spacing: u32,
    pub foreground: RGBColor,
    pub background: RGBColor,
    /// Draw the legend box when the chart asks for one.
    pub legend: bool,
}

impl DrawOptions {
    /// 1200×600 SVG output.
    pub fn svg() -> Self {
        Self {
            caption: true,
            title_size: 28,
            font_size: 16,
            margin: 20,
            left_label_area: 80,
            bottom_label_area: 60,
            stroke_width: 2,
            marker: MarkerShape::Circle,
            marker_size: 4,
            dash_size: 10,
            dash_spacing: 6,
            foreground: BLACK,
            background: WHITE,
            legend: true,
        }
    }

    /// Terminal cells are low-res, so keep label areas compact.
    pub fn terminal() -> Self {
        Self {
            caption: false,
            title_size: 10,
            font_size: 10,
            margin: 1,
            left_label_area: 8,
            bottom_label_area: 3,
            stroke_width: 1,
            marker: MarkerShape::Pixel,
            marker_size: 1,
            dash_size: 2,
            dash_spacing: 2,
            foreground: WHITE,
            background: BLACK,
            legend: false,
        }
    }
}

/// Draw `chart` onto `root`. Empty charts draw nothing.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartSpec,
    opts: &DrawOptions,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (Some((x0, x1)), Some((y0, y1))) = (chart.x_bounds(), chart.y_bounds()) else {
        return Ok(());
    };

    let fg = opts.foreground;
    let mut builder = ChartBuilder::on(root);
    builder
        .margin(opts.margin)
        .set_label_area_size(LabelAreaPosition::Left, opts.left_label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, opts.bottom_label_area);
    if opts.caption {
        builder.caption(
            chart.title.as_str(),
            ("sans-serif", opts.title_size).into_font().color(&fg),
        );
    }
    let mut ctx = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    // Plotters meshes are solid; a faint colour stands in for the light dashed grid.
    let grid_color = fg.mix(chart.grid.alpha * 0.3);
    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| x_to_month_label(*v))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(("sans-serif", opts.font_size).into_font().color(&fg))
        .axis_style(&fg)
        .bold_line_style(&grid_color)
        .light_line_style(&TRANSPARENT)
        .draw()?;

    for series in &chart.series {
        let color = RGBColor(series.color.r, series.color.g, series.color.b);
        let style = ShapeStyle::from(&color).stroke_width(opts.stroke_width);
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(d, v)| (crate::plot::chart::date_to_x(d), v))
            .collect();

        let anno = match series.line {
            LineKind::Solid => ctx.draw_series(LineSeries::new(points.iter().copied(), style))?,
            LineKind::Dashed => ctx.draw_series(DashedLineSeries::new(
                points.iter().copied(),
                opts.dash_size,
                opts.dash_spacing,
                style,
            ))?,
        };
        if chart.legend && opts.legend {
            anno.label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        if series.markers {
            match opts.marker {
                MarkerShape::Circle => ctx.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, opts.marker_size, style.filled())),
                )?,
                MarkerShape::Pixel => {
                    ctx.draw_series(points.iter().map(|&p| Pixel::new(p, color)))?
                }
            };
        }
    }

    if chart.legend && opts.legend {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&opts.background.mix(0.8))
            .border_style(&fg)
            .label_font(("sans-serif", opts.font_size).into_font().color(&fg))
            .draw()?;
    }

    Ok(())
}
