//! Static PNG charts for launch-window sweeps.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use orrery_approach::LaunchWindow;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("nothing to plot")]
    EmptySeries,
    #[error("failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawing failed: {0}")]
    Drawing(String),
}

/// One labelled point of a per-year chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub year: i32,
    pub value: f64,
    pub label: String,
}

/// Titles and pixel size of a chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec<'a> {
    pub title: &'a str,
    pub y_desc: &'a str,
    pub width: u32,
    pub height: u32,
}

pub const DISTANCE_TITLE: &str = "Annual Closest Earth→Mars Distances";
pub const TRANSFER_TITLE: &str = "Estimated Hohmann Transfer Time to Mars";

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Closest distance per year, labelled with the month and day it occurs.
pub fn distance_points(windows: &[LaunchWindow]) -> Vec<ChartPoint> {
    windows
        .iter()
        .map(|w| ChartPoint {
            year: w.approach.year,
            value: w.approach.distance_au,
            label: w.approach.date().format("%b %d").to_string(),
        })
        .collect()
}

/// Transfer duration per year, labelled as 30-day months plus days.
pub fn transfer_points(windows: &[LaunchWindow]) -> Vec<ChartPoint> {
    windows
        .iter()
        .map(|w| {
            let (months, days) = w.transfer.months_and_days();
            ChartPoint {
                year: w.approach.year,
                value: w.transfer.duration_days,
                label: format!("{months}m{days}d"),
            }
        })
        .collect()
}

/// Render the distance-vs-year chart.
pub fn render_distance_chart(
    path: &Path,
    windows: &[LaunchWindow],
    size: (u32, u32),
) -> Result<(), PlotError> {
    let spec = ChartSpec {
        title: DISTANCE_TITLE,
        y_desc: "Distance (AU)",
        width: size.0,
        height: size.1,
    };
    render_series(path, &spec, &distance_points(windows))
}

/// Render the transfer-time-vs-year chart.
pub fn render_transfer_chart(
    path: &Path,
    windows: &[LaunchWindow],
    size: (u32, u32),
) -> Result<(), PlotError> {
    let spec = ChartSpec {
        title: TRANSFER_TITLE,
        y_desc: "Transfer Time (days)",
        width: size.0,
        height: size.1,
    };
    render_series(path, &spec, &transfer_points(windows))
}

/// Draw a year/value line with circle markers and a text label above each point.
pub fn render_series(
    path: &Path,
    spec: &ChartSpec<'_>,
    points: &[ChartPoint],
) -> Result<(), PlotError> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first.year, last.year),
        _ => return Err(PlotError::EmptySeries),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 22.0, FontStyle::Normal);
    let axis_font = FontDesc::new(font_family, 15.0, FontStyle::Normal);
    let point_label = TextStyle::from(FontDesc::new(font_family, 11.0, FontStyle::Normal))
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    let (y_min, y_max) = value_range(points);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(spec.title, caption_font)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(first as f64 - 0.5..last as f64 + 0.5, y_min..y_max)
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(spec.y_desc)
        .label_style(axis_font.clone())
        .axis_desc_style(axis_font)
        .x_labels((last - first + 1).clamp(2, 25) as usize)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .bold_line_style(&BLACK.mix(0.3))
        .light_line_style(&BLACK.mix(0.05))
        .draw()
        .map_err(drawing)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.year as f64, p.value)),
            ShapeStyle::from(&LINE_COLOR).stroke_width(2),
        ))
        .map_err(drawing)?;

    chart
        .draw_series(points.iter().map(|p| {
            EmptyElement::at((p.year as f64, p.value))
                + Circle::new((0, 0), 4, LINE_COLOR.filled())
                + Text::new(p.label.clone(), (0, -6), point_label.clone())
        }))
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    info!(path = %path.display(), points = points.len(), "chart saved");
    Ok(())
}

fn value_range(points: &[ChartPoint]) -> (f64, f64) {
    let lo = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((hi - lo) * 0.1).max(hi.abs() * 0.05).max(1e-3);
    // Extra headroom on top for the point labels.
    (lo - pad, hi + 2.0 * pad)
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn drawing<E: Display>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}
