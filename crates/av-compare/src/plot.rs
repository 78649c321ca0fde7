//! SVG comparison plots.

use std::ops::Range;
use std::path::Path;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::band::ToleranceBand;
use crate::{CompareError, CompareResult};

const MARKER_SIZE: i32 = 4;

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Circle,
    Triangle,
    Square,
    Cross,
}

/// Colors and markers cycled through by series index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Named colors or `#rrggbb`.
    pub palette: Vec<String>,
    pub markers: Vec<MarkerKind>,
    pub width: u32,
    pub height: u32,
    /// Height of each panel in a sweep figure.
    pub panel_height: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            palette: [
                "darkblue",
                "darkorange",
                "darkgreen",
                "firebrick",
                "purple",
                "mediumvioletred",
                "goldenrod",
                "darkcyan",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            markers: vec![
                MarkerKind::Circle,
                MarkerKind::Triangle,
                MarkerKind::Square,
                MarkerKind::Cross,
            ],
            width: 800,
            height: 600,
            panel_height: 280,
        }
    }
}

impl PlotStyle {
    pub fn color(&self, index: usize) -> CompareResult<RGBColor> {
        if self.palette.is_empty() {
            return Ok(BLACK);
        }
        parse_color(&self.palette[index % self.palette.len()])
    }

    pub fn marker(&self, index: usize) -> MarkerKind {
        if self.markers.is_empty() {
            return MarkerKind::Circle;
        }
        self.markers[index % self.markers.len()]
    }

    /// Reject palette entries that are not recognized colors.
    pub fn validate(&self) -> CompareResult<()> {
        for name in &self.palette {
            parse_color(name)?;
        }
        Ok(())
    }
}

fn parse_color(name: &str) -> CompareResult<RGBColor> {
    if let Some(hex) = name.strip_prefix('#')
        && hex.len() == 6
        && hex.is_ascii()
    {
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
            return Ok(RGBColor(r, g, b));
        }
    }
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "gray" | "grey" => (128, 128, 128),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "orange" => (255, 165, 0),
        "darkblue" => (0, 0, 139),
        "darkorange" => (255, 140, 0),
        "darkgreen" => (0, 100, 0),
        "firebrick" => (178, 34, 34),
        "purple" => (128, 0, 128),
        "mediumvioletred" => (199, 21, 133),
        "goldenrod" => (218, 165, 32),
        "darkcyan" => (0, 139, 139),
        _ => return Err(CompareError::UnknownColor(name.to_string())),
    };
    Ok(RGBColor(rgb.0, rgb.1, rgb.2))
}

fn plot_err<E: std::fmt::Display>(e: E) -> CompareError {
    CompareError::Plot(e.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    fn points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .copied()
            .zip(self.y.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }
}

/// Reference data drawn as markers, shaded by `band` when set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTrace {
    pub series: Series,
    pub band: Option<ToleranceBand>,
}

impl ReferenceTrace {
    pub fn new(series: Series, band: Option<ToleranceBand>) -> Self {
        Self { series, band }
    }
}

/// Computed curves as lines and reference traces as markers.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveOverlay {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub computed: Vec<Series>,
    pub references: Vec<ReferenceTrace>,
}

/// A horizontal reference value in a sweep panel.
#[derive(Debug, Clone, PartialEq)]
pub struct RefLine {
    pub label: String,
    pub value: f64,
    pub band: Option<ToleranceBand>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub y_label: String,
    pub values: Vec<f64>,
    pub reference_lines: Vec<RefLine>,
}

/// One stacked panel per metric, all sharing the swept parameter as x.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPanels {
    pub title: String,
    pub parameter_label: String,
    pub x: Vec<f64>,
    pub panels: Vec<Panel>,
}

fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad)..(hi + pad);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

pub fn render_curve_overlay(path: &Path, overlay: &CurveOverlay, style: &PlotStyle) -> CompareResult<()> {
    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let all = || {
        overlay
            .computed
            .iter()
            .chain(overlay.references.iter().map(|r| &r.series))
    };
    let x_range = padded_range(all().flat_map(|s| s.x.iter().copied()));
    let band_bounds: Vec<f64> = overlay
        .references
        .iter()
        .filter_map(|r| r.band.map(|band| (band, &r.series)))
        .flat_map(|(band, s)| {
            s.y.iter().flat_map(move |&y| {
                let (lo, hi) = band.bounds(y);
                [lo, hi]
            })
        })
        .collect();
    let y_range = padded_range(
        all()
            .flat_map(|s| s.y.iter().copied())
            .chain(band_bounds.iter().copied()),
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(&overlay.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc(overlay.x_label.as_str())
        .y_desc(overlay.y_label.as_str())
        .draw()
        .map_err(plot_err)?;

    let offset = overlay.computed.len();
    for (i, trace) in overlay.references.iter().enumerate() {
        if let Some(band) = trace.band {
            draw_band(&mut chart, &trace.series, band, style.color(offset + i)?)?;
        }
    }
    for (i, series) in overlay.computed.iter().enumerate() {
        draw_line(&mut chart, series, style.color(i)?)?;
    }
    for (i, trace) in overlay.references.iter().enumerate() {
        draw_markers(&mut chart, &trace.series, style.marker(i), style.color(offset + i)?)?;
    }

    draw_legend(&mut chart)?;
    root.present().map_err(plot_err)?;
    debug!(path = %path.display(), "wrote curve overlay");
    Ok(())
}

pub fn render_sweep_panels(path: &Path, sweep: &SweepPanels, style: &PlotStyle) -> CompareResult<()> {
    let rows = sweep.panels.len().max(1);
    let height = style.panel_height.saturating_mul(rows as u32).max(style.panel_height);
    let root = SVGBackend::new(path, (style.width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let root = root
        .titled(&sweep.title, ("sans-serif", 22))
        .map_err(plot_err)?;
    let areas = root.split_evenly((rows, 1));

    let x_range = padded_range(sweep.x.iter().copied());
    for (panel, area) in sweep.panels.iter().zip(areas.iter()) {
        let ref_bounds = panel.reference_lines.iter().flat_map(|r| {
            let (lo, hi) = r.band.map_or((r.value, r.value), |b| b.bounds(r.value));
            [r.value, lo, hi]
        });
        let y_range = padded_range(panel.values.iter().copied().chain(ref_bounds));

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(55)
            .build_cartesian_2d(x_range.clone(), y_range)
            .map_err(plot_err)?;
        chart
            .configure_mesh()
            .x_desc(sweep.parameter_label.as_str())
            .y_desc(panel.y_label.as_str())
            .draw()
            .map_err(plot_err)?;

        for (j, line) in panel.reference_lines.iter().enumerate() {
            let color = style.color(j + 1)?;
            if let Some(band) = line.band {
                let (lo, hi) = band.bounds(line.value);
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(x_range.start, lo), (x_range.end, hi)],
                        color.mix(0.15).filled(),
                    )))
                    .map_err(plot_err)?;
            }
            chart
                .draw_series(LineSeries::new(
                    [(x_range.start, line.value), (x_range.end, line.value)],
                    color.stroke_width(1),
                ))
                .map_err(plot_err)?
                .label(line.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1)));
        }

        let values = Series::new("", sweep.x.clone(), panel.values.clone());
        let color = style.color(0)?;
        draw_line(&mut chart, &values, color)?;
        draw_markers(&mut chart, &values, style.marker(0), color)?;

        if !panel.reference_lines.is_empty() {
            draw_legend(&mut chart)?;
        }
    }

    root.present().map_err(plot_err)?;
    debug!(path = %path.display(), panels = sweep.panels.len(), "wrote sweep panels");
    Ok(())
}

fn draw_line(chart: &mut Chart<'_, '_>, series: &Series, color: RGBColor) -> CompareResult<()> {
    let anno = chart
        .draw_series(LineSeries::new(series.points(), color.stroke_width(2)))
        .map_err(plot_err)?;
    if !series.label.is_empty() {
        anno.label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }
    Ok(())
}

fn draw_band(
    chart: &mut Chart<'_, '_>,
    series: &Series,
    band: ToleranceBand,
    color: RGBColor,
) -> CompareResult<()> {
    let points = series.points();
    if points.len() < 2 {
        return Ok(());
    }
    let mut sorted = points;
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let upper = sorted.iter().map(|&(x, y)| (x, band.bounds(y).1));
    let lower = sorted.iter().rev().map(|&(x, y)| (x, band.bounds(y).0));
    let outline: Vec<(f64, f64)> = upper.chain(lower).collect();
    chart
        .draw_series(std::iter::once(Polygon::new(outline, color.mix(0.15).filled())))
        .map_err(plot_err)?;
    Ok(())
}

fn draw_markers<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    series: &Series,
    kind: MarkerKind,
    color: RGBColor,
) -> CompareResult<()> {
    let points = series.points();
    let style = color.filled();
    let label = series.label.as_str();
    match kind {
        MarkerKind::Circle => {
            let anno = chart
                .draw_series(points.iter().map(|&p| Circle::new(p, MARKER_SIZE, style)))
                .map_err(plot_err)?;
            if !label.is_empty() {
                anno.label(label)
                    .legend(move |c| Circle::new(c, MARKER_SIZE, style));
            }
        }
        MarkerKind::Triangle => {
            let anno = chart
                .draw_series(points.iter().map(|&p| TriangleMarker::new(p, MARKER_SIZE + 1, style)))
                .map_err(plot_err)?;
            if !label.is_empty() {
                anno.label(label)
                    .legend(move |c| TriangleMarker::new(c, MARKER_SIZE + 1, style));
            }
        }
        MarkerKind::Square => {
            let square = [(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)];
            let anno = chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + Rectangle::new(square, style)),
                )
                .map_err(plot_err)?;
            if !label.is_empty() {
                anno.label(label)
                    .legend(move |c| EmptyElement::at(c) + Rectangle::new(square, style));
            }
        }
        MarkerKind::Cross => {
            let stroke = color.stroke_width(2);
            let anno = chart
                .draw_series(points.iter().map(|&p| Cross::new(p, MARKER_SIZE, stroke)))
                .map_err(plot_err)?;
            if !label.is_empty() {
                anno.label(label)
                    .legend(move |c| Cross::new(c, MARKER_SIZE, stroke));
            }
        }
    }
    Ok(())
}

fn draw_legend<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>) -> CompareResult<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)
}
