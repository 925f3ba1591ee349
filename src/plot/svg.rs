//! SVG rendering of a precision-recall curve with `plotters`.
//!
//! Post-step line with the area below filled, recall `[0, 1]` on x, precision
//! `[0, 1.05]` on y.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::PrCurve;
use crate::error::AppError;
use crate::plot::ascii::{PRECISION_RANGE, RECALL_RANGE};

pub const PR_TITLE: &str = "2-class Precision-Recall curve";

/// Draw `curve` into an SVG file at `path`.
pub fn write_pr_svg(path: &Path, curve: &PrCurve, width: u32, height: u32) -> Result<(), AppError> {
    draw(path, curve, width.max(200), height.max(150))
        .map_err(|e| AppError::new(4, format!("Failed to draw SVG plot '{}': {e}", path.display())))
}

/// Vertices of the post-step polyline, in curve order.
pub fn step_vertices(curve: &PrCurve) -> Vec<(f64, f64)> {
    let r = &curve.recall;
    let p = &curve.precision;
    let mut out = Vec::with_capacity(2 * r.len());
    for i in 0..r.len() {
        out.push((r[i], p[i]));
        if i + 1 < r.len() {
            out.push((r[i + 1], p[i]));
        }
    }
    out
}

fn draw(path: &Path, curve: &PrCurve, width: u32, height: u32) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(PR_TITLE, ("sans-serif", 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(RECALL_RANGE.0..RECALL_RANGE.1, PRECISION_RANGE.0..PRECISION_RANGE.1)?;

    chart
        .configure_mesh()
        .x_desc("Recall")
        .y_desc("Precision")
        .x_labels(6)
        .y_labels(6)
        .draw()?;

    let vertices = step_vertices(curve);
    let color = BLUE.mix(0.2);
    chart.draw_series(AreaSeries::new(vertices.iter().copied(), 0.0, color))?;
    chart.draw_series(LineSeries::new(vertices.iter().copied(), color))?;

    root.present()?;
    Ok(())
}
