//! Confusion-matrix heatmaps rendered side by side into one SVG figure.
//!
//! Cells and annotations are laid out in pixel space so no font metrics are
//! needed; the SVG viewer does the text layout.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontTransform, TextStyle};
use tracing::info;

use crate::common::error::{CrashError, CrashResult};
use crate::evaluation::domain::{ConfusionMatrix, EvalResult};

const PANEL_WIDTH: u32 = 700;
const FIGURE_HEIGHT: u32 = 600;

const MARGIN_LEFT: i32 = 100;
const MARGIN_RIGHT: i32 = 40;
const MARGIN_TOP: i32 = 70;
const MARGIN_BOTTOM: i32 = 90;

const FONT: &str = "sans-serif";

/// Light and dark ends of the blue sequential scale.
const LIGHT: (u8, u8, u8) = (247, 251, 255);
const DARK: (u8, u8, u8) = (8, 48, 107);

/// Colour for a cell at `t` in [0, 1] of the matrix maximum.
fn shade(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| {
        let (a, b) = (f64::from(a), f64::from(b));
        (a + (b - a) * t).round() as u8
    };
    RGBColor(
        lerp(LIGHT.0, DARK.0),
        lerp(LIGHT.1, DARK.1),
        lerp(LIGHT.2, DARK.2),
    )
}

fn centered(size: u32, color: &RGBColor) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

fn label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: String,
    pos: (i32, i32),
    style: TextStyle<'_>,
) -> CrashResult<()> {
    area.draw(&Text::new(text, pos, style))
        .map_err(CrashError::presentation)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    matrix: &ConfusionMatrix,
) -> CrashResult<()> {
    let (width, height) = area.dim_in_pixel();
    let n = matrix.labels.len().max(1) as i32;
    let plot_w = width as i32 - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height as i32 - MARGIN_TOP - MARGIN_BOTTOM;
    let cell = (plot_w.min(plot_h) / n).max(1);
    let side = cell * n;
    let max = matrix.max_count().max(1) as f64;

    label(
        area,
        title.to_string(),
        (MARGIN_LEFT + side / 2, MARGIN_TOP / 2),
        centered(22, &BLACK),
    )?;

    for (r, row) in matrix.counts.iter().enumerate() {
        for (c, &count) in row.iter().enumerate() {
            let x0 = MARGIN_LEFT + c as i32 * cell;
            let y0 = MARGIN_TOP + r as i32 * cell;
            let t = count as f64 / max;
            let rect = Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], shade(t).filled());
            area.draw(&rect).map_err(CrashError::presentation)?;
            let ink = if t > 0.5 { WHITE } else { BLACK };
            label(
                area,
                count.to_string(),
                (x0 + cell / 2, y0 + cell / 2),
                centered(20, &ink),
            )?;
        }
    }

    for (i, class) in matrix.labels.iter().enumerate() {
        let mid = i as i32 * cell + cell / 2;
        label(
            area,
            class.to_string(),
            (MARGIN_LEFT + mid, MARGIN_TOP + side + 18),
            centered(16, &BLACK),
        )?;
        label(
            area,
            class.to_string(),
            (MARGIN_LEFT - 18, MARGIN_TOP + mid),
            centered(16, &BLACK),
        )?;
    }

    label(
        area,
        "Predicted".to_string(),
        (MARGIN_LEFT + side / 2, MARGIN_TOP + side + 50),
        centered(18, &BLACK),
    )?;
    let rotated = (FONT, 18)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    label(
        area,
        "Actual".to_string(),
        (MARGIN_LEFT - 60, MARGIN_TOP + side / 2),
        rotated,
    )
}

/// Write one figure with an annotated heatmap per model, left to right.
pub fn render_heatmaps(results: &[EvalResult], path: &Path) -> CrashResult<()> {
    if results.is_empty() {
        return Err(CrashError::presentation("no evaluation results to plot"));
    }
    let size = (PANEL_WIDTH * results.len() as u32, FIGURE_HEIGHT);
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(CrashError::presentation)?;

    let panels = root.split_evenly((1, results.len()));
    for (panel, result) in panels.iter().zip(results) {
        let title = format!("{} Confusion Matrix", result.model.display_name());
        draw_panel(panel, &title, &result.confusion)?;
    }
    root.present().map_err(CrashError::presentation)?;
    info!(path = %path.display(), panels = results.len(), "confusion matrices rendered");
    Ok(())
}
