//! PNG charts for the evaluation step, rasterized with the `image` crate.
//!
//! Every chart is rendered into a [`Canvas`] first and then written out, so
//! the drawing can be checked without touching the filesystem.

mod canvas;
mod font;

pub use canvas::Canvas;

use image::Rgb;
use std::path::Path;

use crate::error::Result;
use crate::metrics::{ConfusionMatrix, Curve};
use canvas::{BLACK, GREY, WHITE};

const CHART_WIDTH: u32 = 800;
const CHART_HEIGHT: u32 = 640;
const TITLE_SCALE: u32 = 3;
const LABEL_SCALE: u32 = 2;

const DARK_ORANGE: Rgb<u8> = Rgb([255, 140, 0]);
const NAVY: Rgb<u8> = Rgb([0, 0, 128]);
const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
const BAR_PALETTE: [Rgb<u8>; 7] = [
    Rgb([49, 115, 161]),
    Rgb([225, 129, 44]),
    Rgb([58, 146, 58]),
    Rgb([192, 61, 62]),
    Rgb([147, 114, 178]),
    Rgb([132, 91, 83]),
    Rgb([214, 132, 189]),
];

/// Plot area inside a canvas plus the data window it displays.
struct Axes {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Axes {
    fn to_px(&self, x: f64, y: f64) -> (i64, i64) {
        let fx = (x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        let fy = (y - self.y_range.0) / (self.y_range.1 - self.y_range.0);
        let px = self.left as f64 + fx * (self.right - self.left) as f64;
        let py = self.bottom as f64 - fy * (self.bottom - self.top) as f64;
        (px.round() as i64, py.round() as i64)
    }

    fn draw(&self, canvas: &mut Canvas, x_ticks: &[f64], y_ticks: &[f64], x_label: &str, y_label: &str) {
        canvas.stroke_rect(self.left, self.top, self.right - self.left, self.bottom - self.top, BLACK);

        let th = Canvas::text_height(LABEL_SCALE);
        for &t in x_ticks {
            let (px, _) = self.to_px(t, self.y_range.0);
            canvas.line((px, self.bottom), (px, self.bottom + 6), BLACK, 1);
            canvas.text_centered(px, self.bottom + 10 + th / 2, &format!("{t:.1}"), LABEL_SCALE, BLACK);
        }
        for &t in y_ticks {
            let (_, py) = self.to_px(self.x_range.0, t);
            canvas.line((self.left - 6, py), (self.left, py), BLACK, 1);
            let label = format!("{t:.1}");
            let w = Canvas::text_width(&label, LABEL_SCALE);
            canvas.text(self.left - 10 - w, py - th / 2, &label, LABEL_SCALE, BLACK);
        }

        let mid_x = (self.left + self.right) / 2;
        canvas.text_centered(mid_x, self.bottom + 30 + th * 2, x_label, LABEL_SCALE, BLACK);
        canvas.text(self.left, self.top - th - 8, y_label, LABEL_SCALE, BLACK);
    }

    fn polyline(&self, canvas: &mut Canvas, curve: &Curve, color: Rgb<u8>) {
        let points: Vec<(i64, i64)> = curve
            .x
            .iter()
            .zip(&curve.y)
            .map(|(&x, &y)| self.to_px(x, y))
            .collect();
        for pair in points.windows(2) {
            canvas.line(pair[0], pair[1], color, 2);
        }
    }

    /// Boxed single-entry legend anchored to a bottom corner of the plot area.
    fn legend(&self, canvas: &mut Canvas, text: &str, color: Rgb<u8>, right_side: bool) {
        let th = Canvas::text_height(LABEL_SCALE);
        let w = Canvas::text_width(text, LABEL_SCALE) + 60;
        let h = th + 16;
        let x = if right_side { self.right - w - 12 } else { self.left + 12 };
        let y = self.bottom - h - 12;
        canvas.fill_rect(x, y, w, h, WHITE);
        canvas.stroke_rect(x, y, w, h, GREY);
        canvas.line((x + 8, y + h / 2), (x + 36, y + h / 2), color, 2);
        canvas.text(x + 46, y + 8, text, LABEL_SCALE, BLACK);
    }
}

fn title(canvas: &mut Canvas, text: &str) {
    let cx = canvas.width() as i64 / 2;
    canvas.text_centered(cx, 24, text, TITLE_SCALE, BLACK);
}

fn unit_ticks() -> Vec<f64> {
    (0..=5).map(|i| i as f64 * 0.2).collect()
}

fn curve_axes() -> Axes {
    Axes {
        left: 110,
        top: 80,
        right: CHART_WIDTH as i64 - 40,
        bottom: CHART_HEIGHT as i64 - 110,
        x_range: (0.0, 1.0),
        y_range: (0.0, 1.05),
    }
}

/// White-to-navy ramp, `t` in `[0, 1]`.
fn blues(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Rgb([lerp(247, 8), lerp(251, 48), lerp(255, 107)])
}

fn render_confusion_matrix(cm: &ConfusionMatrix) -> Canvas {
    let mut canvas = Canvas::new(CHART_WIDTH, CHART_HEIGHT);
    title(&mut canvas, "Confusion Matrix");

    let grid = cm.as_grid();
    let max = grid.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
    let classes = ["Regular", "Mega"];
    let (left, top, cell) = (220i64, 90i64, 220i64);

    for (row, counts) in grid.iter().enumerate() {
        for (col, &count) in counts.iter().enumerate() {
            let t = count as f64 / max;
            let x = left + col as i64 * cell;
            let y = top + row as i64 * cell;
            canvas.fill_rect(x, y, cell, cell, blues(t));
            let ink = if t > 0.5 { WHITE } else { BLACK };
            canvas.text_centered(x + cell / 2, y + cell / 2, &count.to_string(), TITLE_SCALE, ink);
        }
    }
    canvas.stroke_rect(left, top, cell * 2, cell * 2, BLACK);

    for (i, name) in classes.iter().enumerate() {
        let centre = cell / 2 + i as i64 * cell;
        canvas.text_centered(left + centre, top + cell * 2 + 20, name, LABEL_SCALE, BLACK);
        let w = Canvas::text_width(name, LABEL_SCALE);
        canvas.text(left - 16 - w, top + centre - 7, name, LABEL_SCALE, BLACK);
    }
    canvas.text_centered(left + cell, top + cell * 2 + 56, "Predicted", LABEL_SCALE, BLACK);
    canvas.text(24, top + cell - 7, "Actual", LABEL_SCALE, BLACK);

    // Colour bar.
    let (bar_x, bar_w) = (left + cell * 2 + 60, 24);
    for i in 0..cell * 2 {
        let t = 1.0 - i as f64 / (cell * 2) as f64;
        canvas.fill_rect(bar_x, top + i, bar_w, 1, blues(t));
    }
    canvas.stroke_rect(bar_x, top, bar_w, cell * 2, BLACK);
    canvas.text(bar_x + bar_w + 8, top, &(max as usize).to_string(), LABEL_SCALE, BLACK);
    canvas.text(bar_x + bar_w + 8, top + cell * 2 - 14, "0", LABEL_SCALE, BLACK);
    canvas
}

fn render_roc_curve(curve: &Curve) -> Canvas {
    let mut canvas = Canvas::new(CHART_WIDTH, CHART_HEIGHT);
    title(&mut canvas, "ROC Curve");
    let axes = curve_axes();
    axes.draw(&mut canvas, &unit_ticks(), &unit_ticks(), "False Positive Rate", "True Positive Rate");
    canvas.dashed_line(axes.to_px(0.0, 0.0), axes.to_px(1.0, 1.0), NAVY, 2, 8);
    axes.polyline(&mut canvas, curve, DARK_ORANGE);
    let label = format!("ROC curve (area = {:.2})", curve.auc());
    axes.legend(&mut canvas, &label, DARK_ORANGE, true);
    canvas
}

fn render_precision_recall_curve(curve: &Curve) -> Canvas {
    let mut canvas = Canvas::new(CHART_WIDTH, CHART_HEIGHT);
    title(&mut canvas, "Precision-Recall Curve");
    let axes = curve_axes();
    axes.draw(&mut canvas, &unit_ticks(), &unit_ticks(), "Recall", "Precision");
    axes.polyline(&mut canvas, curve, GREEN);
    let label = format!("PR curve (area = {:.2})", curve.auc());
    axes.legend(&mut canvas, &label, GREEN, false);
    canvas
}

fn render_feature_importance(ranked: &[(String, f64)]) -> Canvas {
    let mut canvas = Canvas::new(960, 480);
    title(&mut canvas, "Feature Importance for Mega Evolution");

    let label_width = ranked
        .iter()
        .map(|(name, _)| Canvas::text_width(name, LABEL_SCALE))
        .max()
        .unwrap_or(0);
    let max = ranked.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let x_max = if max > 0.0 { (max * 10.0).ceil() / 10.0 } else { 1.0 };
    let axes = Axes {
        left: label_width + 40,
        top: 70,
        right: canvas.width() as i64 - 40,
        bottom: canvas.height() as i64 - 90,
        x_range: (0.0, x_max),
        y_range: (0.0, 1.0),
    };

    let slot = (axes.bottom - axes.top) / ranked.len().max(1) as i64;
    let th = Canvas::text_height(LABEL_SCALE);
    for (i, (name, value)) in ranked.iter().enumerate() {
        let y = axes.top + i as i64 * slot;
        let (x_end, _) = axes.to_px(*value, 0.0);
        let pad = slot / 8;
        canvas.fill_rect(axes.left, y + pad, x_end - axes.left, slot - 2 * pad, BAR_PALETTE[i % BAR_PALETTE.len()]);
        let w = Canvas::text_width(name, LABEL_SCALE);
        canvas.text(axes.left - 10 - w, y + slot / 2 - th / 2, name, LABEL_SCALE, BLACK);
    }

    let x_ticks: Vec<f64> = (0..=4).map(|i| x_max * i as f64 / 4.0).collect();
    axes.draw(&mut canvas, &x_ticks, &[], "Importance", "");
    canvas
}

pub fn confusion_matrix(cm: &ConfusionMatrix, path: &Path) -> Result<()> {
    render_confusion_matrix(cm).save(path)
}

pub fn roc_curve(curve: &Curve, path: &Path) -> Result<()> {
    render_roc_curve(curve).save(path)
}

pub fn precision_recall_curve(curve: &Curve, path: &Path) -> Result<()> {
    render_precision_recall_curve(curve).save(path)
}

/// Horizontal bars in the order given; callers pass them ranked.
pub fn feature_importance(ranked: &[(String, f64)], path: &Path) -> Result<()> {
    render_feature_importance(ranked).save(path)
}
