//! # Border Rendering
//!
//! Turns per-side [`BorderStyle`]s into line segments on a page. Solid
//! borders are one line; dashed and dotted borders are cut into the "on"
//! intervals of their dash pattern and drawn as one line per interval, with
//! the pattern advanced by the dash phase before the first interval.

use crate::cascade::SideBorders;
use crate::style::{BorderStyle, LineStyle, Rgb};
use crate::surface::{LineOptions, Page, Point};

pub const DEFAULT_DASH: [f64; 2] = [3.0, 3.0];
pub const DEFAULT_DOT: [f64; 2] = [1.0, 2.0];

/// Concrete stroke parameters of a visible border.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
    /// Empty for solid lines.
    pub dash: Vec<f64>,
    pub phase: f64,
}

impl Stroke {
    /// `None` when the border is suppressed or has no width.
    pub fn from_style(style: &BorderStyle) -> Option<Stroke> {
        if style.display == Some(false) {
            return None;
        }
        let width = style.width.unwrap_or(1.0);
        if width <= 0.0 {
            return None;
        }
        let line_style = match (style.style, &style.dash_array) {
            (Some(s), _) => s,
            (None, Some(_)) => LineStyle::Dashed,
            (None, None) => LineStyle::Solid,
        };
        let dash = match line_style {
            LineStyle::Solid => Vec::new(),
            LineStyle::Dashed => style.dash_array.clone().unwrap_or_else(|| DEFAULT_DASH.to_vec()),
            LineStyle::Dotted => style.dash_array.clone().unwrap_or_else(|| DEFAULT_DOT.to_vec()),
        };
        Some(Stroke {
            color: style
                .color
                .as_ref()
                .map(|c| c.normalize())
                .unwrap_or(Rgb::BLACK),
            width,
            dash,
            phase: style.dash_phase.unwrap_or(0.0),
        })
    }
}

/// The "on" intervals `(from, to)` of a dash pattern along a line of
/// `length`, measured from the line's start.
///
/// An empty or non-positive pattern yields one solid interval. Odd-length
/// patterns repeat once so on and off alternate consistently.
pub fn dash_segments(length: f64, pattern: &[f64], phase: f64) -> Vec<(f64, f64)> {
    if length <= 0.0 {
        return Vec::new();
    }
    let mut pattern: Vec<f64> = pattern.iter().copied().filter(|v| *v >= 0.0).collect();
    if pattern.iter().sum::<f64>() <= 0.0 {
        return vec![(0.0, length)];
    }
    if pattern.len() % 2 == 1 {
        pattern.extend_from_within(..);
    }
    let period: f64 = pattern.iter().sum();

    // Skip into the pattern by the phase.
    let mut offset = phase.rem_euclid(period);
    let mut idx = 0;
    while offset >= pattern[idx] {
        offset -= pattern[idx];
        idx = (idx + 1) % pattern.len();
    }
    let mut remaining = pattern[idx] - offset;

    let mut segments = Vec::new();
    let mut pos = 0.0;
    while pos < length {
        let end = (pos + remaining).min(length);
        if idx % 2 == 0 && end > pos {
            segments.push((pos, end));
        }
        pos += remaining;
        idx = (idx + 1) % pattern.len();
        remaining = pattern[idx];
    }
    segments
}

/// Draw one border line from `(x1, y1)` to `(x2, y2)`.
pub fn draw_border_line(page: &mut Page, x1: f64, y1: f64, x2: f64, y2: f64, style: &BorderStyle) {
    let Some(stroke) = Stroke::from_style(style) else {
        return;
    };
    let length = (x2 - x1).hypot(y2 - y1);
    if length <= 0.0 {
        return;
    }

    if stroke.dash.is_empty() {
        page.draw_line(LineOptions {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
            thickness: stroke.width,
            color: stroke.color,
        });
        return;
    }

    let (ux, uy) = ((x2 - x1) / length, (y2 - y1) / length);
    for (from, to) in dash_segments(length, &stroke.dash, stroke.phase) {
        page.draw_line(LineOptions {
            start: Point::new(x1 + ux * from, y1 + uy * from),
            end: Point::new(x1 + ux * to, y1 + uy * to),
            thickness: stroke.width,
            color: stroke.color,
        });
    }
}

/// Draw the four side borders of a cell whose top-left corner is `(x, y)`.
pub fn draw_cell_borders(page: &mut Page, x: f64, y: f64, width: f64, height: f64, borders: &SideBorders) {
    let bottom = y - height;
    let right = x + width;
    if let Some(top) = &borders.top {
        draw_border_line(page, x, y, right, y, top);
    }
    if let Some(side) = &borders.right {
        draw_border_line(page, right, y, right, bottom, side);
    }
    if let Some(side) = &borders.bottom {
        draw_border_line(page, x, bottom, right, bottom, side);
    }
    if let Some(side) = &borders.left {
        draw_border_line(page, x, y, x, bottom, side);
    }
}
