//! # Cell Drawing
//!
//! Paints one cell box: background, text, decoration, then borders. Borders
//! go last so they sit on top of neighbouring backgrounds.

use super::rows::LINE_HEIGHT_FACTOR;
use crate::border::{draw_border_line, draw_cell_borders};
use crate::cascade::ResolvedCellStyle;
use crate::font::Font;
use crate::style::{Alignment, TextDecoration, TextOverflow, VerticalAlignment, WordWrap};
use crate::surface::{LineOptions, Page, Point, RectOptions, TextOptions};
use crate::text::{apply_text_transform, TextMeasurer};

/// Distance of an underline below the baseline.
const UNDERLINE_OFFSET: f64 = 1.5;
/// Height of a strike-through line above the baseline, relative to font size.
const LINE_THROUGH_RATIO: f64 = 0.3;

/// Placement of a cell on its page. `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The string a cell displays once its text transform is applied.
pub fn display_text(raw: &str, style: &ResolvedCellStyle) -> String {
    apply_text_transform(raw, style.text_transform)
}

pub fn draw_cell(page: &mut Page, cell: CellBox, raw_text: &str, style: &ResolvedCellStyle, font: &Font) {
    let CellBox { x, y, width, height } = cell;

    if let Some(bg) = style.background_color {
        page.draw_rectangle(RectOptions {
            x,
            y: y - height,
            width,
            height,
            color: Some(bg),
            opacity: style.opacity,
            ..Default::default()
        });
    }

    let text = display_text(raw_text, style);
    let measurer = TextMeasurer::new(font);
    let size = style.font_size;
    let pad = style.padding;
    let inner_width = width - pad.horizontal();

    let line_x = |line_width: f64| match style.alignment {
        Alignment::Left => x + pad.left,
        Alignment::Center => x + (width - line_width) / 2.0,
        Alignment::Right => x + width - line_width - pad.right,
    };

    if style.word_wrap == WordWrap::None {
        let shown = match style.text_overflow {
            TextOverflow::Ellipsis => measurer.truncate_with_ellipsis(&text, inner_width, size),
            TextOverflow::Clip => text,
        };
        let baseline = match style.vertical_alignment {
            VerticalAlignment::Top => y - pad.top - size,
            VerticalAlignment::Middle => y - height + (height - size) / 2.0,
            VerticalAlignment::Bottom => y - height + pad.bottom,
        };
        let line_width = measurer.measure_width(&shown, size);
        draw_line_of_text(page, &shown, line_x(line_width), baseline, line_width, style, font);
    } else {
        let lines = measurer.wrap(&text, inner_width, size);
        let line_height = size * LINE_HEIGHT_FACTOR;
        let total = lines.len() as f64 * line_height;
        let block_top = match style.vertical_alignment {
            VerticalAlignment::Top => y - pad.top,
            VerticalAlignment::Middle => y - (height - total) / 2.0,
            VerticalAlignment::Bottom => y - height + pad.bottom + total,
        };
        for (i, line) in lines.iter().enumerate() {
            let baseline = block_top - i as f64 * line_height - size;
            let line_width = measurer.measure_width(line, size);
            draw_line_of_text(page, line, line_x(line_width), baseline, line_width, style, font);
        }
    }

    match style.legacy_outline() {
        Some((color, border_width)) => page.draw_rectangle(RectOptions {
            x,
            y: y - height,
            width,
            height,
            border_color: Some(color),
            border_width,
            ..Default::default()
        }),
        None => draw_cell_borders(page, x, y, width, height, &style.borders),
    }

    for extra in &style.additional_borders {
        let line_y = y - extra.y_offset;
        draw_border_line(page, x, line_y, x + width, line_y, &extra.style);
    }
}

fn draw_line_of_text(
    page: &mut Page,
    line: &str,
    x: f64,
    baseline: f64,
    line_width: f64,
    style: &ResolvedCellStyle,
    font: &Font,
) {
    if line.is_empty() {
        return;
    }
    let size = style.font_size;
    page.draw_text(
        line,
        TextOptions {
            x,
            y: baseline,
            size,
            color: style.font_color,
            font: font.clone(),
        },
    );

    let decoration_y = match style.text_decoration {
        TextDecoration::None => return,
        TextDecoration::Underline => baseline - UNDERLINE_OFFSET,
        TextDecoration::LineThrough => baseline + size * LINE_THROUGH_RATIO,
    };
    page.draw_line(LineOptions {
        start: Point::new(x, decoration_y),
        end: Point::new(x + line_width, decoration_y),
        thickness: size / 15.0,
        color: style.font_color,
    });
}
