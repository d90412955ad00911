//! # Row Height Planning
//!
//! With dynamic row heights enabled, each row is as tall as its tallest
//! cell needs, and never shorter than the base row height. A merged anchor
//! needs room for its wrapped text across the region's full width; that
//! requirement is shared evenly by the rows the region spans.

use super::{cell, LayoutEngine};
use crate::cascade::ResolvedCellStyle;
use crate::merge::CellRole;
use crate::style::WordWrap;
use crate::text::TextMeasurer;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Height a cell of `width` needs to show `text` in `style`.
pub fn required_height(
    measurer: &TextMeasurer<'_>,
    text: &str,
    width: f64,
    style: &ResolvedCellStyle,
) -> f64 {
    let size = style.font_size;
    let vertical = style.padding.vertical();
    if style.word_wrap == WordWrap::None {
        return size + vertical;
    }
    let inner_width = width - style.padding.horizontal();
    let lines = measurer.wrap(text, inner_width, size);
    lines.len() as f64 * size * LINE_HEIGHT_FACTOR + vertical
}

impl LayoutEngine<'_> {
    /// Height of every row. Fixed at `base_row_height` when dynamic sizing
    /// is off.
    pub fn plan_row_heights(&mut self, base_row_height: f64, col_width: f64) -> Vec<f64> {
        let rows = self.dims.rows;
        let mut heights = vec![base_row_height; rows];
        if !self.design.dynamic_row_height() {
            return heights;
        }

        for row in 0..rows {
            for col in 0..self.dims.columns {
                let (width, spanned_rows) = match self.regions.role(row, col) {
                    CellRole::Continuation => continue,
                    CellRole::Plain => (col_width, row..=row),
                    CellRole::Anchor(region) => (
                        col_width * region.col_span() as f64,
                        row..=region.end_row.min(rows - 1),
                    ),
                };

                let style = self.style(row, col);
                let font = self.fonts.font_for(&style);
                let measurer = TextMeasurer::new(&font);
                let text = cell::display_text(self.grid.cell(row, col).unwrap_or(""), &style);
                let required = required_height(&measurer, &text, width, &style);

                let share = required / spanned_rows.clone().count() as f64;
                for r in spanned_rows {
                    heights[r] = heights[r].max(share);
                }
            }
        }

        for (row, h) in heights.iter().enumerate() {
            log::trace!("row {} planned at {:.2}pt", row, h);
        }
        heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{DesignConfig, TableDimensions};
    use crate::font::{Font, StandardFont};
    use crate::grid::Grid;
    use crate::merge::{MergedRegion, MergedRegions};
    use crate::style::{CellStyle, Padding};

    fn courier_design() -> DesignConfig {
        DesignConfig {
            base: CellStyle {
                font_family: Some("Courier".into()),
                font_size: Some(10.0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn empty_cell_needs_one_line() {
        let design = DesignConfig::default();
        let style = crate::cascade::StyleResolver::new(&design).resolve(
            0,
            0,
            &CellStyle::default(),
            TableDimensions { rows: 1, columns: 1 },
        );
        let font = Font::standard(StandardFont::Helvetica);
        let h = required_height(&TextMeasurer::new(&font), "", 80.0, &style);
        assert!((h - (12.0 * 1.2 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn no_wrap_is_one_font_size() {
        let design = DesignConfig::default();
        let raw = CellStyle {
            word_wrap: Some(WordWrap::None),
            padding: Some(Padding::Uniform(2.0)),
            ..Default::default()
        };
        let style = crate::cascade::StyleResolver::new(&design).resolve(
            0,
            0,
            &raw,
            TableDimensions { rows: 1, columns: 1 },
        );
        let font = Font::standard(StandardFont::Helvetica);
        let long = "a very long text that would otherwise wrap many many times";
        let h = required_height(&TextMeasurer::new(&font), long, 30.0, &style);
        assert!((h - 16.0).abs() < 1e-9);
    }

    #[test]
    fn rows_grow_to_tallest_cell() {
        let design = courier_design();
        let mut grid = Grid::new(2, 2);
        // 80pt wide cell, 70pt inner: 11 Courier chars per line at 10pt
        grid.set_cell(0, 1, "aaaa bbbb cccc dddd").unwrap();
        let regions = MergedRegions::new();
        let mut engine = LayoutEngine::new(&grid, &regions, &design, None);
        let heights = engine.plan_row_heights(20.0, 80.0);
        assert!((heights[0] - (2.0 * 12.0 + 10.0)).abs() < 1e-9);
        assert!((heights[1] - 22.0).abs() < 1e-9);
    }

    #[test]
    fn base_height_is_a_floor() {
        let design = courier_design();
        let grid = Grid::new(1, 1);
        let regions = MergedRegions::new();
        let mut engine = LayoutEngine::new(&grid, &regions, &design, None);
        assert_eq!(engine.plan_row_heights(40.0, 80.0), vec![40.0]);
    }

    #[test]
    fn fixed_heights_when_dynamic_sizing_is_off() {
        let design = DesignConfig {
            dynamic_row_height: Some(false),
            ..courier_design()
        };
        let mut grid = Grid::new(2, 1);
        grid.set_cell(0, 0, "word ".repeat(40).trim()).unwrap();
        let regions = MergedRegions::new();
        let mut engine = LayoutEngine::new(&grid, &regions, &design, None);
        assert_eq!(engine.plan_row_heights(20.0, 80.0), vec![20.0, 20.0]);
    }

    #[test]
    fn merged_requirement_is_shared_across_rows() {
        let design = courier_design();
        let mut grid = Grid::new(3, 1);
        // six lines in a 80pt column: 6 * 12 + 10 = 82, shared by two rows
        grid.set_cell(0, 0, "aaaaaaaaaaa aaaaaaaaaaa aaaaaaaaaaa aaaaaaaaaaa aaaaaaaaaaa aaaaaaaaaaa")
            .unwrap();
        let mut regions = MergedRegions::new();
        regions.push(MergedRegion::new(0, 0, 1, 0));
        let mut engine = LayoutEngine::new(&grid, &regions, &design, None);
        let heights = engine.plan_row_heights(20.0, 80.0);
        assert!((heights[0] - 41.0).abs() < 1e-9);
        assert!((heights[1] - 41.0).abs() < 1e-9);
        assert!((heights[2] - 22.0).abs() < 1e-9);
    }
}
