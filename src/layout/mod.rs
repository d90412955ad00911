//! # Table Layout
//!
//! Draws a grid onto document pages, one row at a time, top to bottom.
//!
//! The layout pass never works on an infinitely tall canvas that gets sliced
//! afterwards. It is driven by a [`PageCursor`]:
//!
//! 1. Plan every row height up front (see [`rows`]), so the lines a row was
//!    sized for are exactly the lines that get drawn.
//! 2. Before drawing a row, ask whether it fits above the page-break
//!    threshold. If it does, draw it and move the cursor down.
//! 3. If it doesn't, add a page, redraw the header rows there when header
//!    repetition is on, and continue with the row that didn't fit.
//!
//! Rows are never split across pages. A merged region is drawn whole in the
//! row of its anchor, even when later rows it spans move to the next page.

pub mod cell;
pub mod page_break;
pub mod rows;

use std::collections::HashMap;

use serde::Serialize;

use crate::cascade::{ResolvedCellStyle, StyleResolver};
use crate::design::{DesignConfig, TableDimensions};
use crate::error::{Result, TableError};
use crate::font::{Font, StandardFont};
use crate::grid::Grid;
use crate::merge::{CellRole, MergedRegions};
use crate::style::{CellStyle, FontStyle};
use crate::surface::Document;

pub use cell::CellBox;
pub use page_break::{decide_break, BreakDecision, PageCursor, DEFAULT_PAGE_BREAK_THRESHOLD, TOP_MARGIN};

/// Default left edge of a table.
pub const DEFAULT_START_X: f64 = 50.0;

/// Geometry and pagination settings for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub start_x: f64,
    pub row_height: f64,
    pub col_width: f64,
    /// Number of leading rows redrawn at the top of every continuation page.
    pub repeat_header_rows: usize,
    /// Master switch for `repeat_header_rows`.
    pub header_repetition: bool,
    pub page_break_threshold: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            start_x: DEFAULT_START_X,
            row_height: 20.0,
            col_width: 80.0,
            repeat_header_rows: 0,
            header_repetition: true,
            page_break_threshold: DEFAULT_PAGE_BREAK_THRESHOLD,
        }
    }
}

/// Where a render pass ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSummary {
    pub first_page: usize,
    pub last_page: usize,
    /// Top edge of whatever would come after the table on the last page.
    pub end_y: f64,
    pub row_heights: Vec<f64>,
    pub page_breaks: usize,
}

/// Fonts used by a render pass, one handle per standard face.
///
/// A table-wide custom font takes precedence over every family, weight and
/// style a cell asks for.
#[derive(Debug, Default)]
pub struct FontSet {
    custom: Option<Font>,
    standard: HashMap<StandardFont, Font>,
}

impl FontSet {
    pub fn new(custom: Option<Font>) -> Self {
        FontSet {
            custom,
            standard: HashMap::new(),
        }
    }

    pub fn font_for(&mut self, style: &ResolvedCellStyle) -> Font {
        if let Some(custom) = &self.custom {
            return custom.clone();
        }
        let face = StandardFont::for_family(
            style.font_family.as_deref(),
            style.font_weight.is_bold(),
            style.font_style == FontStyle::Italic,
        );
        self.standard
            .entry(face)
            .or_insert_with(|| {
                if face.metrics().is_none() {
                    log::warn!("{} has no metrics; widths are estimated", face.pdf_name());
                }
                Font::standard(face)
            })
            .clone()
    }
}

/// Lays one grid out onto a document.
pub struct LayoutEngine<'a> {
    grid: &'a Grid,
    regions: &'a MergedRegions,
    design: &'a DesignConfig,
    resolver: StyleResolver<'a>,
    dims: TableDimensions,
    fonts: FontSet,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        grid: &'a Grid,
        regions: &'a MergedRegions,
        design: &'a DesignConfig,
        custom_font: Option<Font>,
    ) -> Self {
        LayoutEngine {
            grid,
            regions,
            design,
            resolver: StyleResolver::new(design),
            dims: TableDimensions {
                rows: grid.rows(),
                columns: grid.columns(),
            },
            fonts: FontSet::new(custom_font),
        }
    }

    /// Effective style of a cell.
    pub fn style(&self, row: usize, col: usize) -> ResolvedCellStyle {
        let fallback = CellStyle::default();
        let raw = self.grid.style(row, col).unwrap_or(&fallback);
        self.resolver.resolve(row, col, raw, self.dims)
    }

    /// Draw the table starting at `start`, adding pages as rows run past
    /// the break threshold.
    pub fn render(
        &mut self,
        doc: &mut Document,
        start: PageCursor,
        options: &RenderOptions,
    ) -> Result<RenderSummary> {
        let heights = self.plan_row_heights(options.row_height, options.col_width);
        let page_size = doc
            .page(start.page.0)
            .map(|p| p.size())
            .ok_or_else(|| TableError::Render(format!("page {} does not exist", start.page.0)))?;

        let rows = self.dims.rows;
        let header_rows = if options.header_repetition {
            options.repeat_header_rows.min(rows)
        } else {
            0
        };
        let mut cursor = start;
        let mut page_breaks = 0;

        for row in 0..rows {
            // Only the row's own height is checked, so an anchor spanning
            // later rows can extend below the threshold.
            if decide_break(cursor.y, heights[row], options.page_break_threshold)
                == BreakDecision::NewPage
            {
                let page = doc.add_page_with_size(page_size);
                log::debug!(
                    "row {} ({:.2}pt) does not fit at y={:.2}, continuing on page {}",
                    row,
                    heights[row],
                    cursor.y,
                    page.0
                );
                cursor = PageCursor::top_of(page, page_size.height);
                page_breaks += 1;
                if header_rows > 0 {
                    for header in 0..header_rows {
                        self.draw_row(doc, &cursor, header, &heights, options)?;
                        cursor.advance(heights[header]);
                    }
                    cursor.headers_reprinted = true;
                    log::debug!("reprinted {} header row(s) on page {}", header_rows, page.0);
                }
            }

            if cursor.headers_reprinted && row < header_rows {
                continue;
            }
            self.draw_row(doc, &cursor, row, &heights, options)?;
            cursor.advance(heights[row]);
        }

        log::debug!(
            "laid out {}x{} table over {} page(s)",
            rows,
            self.dims.columns,
            page_breaks + 1
        );
        Ok(RenderSummary {
            first_page: start.page.0,
            last_page: cursor.page.0,
            end_y: cursor.y,
            row_heights: heights,
            page_breaks,
        })
    }

    fn draw_row(
        &mut self,
        doc: &mut Document,
        cursor: &PageCursor,
        row: usize,
        heights: &[f64],
        options: &RenderOptions,
    ) -> Result<()> {
        let missing = || TableError::Render(format!("page {} does not exist", cursor.page.0));
        if doc.page(cursor.page.0).is_none() {
            return Err(missing());
        }

        for col in 0..self.dims.columns {
            let (width, height) = match self.regions.role(row, col) {
                CellRole::Continuation => continue,
                CellRole::Plain => (options.col_width, heights[row]),
                CellRole::Anchor(region) => {
                    let last = region.end_row.min(heights.len() - 1);
                    (
                        options.col_width * region.col_span() as f64,
                        heights[row..=last].iter().sum(),
                    )
                }
            };
            let style = self.style(row, col);
            let font = doc.register_font(&self.fonts.font_for(&style));
            let cell_box = CellBox {
                x: options.start_x + col as f64 * options.col_width,
                y: cursor.y,
                width,
                height,
            };
            let page = doc.page_mut(cursor.page).ok_or_else(missing)?;
            cell::draw_cell(page, cell_box, self.grid.cell(row, col).unwrap_or(""), &style, &font);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergedRegion;
    use crate::style::FontWeight;
    use crate::surface::PageId;

    fn render_grid(grid: &Grid, regions: &MergedRegions, options: &RenderOptions) -> (Document, RenderSummary) {
        let design = DesignConfig::default();
        let mut doc = Document::new();
        let page = doc.add_page();
        let height = doc.page(0).unwrap().size().height;
        let mut engine = LayoutEngine::new(grid, regions, &design, None);
        let summary = engine
            .render(&mut doc, PageCursor::top_of(page, height), options)
            .unwrap();
        (doc, summary)
    }

    fn numbered(rows: usize) -> Grid {
        let mut grid = Grid::new(rows, 1);
        for r in 0..rows {
            grid.set_cell(r, 0, &format!("r{}", r)).unwrap();
        }
        grid
    }

    fn page_texts(doc: &Document, index: usize) -> Vec<String> {
        doc.page(index).unwrap().texts().map(|(t, _)| t.to_string()).collect()
    }

    #[test]
    fn font_set_caches_faces() {
        let mut fonts = FontSet::new(None);
        let design = DesignConfig::default();
        let resolver = StyleResolver::new(&design);
        let dims = TableDimensions { rows: 1, columns: 1 };
        let plain = resolver.resolve(0, 0, &CellStyle::default(), dims);
        let bold = resolver.resolve(
            0,
            0,
            &CellStyle {
                font_weight: Some(FontWeight::BOLD),
                ..Default::default()
            },
            dims,
        );
        let a = fonts.font_for(&plain);
        let b = fonts.font_for(&plain);
        assert!(a.same_face(&b));
        assert_eq!(fonts.font_for(&bold).name(), "Helvetica-Bold");
    }

    #[test]
    fn short_table_stays_on_one_page() {
        let grid = numbered(3);
        let (doc, summary) = render_grid(&grid, &MergedRegions::new(), &RenderOptions::default());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(summary.page_breaks, 0);
        assert_eq!(page_texts(&doc, 0), vec!["r0", "r1", "r2"]);
    }

    #[test]
    fn drawn_fonts_are_registered_once() {
        let mut grid = numbered(3);
        grid.set_style(
            2,
            0,
            CellStyle {
                font_weight: Some(FontWeight::BOLD),
                ..Default::default()
            },
        )
        .unwrap();
        let (doc, _) = render_grid(&grid, &MergedRegions::new(), &RenderOptions::default());
        let names: Vec<&str> = doc.fonts().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Helvetica", "Helvetica-Bold"]);
    }

    #[test]
    fn long_table_breaks_onto_new_pages() {
        let grid = numbered(60);
        let (doc, summary) = render_grid(&grid, &MergedRegions::new(), &RenderOptions::default());
        assert!(doc.page_count() >= 2);
        assert_eq!(summary.last_page, doc.page_count() - 1);
        let total: usize = (0..doc.page_count()).map(|i| page_texts(&doc, i).len()).sum();
        assert_eq!(total, 60);
        // every row's bottom edge stays above the threshold
        for page in doc.pages() {
            for (_, opts) in page.texts() {
                assert!(opts.y > DEFAULT_PAGE_BREAK_THRESHOLD);
            }
        }
    }

    #[test]
    fn header_rows_repeat_after_a_break() {
        let grid = numbered(60);
        let options = RenderOptions {
            repeat_header_rows: 1,
            ..Default::default()
        };
        let (doc, _) = render_grid(&grid, &MergedRegions::new(), &options);
        assert!(doc.page_count() >= 2);
        let second = page_texts(&doc, 1);
        assert_eq!(second[0], "r0");
        assert_ne!(second[1], "r0");
        let r0_total = (0..doc.page_count())
            .flat_map(|i| page_texts(&doc, i))
            .filter(|t| t == "r0")
            .count();
        assert_eq!(r0_total, doc.page_count());
    }

    #[test]
    fn header_repetition_can_be_switched_off() {
        let grid = numbered(60);
        let options = RenderOptions {
            repeat_header_rows: 1,
            header_repetition: false,
            ..Default::default()
        };
        let (doc, _) = render_grid(&grid, &MergedRegions::new(), &options);
        let r0_total = (0..doc.page_count())
            .flat_map(|i| page_texts(&doc, i))
            .filter(|t| t == "r0")
            .count();
        assert_eq!(r0_total, 1);
    }

    #[test]
    fn continuation_cells_are_not_drawn() {
        let mut grid = Grid::new(2, 2);
        grid.set_cell(0, 0, "A").unwrap();
        grid.set_cell(0, 1, "hidden").unwrap();
        grid.set_cell(1, 1, "B").unwrap();
        let mut regions = MergedRegions::new();
        regions.push(MergedRegion::new(0, 0, 0, 1));
        let (doc, _) = render_grid(&grid, &regions, &RenderOptions::default());
        assert_eq!(page_texts(&doc, 0), vec!["A", "B"]);
    }

    #[test]
    fn render_into_missing_page_fails() {
        let grid = numbered(1);
        let regions = MergedRegions::new();
        let design = DesignConfig::default();
        let mut doc = Document::new();
        let mut engine = LayoutEngine::new(&grid, &regions, &design, None);
        let err = engine
            .render(&mut doc, PageCursor::new(PageId(3), 700.0), &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, TableError::Render(_)));
    }
}
