//! # Table Facade
//!
//! [`PdfTable`] owns a grid, its merged regions, a design configuration and
//! an optional custom font, and renders them onto documents.
//!
//! ```
//! use tabula::{PdfTable, TableOptions};
//!
//! let mut table = PdfTable::new(TableOptions::new(2, 2));
//! table.set_cell(0, 0, "Item").unwrap();
//! table.set_cell(0, 1, "Price").unwrap();
//! let doc = table.render_to_new_document().unwrap();
//! assert_eq!(doc.page_count(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::cascade::ResolvedCellStyle;
use crate::design::DesignConfig;
use crate::error::{Result, TableError};
use crate::font::{CustomFont, Font};
use crate::grid::Grid;
use crate::image;
use crate::layout::{
    LayoutEngine, PageCursor, RenderOptions, RenderSummary, DEFAULT_PAGE_BREAK_THRESHOLD,
    DEFAULT_START_X, TOP_MARGIN,
};
use crate::merge::{MergedRegion, MergedRegions};
use crate::style::CellStyle;
use crate::surface::{Document, ImagePlacement, PageId};

fn default_row_height() -> f64 {
    20.0
}

fn default_col_width() -> f64 {
    80.0
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    DEFAULT_PAGE_BREAK_THRESHOLD
}

/// Construction options for a [`PdfTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    #[serde(default)]
    pub rows: usize,
    #[serde(default)]
    pub columns: usize,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    #[serde(default = "default_col_width")]
    pub col_width: f64,
    /// Applied on top of [`DesignConfig::standard`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_config: Option<DesignConfig>,
    /// Total width; overrides `col_width` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_width: Option<f64>,
    /// Total height; overrides `row_height` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_height: Option<f64>,
    #[serde(default)]
    pub repeat_header_rows: usize,
    #[serde(default = "default_true")]
    pub header_repetition: bool,
    #[serde(default = "default_threshold")]
    pub page_break_threshold: f64,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions::new(0, 0)
    }
}

impl TableOptions {
    pub fn new(rows: usize, columns: usize) -> Self {
        TableOptions {
            rows,
            columns,
            row_height: default_row_height(),
            col_width: default_col_width(),
            design_config: None,
            table_width: None,
            table_height: None,
            repeat_header_rows: 0,
            header_repetition: true,
            page_break_threshold: DEFAULT_PAGE_BREAK_THRESHOLD,
        }
    }

    pub fn with_design(mut self, design: DesignConfig) -> Self {
        self.design_config = Some(design);
        self
    }

    pub fn with_repeat_header_rows(mut self, rows: usize) -> Self {
        self.repeat_header_rows = rows;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PdfTable {
    options: TableOptions,
    design: DesignConfig,
    grid: Grid,
    merged: MergedRegions,
    custom_font: Option<CustomFont>,
}

impl PdfTable {
    pub fn new(options: TableOptions) -> Self {
        let mut design = DesignConfig::standard();
        if let Some(config) = &options.design_config {
            design.apply(config);
        }
        PdfTable {
            grid: Grid::new(options.rows, options.columns),
            merged: MergedRegions::new(),
            custom_font: None,
            design,
            options,
        }
    }

    // ── Grid access ────────────────────────────────────────────

    pub fn row_count(&self) -> usize {
        self.grid.rows()
    }

    pub fn column_count(&self) -> usize {
        self.grid.columns()
    }

    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.grid.set_cell(row, col, text)
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Result<&str> {
        self.grid.cell(row, col)
    }

    /// Clear a cell's text and style.
    pub fn remove_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.clear_cell(row, col)
    }

    /// Replace the style of a cell. The previous style is discarded, not
    /// patched.
    pub fn set_cell_style(&mut self, row: usize, col: usize, style: CellStyle) -> Result<()> {
        self.grid.set_style(row, col, style)
    }

    pub fn get_cell_style(&self, row: usize, col: usize) -> Result<&CellStyle> {
        self.grid.style(row, col)
    }

    /// The style exactly as set on the cell, without the design cascade.
    pub fn get_raw_cell_style(&self, row: usize, col: usize) -> Result<&CellStyle> {
        self.grid.style(row, col)
    }

    /// The fully cascaded style a cell would be drawn with.
    pub fn effective_cell_style(&self, row: usize, col: usize) -> Result<ResolvedCellStyle> {
        self.grid.check_bounds(row, col)?;
        Ok(LayoutEngine::new(&self.grid, &self.merged, &self.design, None).style(row, col))
    }

    pub fn add_row(&mut self) {
        self.grid.push_row();
        self.options.rows = self.grid.rows();
    }

    pub fn add_column(&mut self) {
        self.grid.push_column();
        self.options.columns = self.grid.columns();
    }

    /// Remove a row. Merged regions below it move up; regions spanning it
    /// shrink.
    pub fn remove_row(&mut self, row: usize) -> Result<()> {
        self.grid.remove_row(row)?;
        self.merged.remove_row(row);
        self.options.rows = self.grid.rows();
        Ok(())
    }

    /// Remove a column. Merged regions right of it move left; regions
    /// spanning it shrink.
    pub fn remove_column(&mut self, col: usize) -> Result<()> {
        self.grid.remove_column(col)?;
        self.merged.remove_column(col);
        self.options.columns = self.grid.columns();
        Ok(())
    }

    /// Merge the inclusive rectangle between two corners. Only the top-left
    /// cell of the region is drawn.
    pub fn merge_cells(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<()> {
        self.grid.check_bounds(start_row, start_col)?;
        self.grid.check_bounds(end_row, end_col)?;
        if start_row > end_row || start_col > end_col {
            return Err(TableError::InvalidRange {
                start_row,
                start_col,
                end_row,
                end_col,
            });
        }
        self.merged
            .push(MergedRegion::new(start_row, start_col, end_row, end_col));
        Ok(())
    }

    pub fn merged_regions(&self) -> &[MergedRegion] {
        self.merged.as_slice()
    }

    // ── Design and fonts ───────────────────────────────────────

    pub fn design_config(&self) -> &DesignConfig {
        &self.design
    }

    /// Apply `config` on top of the current design. Fields it leaves unset
    /// keep their current value.
    pub fn apply_design_config(&mut self, config: &DesignConfig) {
        self.design.apply(config);
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Use a custom TrueType font for every cell. The payload must be valid
    /// base64; the font itself is parsed when the table is rendered.
    pub fn set_custom_font(&mut self, font: CustomFont) -> Result<()> {
        font.decode()?;
        self.custom_font = Some(font);
        Ok(())
    }

    pub fn custom_font(&self) -> Option<&CustomFont> {
        self.custom_font.as_ref()
    }

    // ── Rendering ──────────────────────────────────────────────

    /// Column width after `table_width` is taken into account.
    pub fn col_width(&self) -> f64 {
        match self.options.table_width {
            Some(total) if self.grid.columns() > 0 => total / self.grid.columns() as f64,
            _ => self.options.col_width,
        }
    }

    /// Base row height after `table_height` is taken into account.
    pub fn row_height(&self) -> f64 {
        match self.options.table_height {
            Some(total) if self.grid.rows() > 0 => total / self.grid.rows() as f64,
            _ => self.options.row_height,
        }
    }

    fn render_options(&self, start_x: f64) -> RenderOptions {
        RenderOptions {
            start_x,
            row_height: self.row_height(),
            col_width: self.col_width(),
            repeat_header_rows: self.options.repeat_header_rows,
            header_repetition: self.options.header_repetition,
            page_break_threshold: self.options.page_break_threshold,
        }
    }

    fn embed_custom_font(&self, doc: &mut Document) -> Result<Option<Font>> {
        match &self.custom_font {
            Some(custom) => Ok(Some(doc.embed_font(custom.decode()?, &custom.name)?)),
            None => Ok(None),
        }
    }

    /// Lay the table out onto `doc` from `start`, with its left edge at
    /// `start_x`.
    pub fn layout(&self, doc: &mut Document, start: PageCursor, start_x: f64) -> Result<RenderSummary> {
        let font = self.embed_custom_font(doc)?;
        let mut engine = LayoutEngine::new(&self.grid, &self.merged, &self.design, font);
        engine.render(doc, start, &self.render_options(start_x))
    }

    /// Render into a fresh document, starting at the top of its first page.
    pub fn render_to_new_document(&self) -> Result<Document> {
        let mut doc = Document::new();
        let page = doc.add_page();
        let height = doc.page(page.0).map(|p| p.size().height).unwrap_or_default();
        self.layout(&mut doc, PageCursor::top_of(page, height), DEFAULT_START_X)?;
        Ok(doc)
    }

    /// Render onto the last page of an existing document with the table's
    /// top-left corner at `(x, y)`. A `y` of zero means the top of the page.
    /// Pages are added as the table runs past the bottom.
    pub fn embed_into(&self, doc: &mut Document, x: f64, y: f64) -> Result<()> {
        if x < 0.0 || y < 0.0 {
            return Err(TableError::InvalidCoordinate { x, y });
        }
        if doc.page_count() == 0 {
            doc.add_page();
        }
        let page = PageId(doc.page_count() - 1);
        let height = doc.page(page.0).map(|p| p.size().height).unwrap_or_default();
        let start_y = if y > 0.0 { y } else { height - TOP_MARGIN };
        self.layout(doc, PageCursor::new(page, start_y), x)?;
        Ok(())
    }

    /// Place a pre-rendered PNG of the table on a new page of `doc`.
    pub fn embed_as_image(
        &self,
        doc: &mut Document,
        png: &[u8],
        placement: ImagePlacement,
    ) -> Result<()> {
        image::validate_png(png)?;
        let image = doc.embed_png(png)?;
        let page = doc.add_page();
        if let Some(page) = doc.page_mut(page) {
            page.draw_image(&image, placement);
        }
        Ok(())
    }

    /// Render into a fresh document and serialize it.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>> {
        self.render_to_new_document()?.save()
    }
}
