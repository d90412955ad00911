//! # Table Document Model
//!
//! A whole table described as JSON: options, an optional template, cell
//! text, per-cell styles, merged regions and a custom font. This is what the
//! CLI reads and what [`render_json`](crate::render_json) accepts.
//!
//! The design is assembled in three layers: the standard design, then the
//! named template, then `table.designConfig`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::font::CustomFont;
use crate::merge::MergedRegion;
use crate::style::CellStyle;
use crate::surface::{Document, Metadata};
use crate::table::{PdfTable, TableOptions};
use crate::template::{TableTemplate, TemplateManager};

/// A complete table ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableDocument {
    pub metadata: Metadata,

    /// Table options. `rows` and `columns` of zero are taken from `cells`.
    pub table: TableOptions,

    /// Name of a template to apply, looked up among the built-in templates
    /// and `templates`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Extra templates registered before the lookup.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TableTemplate>,

    /// Cell text, row by row. Rows may be ragged.
    pub cells: Vec<Vec<String>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<CellStyleEntry>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<MergedRegion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_font: Option<CustomFont>,
}

/// An explicit style for one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStyleEntry {
    pub row: usize,
    pub col: usize,
    pub style: CellStyle,
}

impl TableDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the table this document describes.
    pub fn to_table(&self) -> Result<PdfTable> {
        let mut options = self.table.clone();
        if options.rows == 0 {
            options.rows = self.cells.len();
        }
        if options.columns == 0 {
            options.columns = self.cells.iter().map(Vec::len).max().unwrap_or(0);
        }

        let design = options.design_config.take();
        let mut table = PdfTable::new(options);

        if let Some(name) = &self.template {
            let mut manager = TemplateManager::with_builtin();
            for template in &self.templates {
                manager.add(template.clone())?;
            }
            table.apply_design_config(&manager.to_design_config(name)?);
        }
        if let Some(design) = &design {
            table.apply_design_config(design);
        }

        for (row, cells) in self.cells.iter().enumerate() {
            for (col, text) in cells.iter().enumerate() {
                table.set_cell(row, col, text)?;
            }
        }
        for entry in &self.styles {
            table.set_cell_style(entry.row, entry.col, entry.style.clone())?;
        }
        for region in &self.merges {
            table.merge_cells(region.start_row, region.start_col, region.end_row, region.end_col)?;
        }
        if let Some(font) = &self.custom_font {
            table.set_custom_font(font.clone())?;
        }

        Ok(table)
    }

    /// Render into a fresh document carrying this document's metadata.
    pub fn render(&self) -> Result<Document> {
        let mut doc = self.to_table()?.render_to_new_document()?;
        doc.set_metadata(self.metadata.clone());
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::style::Alignment;

    #[test]
    fn dimensions_come_from_cells() {
        let doc = TableDocument::from_json(
            r#"{ "cells": [["a", "b"], ["c", "d", "e"]] }"#,
        )
        .unwrap();
        let table = doc.to_table().unwrap();
        assert_eq!((table.row_count(), table.column_count()), (2, 3));
        assert_eq!(table.get_cell(1, 2).unwrap(), "e");
        assert_eq!(table.get_cell(0, 2).unwrap(), "");
    }

    #[test]
    fn explicit_dimensions_win() {
        let doc = TableDocument::from_json(
            r#"{ "table": { "rows": 4, "columns": 2 }, "cells": [["a"]] }"#,
        )
        .unwrap();
        let table = doc.to_table().unwrap();
        assert_eq!((table.row_count(), table.column_count()), (4, 2));
    }

    #[test]
    fn cells_outside_the_grid_are_rejected() {
        let doc = TableDocument::from_json(
            r#"{ "table": { "rows": 1, "columns": 1 }, "cells": [["a", "b"]] }"#,
        )
        .unwrap();
        assert!(matches!(doc.to_table(), Err(TableError::OutOfRange { .. })));
    }

    #[test]
    fn styles_and_merges_are_applied() {
        let doc = TableDocument::from_json(
            r#"{
                "cells": [["Total", ""], ["1", "2"]],
                "styles": [{ "row": 0, "col": 0, "style": { "alignment": "center" } }],
                "merges": [{ "startRow": 0, "startCol": 0, "endRow": 0, "endCol": 1 }]
            }"#,
        )
        .unwrap();
        let table = doc.to_table().unwrap();
        assert_eq!(
            table.effective_cell_style(0, 0).unwrap().alignment,
            Alignment::Center
        );
        assert_eq!(table.merged_regions(), &[MergedRegion::new(0, 0, 0, 1)]);
    }

    #[test]
    fn options_design_overrides_template() {
        let doc = TableDocument::from_json(
            r#"{
                "template": "classic",
                "table": { "designConfig": { "fontSize": 7 } },
                "cells": [["a"], ["b"]]
            }"#,
        )
        .unwrap();
        let table = doc.to_table().unwrap();
        assert_eq!(table.design_config().base.font_size, Some(7.0));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let doc = TableDocument {
            template: Some("nope".to_string()),
            cells: vec![vec!["a".to_string()]],
            ..Default::default()
        };
        assert!(matches!(doc.to_table(), Err(TableError::TemplateNotFound(_))));
    }

    #[test]
    fn render_carries_metadata() {
        let doc = TableDocument::from_json(
            r#"{ "metadata": { "title": "Sales" }, "cells": [["a"]] }"#,
        )
        .unwrap();
        let rendered = doc.render().unwrap();
        assert_eq!(rendered.metadata().title.as_deref(), Some("Sales"));
        assert_eq!(rendered.page_count(), 1);
    }
}
