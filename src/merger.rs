//! # Table Merging
//!
//! Concatenates tables side by side or one under another into a new table.
//! Cell text and merged regions are copied with their coordinates offset;
//! styles and the design come along only when asked for.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::table::{PdfTable, TableOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeDirection {
    /// Side by side: columns add up, rows take the maximum.
    Horizontal,
    /// One under another: rows add up, columns take the maximum.
    #[default]
    Vertical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    pub direction: MergeDirection,
    /// Carry over the first table's design and every table's explicit cell
    /// styles.
    pub maintain_styles: bool,
}

/// Merge two or more tables into a new one.
pub fn merge_tables(tables: &[PdfTable], options: MergeOptions) -> Result<PdfTable> {
    if tables.len() < 2 {
        return Err(TableError::NotEnoughTables(tables.len()));
    }

    let horizontal = options.direction == MergeDirection::Horizontal;
    let (rows, columns) = if horizontal {
        (
            tables.iter().map(PdfTable::row_count).max().unwrap_or(0),
            tables.iter().map(PdfTable::column_count).sum(),
        )
    } else {
        (
            tables.iter().map(PdfTable::row_count).sum(),
            tables.iter().map(PdfTable::column_count).max().unwrap_or(0),
        )
    };

    let mut merged = PdfTable::new(TableOptions::new(rows, columns));
    if options.maintain_styles {
        merged.apply_design_config(tables[0].design_config());
    }

    let mut offset = 0;
    for table in tables {
        let (row_offset, col_offset) = if horizontal { (0, offset) } else { (offset, 0) };

        for row in 0..table.row_count() {
            for col in 0..table.column_count() {
                let (r, c) = (row + row_offset, col + col_offset);
                merged.set_cell(r, c, table.get_cell(row, col)?)?;
                if options.maintain_styles {
                    let style = table.get_raw_cell_style(row, col)?;
                    if !style.is_empty() {
                        merged.set_cell_style(r, c, style.clone())?;
                    }
                }
            }
        }

        for region in table.merged_regions() {
            let moved = region.offset(row_offset, col_offset);
            merged.merge_cells(moved.start_row, moved.start_col, moved.end_row, moved.end_col)?;
        }

        offset += if horizontal {
            table.column_count()
        } else {
            table.row_count()
        };
    }

    log::debug!(
        "merged {} tables {:?} into {}x{}",
        tables.len(),
        options.direction,
        rows,
        columns
    );
    Ok(merged)
}
