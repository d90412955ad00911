//! # Cell Grid
//!
//! Two parallel `rows × columns` arrays: cell text and raw per-cell styles.
//! Every coordinate access is bounds-checked against the current size.

use crate::error::{Result, TableError};
use crate::style::CellStyle;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    content: Vec<Vec<String>>,
    styles: Vec<Vec<CellStyle>>,
    rows: usize,
    columns: usize,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Grid {
            content: vec![vec![String::new(); columns]; rows],
            styles: vec![vec![CellStyle::default(); columns]; rows],
            rows,
            columns,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.columns {
            return Err(TableError::OutOfRange {
                row,
                col,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }

    pub fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        self.check(row, col)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.check(row, col)?;
        self.content[row][col] = text.to_string();
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&str> {
        self.check(row, col)?;
        Ok(&self.content[row][col])
    }

    /// Replace the stored style of a cell. No merging with the previous one.
    pub fn set_style(&mut self, row: usize, col: usize, style: CellStyle) -> Result<()> {
        self.check(row, col)?;
        self.styles[row][col] = style;
        Ok(())
    }

    pub fn style(&self, row: usize, col: usize) -> Result<&CellStyle> {
        self.check(row, col)?;
        Ok(&self.styles[row][col])
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.check(row, col)?;
        self.content[row][col].clear();
        self.styles[row][col] = CellStyle::default();
        Ok(())
    }

    pub fn push_row(&mut self) {
        self.content.push(vec![String::new(); self.columns]);
        self.styles.push(vec![CellStyle::default(); self.columns]);
        self.rows += 1;
    }

    pub fn push_column(&mut self) {
        for row in &mut self.content {
            row.push(String::new());
        }
        for row in &mut self.styles {
            row.push(CellStyle::default());
        }
        self.columns += 1;
    }

    pub fn remove_row(&mut self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(TableError::OutOfRange {
                row,
                col: 0,
                rows: self.rows,
                columns: self.columns,
            });
        }
        self.content.remove(row);
        self.styles.remove(row);
        self.rows -= 1;
        Ok(())
    }

    pub fn remove_column(&mut self, col: usize) -> Result<()> {
        if col >= self.columns {
            return Err(TableError::OutOfRange {
                row: 0,
                col,
                rows: self.rows,
                columns: self.columns,
            });
        }
        for row in &mut self.content {
            row.remove(col);
        }
        for row in &mut self.styles {
            row.remove(col);
        }
        self.columns -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Alignment;

    #[test]
    fn new_grid_is_empty() {
        let g = Grid::new(2, 3);
        assert_eq!(g.rows(), 2);
        assert_eq!(g.columns(), 3);
        assert_eq!(g.cell(1, 2).unwrap(), "");
        assert!(g.style(1, 2).unwrap().is_empty());
    }

    #[test]
    fn bounds_are_checked() {
        let mut g = Grid::new(2, 2);
        assert!(matches!(g.set_cell(2, 0, "x"), Err(TableError::OutOfRange { .. })));
        assert!(matches!(g.cell(0, 2), Err(TableError::OutOfRange { .. })));
        assert!(g.remove_row(2).is_err());
        assert!(g.remove_column(2).is_err());
    }

    #[test]
    fn clear_resets_text_and_style() {
        let mut g = Grid::new(1, 1);
        g.set_cell(0, 0, "x").unwrap();
        g.set_style(
            0,
            0,
            CellStyle {
                alignment: Some(Alignment::Right),
                ..Default::default()
            },
        )
        .unwrap();
        g.clear_cell(0, 0).unwrap();
        assert_eq!(g.cell(0, 0).unwrap(), "");
        assert!(g.style(0, 0).unwrap().is_empty());
    }

    #[test]
    fn rows_and_columns_grow_and_shrink() {
        let mut g = Grid::new(2, 2);
        g.set_cell(1, 1, "keep").unwrap();
        g.push_column();
        assert_eq!(g.cell(1, 2).unwrap(), "");
        g.push_row();
        assert_eq!(g.rows(), 3);
        g.remove_row(0).unwrap();
        assert_eq!(g.cell(0, 1).unwrap(), "keep");
        g.remove_column(0).unwrap();
        assert_eq!(g.cell(0, 0).unwrap(), "keep");
        assert_eq!((g.rows(), g.columns()), (2, 2));
    }
}
