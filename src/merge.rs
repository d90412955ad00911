//! # Merged Regions
//!
//! Rectangular groups of cells drawn as one. The top-left cell of a region
//! is its *anchor* and is the only cell drawn; every other cell inside the
//! bounds is a *continuation* and is skipped.
//!
//! Regions are kept in registration order. Overlapping regions are accepted;
//! for any cell the first registered region covering it decides its role.

use serde::{Deserialize, Serialize};

/// Inclusive rectangular cell range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRegion {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl MergedRegion {
    pub fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }

    pub fn is_anchor(&self, row: usize, col: usize) -> bool {
        self.start_row == row && self.start_col == col
    }

    pub fn row_span(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn col_span(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    pub fn overlaps(&self, other: &MergedRegion) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }

    fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    pub fn offset(&self, rows: usize, cols: usize) -> Self {
        MergedRegion::new(
            self.start_row + rows,
            self.start_col + cols,
            self.end_row + rows,
            self.end_col + cols,
        )
    }
}

/// How a cell takes part in drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole<'a> {
    /// Not covered by any region.
    Plain,
    /// Top-left cell of a region; drawn across the whole region.
    Anchor(&'a MergedRegion),
    /// Covered by a region but not its anchor; never drawn.
    Continuation,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedRegions {
    regions: Vec<MergedRegion>,
}

impl MergedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, region: MergedRegion) {
        if let Some(existing) = self.regions.iter().find(|r| r.overlaps(&region)) {
            log::warn!(
                "merged region {:?} overlaps {:?}; the earlier region takes precedence",
                region,
                existing
            );
        }
        self.regions.push(region);
    }

    pub fn as_slice(&self) -> &[MergedRegion] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MergedRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// First registered region covering the cell.
    pub fn region_at(&self, row: usize, col: usize) -> Option<&MergedRegion> {
        self.regions.iter().find(|r| r.contains(row, col))
    }

    pub fn role(&self, row: usize, col: usize) -> CellRole<'_> {
        match self.region_at(row, col) {
            None => CellRole::Plain,
            Some(r) if r.is_anchor(row, col) => CellRole::Anchor(r),
            Some(_) => CellRole::Continuation,
        }
    }

    /// Adjust regions for the removal of `row`.
    pub fn remove_row(&mut self, row: usize) {
        self.regions = self
            .regions
            .iter()
            .filter_map(|r| {
                let (start_row, end_row) = shrink_axis(r.start_row, r.end_row, row)?;
                Some(MergedRegion { start_row, end_row, ..*r })
            })
            .filter(|r| !r.is_single_cell())
            .collect();
    }

    /// Adjust regions for the removal of `col`.
    pub fn remove_column(&mut self, col: usize) {
        self.regions = self
            .regions
            .iter()
            .filter_map(|r| {
                let (start_col, end_col) = shrink_axis(r.start_col, r.end_col, col)?;
                Some(MergedRegion { start_col, end_col, ..*r })
            })
            .filter(|r| !r.is_single_cell())
            .collect();
    }
}

impl<'a> IntoIterator for &'a MergedRegions {
    type Item = &'a MergedRegion;
    type IntoIter = std::slice::Iter<'a, MergedRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// New `(start, end)` of an inclusive span after deleting `removed`, or
/// `None` if the span consisted only of `removed`.
fn shrink_axis(start: usize, end: usize, removed: usize) -> Option<(usize, usize)> {
    if end < removed {
        Some((start, end))
    } else if start > removed {
        Some((start - 1, end - 1))
    } else if start == end {
        None
    } else {
        Some((start, end - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles() {
        let mut regions = MergedRegions::new();
        regions.push(MergedRegion::new(0, 0, 1, 1));
        assert!(matches!(regions.role(0, 0), CellRole::Anchor(_)));
        assert_eq!(regions.role(0, 1), CellRole::Continuation);
        assert_eq!(regions.role(1, 0), CellRole::Continuation);
        assert_eq!(regions.role(2, 0), CellRole::Plain);
    }

    #[test]
    fn first_registered_region_wins() {
        let mut regions = MergedRegions::new();
        regions.push(MergedRegion::new(0, 0, 0, 2));
        regions.push(MergedRegion::new(0, 1, 1, 1));
        // (0, 1) belongs to the first region, so the second never anchors
        assert_eq!(regions.role(0, 1), CellRole::Continuation);
        assert_eq!(regions.role(1, 1), CellRole::Continuation);
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn spans() {
        let r = MergedRegion::new(1, 2, 3, 2);
        assert_eq!(r.row_span(), 3);
        assert_eq!(r.col_span(), 1);
        assert!(r.overlaps(&MergedRegion::new(3, 0, 4, 5)));
        assert!(!r.overlaps(&MergedRegion::new(4, 0, 4, 5)));
    }

    #[test]
    fn removing_rows_shifts_and_shrinks() {
        let mut regions = MergedRegions::new();
        regions.push(MergedRegion::new(0, 0, 0, 1)); // before
        regions.push(MergedRegion::new(2, 0, 4, 0)); // spans
        regions.push(MergedRegion::new(5, 0, 6, 1)); // after
        regions.remove_row(3);
        assert_eq!(
            regions.as_slice(),
            &[
                MergedRegion::new(0, 0, 0, 1),
                MergedRegion::new(2, 0, 3, 0),
                MergedRegion::new(4, 0, 5, 1),
            ]
        );
    }

    #[test]
    fn removal_drops_degenerate_regions() {
        let mut regions = MergedRegions::new();
        regions.push(MergedRegion::new(1, 0, 1, 3)); // only row 1
        regions.push(MergedRegion::new(2, 0, 3, 0)); // shrinks to one cell
        regions.remove_row(2);
        assert_eq!(regions.as_slice(), &[MergedRegion::new(1, 0, 1, 3)]);
        regions.remove_row(1);
        assert!(regions.is_empty());
    }

    #[test]
    fn removing_columns() {
        let mut regions = MergedRegions::new();
        regions.push(MergedRegion::new(0, 1, 1, 3));
        regions.remove_column(0);
        assert_eq!(regions.as_slice(), &[MergedRegion::new(0, 0, 1, 2)]);
        regions.remove_column(1);
        assert_eq!(regions.as_slice(), &[MergedRegion::new(0, 0, 1, 1)]);
    }
}
