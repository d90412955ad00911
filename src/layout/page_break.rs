//! # Page Break Decisions
//!
//! Rows are never split: a row either fits above the break threshold on the
//! current page or the table continues on a fresh page.

use crate::surface::PageId;

/// Distance from the top edge of a page at which a table starts.
pub const TOP_MARGIN: f64 = 50.0;

/// Minimum distance from the bottom edge below which nothing is drawn.
pub const DEFAULT_PAGE_BREAK_THRESHOLD: f64 = 50.0;

/// What to do with the next row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// The row fits on the current page.
    Place,
    /// Start a new page before drawing the row.
    NewPage,
}

/// Decide whether a row of `row_height` can be drawn with its top edge at
/// `current_y` without its bottom edge dropping below `threshold`.
pub fn decide_break(current_y: f64, row_height: f64, threshold: f64) -> BreakDecision {
    if current_y - row_height < threshold {
        BreakDecision::NewPage
    } else {
        BreakDecision::Place
    }
}

/// Where the next row goes.
#[derive(Debug, Clone, Copy)]
pub struct PageCursor {
    pub page: PageId,
    /// Top edge of the next row.
    pub y: f64,
    /// Set once the repeated header rows have been drawn on this page.
    pub headers_reprinted: bool,
}

impl PageCursor {
    pub fn new(page: PageId, y: f64) -> Self {
        Self {
            page,
            y,
            headers_reprinted: false,
        }
    }

    /// Cursor at the top of a freshly added page of the given height.
    pub fn top_of(page: PageId, page_height: f64) -> Self {
        Self::new(page, page_height - TOP_MARGIN)
    }

    pub fn advance(&mut self, height: f64) {
        self.y -= height;
    }
}
