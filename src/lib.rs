//! # Tabula
//!
//! A table layout and styling engine for PDF.
//!
//! A table is a grid of text cells. Every cell's look comes from a cascade
//! of style layers: the design's base, section styles, row and column rules,
//! special cells, and finally the cell's own style. Rows are sized to fit
//! their wrapped text, and the grid flows down the page, onto new pages as
//! needed, with header rows repeated at the top of each continuation page.
//!
//! ## Architecture
//!
//! ```text
//! Input (API / JSON)
//!       ↓
//!   [table]    : PdfTable holding grid, merged regions, design and font
//!       ↓
//!   [cascade]  : Resolve the effective style of every cell
//!       ↓
//!   [layout]   : Plan row heights, paginate, draw cells
//!       ↓
//!   [surface]  : Pages of recorded draw operations
//!       ↓
//!   [pdf]      : Serialize to PDF bytes
//! ```

pub mod border;
pub mod cascade;
pub mod design;
pub mod error;
pub mod font;
pub mod grid;
pub mod image;
pub mod layout;
pub mod merge;
pub mod merger;
pub mod model;
pub mod pdf;
pub mod style;
pub mod surface;
pub mod table;
pub mod template;
pub mod text;

pub use design::DesignConfig;
pub use error::{Result, TableError};
pub use font::CustomFont;
pub use merge::MergedRegion;
pub use merger::{merge_tables, MergeDirection, MergeOptions};
pub use model::TableDocument;
pub use style::CellStyle;
pub use surface::{Document, ImagePlacement, Metadata};
pub use table::{PdfTable, TableOptions};
pub use template::{TableTemplate, TemplateManager};

/// Render a table document described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>> {
    let document = TableDocument::from_json(json)?;
    let rendered = document.render()?;
    log::debug!("rendered table document onto {} page(s)", rendered.page_count());
    rendered.save()
}
