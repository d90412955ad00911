//! # Design Configuration
//!
//! The table-wide style defaults and the positional rules the cascade
//! consults. A `DesignConfig` is owned by its table and only changes through
//! [`DesignConfig::apply`], a shallow merge.

use crate::style::{BorderStyle, CellStyle, ColorInput};
use serde::{Deserialize, Serialize};

/// Total grid size, needed by rules that look at the last row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDimensions {
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignConfig {
    /// Base properties every cell starts from.
    #[serde(flatten)]
    pub base: CellStyle,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_row_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_column_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_row_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_row_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_column_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_column_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odd_row_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub even_row_style: Option<CellStyle>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "borderTop")]
    pub default_top_border: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "borderRight")]
    pub default_right_border: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "borderBottom")]
    pub default_bottom_border: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "borderLeft")]
    pub default_left_border: Option<BorderStyle>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub special_cells: Vec<SpecialCell>,

    /// Size rows to their content. Enabled unless explicitly `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_row_height: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thead_style: Option<SectionStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbody_style: Option<SectionStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfoot_style: Option<SectionStyle>,
}

impl DesignConfig {
    /// The stock look: 12pt black Helvetica on white with light grey rules.
    pub fn standard() -> Self {
        DesignConfig {
            base: CellStyle {
                font_family: Some("Helvetica, Arial, sans-serif".to_string()),
                font_size: Some(12.0),
                font_color: Some(ColorInput::rgb(0.0, 0.0, 0.0)),
                background_color: Some(ColorInput::rgb(255.0, 255.0, 255.0)),
                border_color: Some(ColorInput::rgb(200.0, 200.0, 200.0)),
                border_width: Some(1.0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Shallow-merge `other` over `self`.
    ///
    /// Base properties merge field by field. Every nested rule that `other`
    /// sets replaces the current rule as a whole. A non-empty
    /// `special_cells` list replaces the current list.
    pub fn apply(&mut self, other: &DesignConfig) {
        self.base.merge_from(&other.base);

        macro_rules! replace {
            ($($field:ident),+ $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )+
            };
        }
        replace!(
            heading_row_style,
            heading_column_style,
            first_row_style,
            last_row_style,
            first_column_style,
            last_column_style,
            odd_row_style,
            even_row_style,
            default_top_border,
            default_right_border,
            default_bottom_border,
            default_left_border,
            dynamic_row_height,
            thead_style,
            tbody_style,
            tfoot_style,
        );

        if !other.special_cells.is_empty() {
            self.special_cells = other.special_cells.clone();
        }
    }

    pub fn dynamic_row_height(&self) -> bool {
        self.dynamic_row_height != Some(false)
    }
}

// ── Special cells ──────────────────────────────────────────────

/// A style applied to every cell a selector matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialCell {
    #[serde(flatten)]
    pub selector: CellSelector,
    pub style: CellStyle,
}

impl SpecialCell {
    pub fn new(selector: CellSelector, style: CellStyle) -> Self {
        Self { selector, style }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

/// Which cells a [`SpecialCell`] targets.
///
/// Serialized with a `selector` tag, e.g.
/// `{"selector": "nth-row", "index": 2, "style": {..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "selector", rename_all = "kebab-case")]
pub enum CellSelector {
    Coordinates { coordinates: CellRef },
    NthRow { index: usize },
    NthColumn { index: usize },
    FirstRow,
    LastRow,
    FirstColumn,
    LastColumn,
}

impl CellSelector {
    pub fn at(row: usize, col: usize) -> Self {
        CellSelector::Coordinates {
            coordinates: CellRef { row, col },
        }
    }

    pub fn matches(&self, row: usize, col: usize, dims: TableDimensions) -> bool {
        match *self {
            CellSelector::Coordinates { coordinates } => {
                coordinates.row == row && coordinates.col == col
            }
            CellSelector::NthRow { index } => index == row,
            CellSelector::NthColumn { index } => index == col,
            CellSelector::FirstRow => row == 0,
            CellSelector::LastRow => dims.rows > 0 && row == dims.rows - 1,
            CellSelector::FirstColumn => col == 0,
            CellSelector::LastColumn => dims.columns > 0 && col == dims.columns - 1,
        }
    }
}

// ── Sections ───────────────────────────────────────────────────

/// Styling for a table section (head, body or foot).
///
/// The head is row 0, the foot is the last row of a table with more than one
/// row, and the body is everything in between.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_cell_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorInput>,
    /// Top border of the section's first row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<BorderStyle>,
    /// Bottom border of the section's last row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<BorderStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Head,
    Body,
    Foot,
}

impl Section {
    pub fn of_row(row: usize, rows: usize) -> Section {
        if row == 0 {
            Section::Head
        } else if rows > 1 && row == rows - 1 {
            Section::Foot
        } else {
            Section::Body
        }
    }

    /// Inclusive row span of this section in a table of `rows` rows, or
    /// `None` when the section is empty.
    pub fn row_span(self, rows: usize) -> Option<(usize, usize)> {
        match self {
            Section::Head if rows > 0 => Some((0, 0)),
            Section::Foot if rows > 1 => Some((rows - 1, rows - 1)),
            Section::Body if rows > 2 => Some((1, rows - 2)),
            _ => None,
        }
    }
}
