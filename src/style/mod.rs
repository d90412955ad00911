//! # Cell Style Model
//!
//! A sparse, CSS-flavoured set of properties for one table cell. Every field
//! is optional: a `CellStyle` is a *layer*, and the cascade folds layers on
//! top of each other until every property it needs has a value.
//!
//! The same type is used for the table-wide design defaults, the positional
//! rules (heading row, odd rows, special cells, ...) and the per-cell
//! overrides the caller stores with `set_cell_style`.

pub mod color;

pub use color::{ColorInput, Rgb};

use serde::{Deserialize, Serialize};

/// Padding applied when a style does not set one.
pub const DEFAULT_PADDING: f64 = 5.0;

/// A partial cell style. Unset fields inherit from earlier cascade layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    // ── Typography ─────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<ColorInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    /// Only consulted when `word_wrap` is `none`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_overflow: Option<TextOverflow>,

    // ── Box ────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorInput>,
    /// Fill opacity of the background (0.0 - 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_alignment: Option<VerticalAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<WordWrap>,
    /// Accepted and cascaded; cells are always drawn square-cornered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,

    // ── Borders ────────────────────────────────────────────────
    /// Uniform outline color, used only when no side border is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<ColorInput>,
    /// Uniform outline width, used only when no side border is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_border: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_border: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_border: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_border: Option<BorderStyle>,
    /// Extra horizontal rules inside the cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_borders: Option<Vec<AdditionalBorder>>,

    // ── Spans ──────────────────────────────────────────────────
    // Informational only. Spanning is driven by merged regions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_span: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
}

macro_rules! overlay {
    ($dst:expr, $src:expr; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

impl CellStyle {
    /// Overlay every property `other` sets onto `self`. Unset properties of
    /// `other` leave `self` untouched; set ones replace the value wholesale.
    pub fn merge_from(&mut self, other: &CellStyle) {
        overlay!(self, other;
            font_family, font_size, font_weight, font_style, font_color,
            text_transform, text_decoration, text_overflow,
            background_color, opacity, padding, alignment, vertical_alignment,
            word_wrap, border_radius,
            border_color, border_width,
            top_border, right_border, bottom_border, left_border,
            additional_borders,
            column_span, row_span,
        );
    }

    pub fn is_empty(&self) -> bool {
        *self == CellStyle::default()
    }
}

// ── Padding ────────────────────────────────────────────────────

/// Padding as written: a number for all sides, or a CSS shorthand string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Padding {
    Uniform(f64),
    Shorthand(String),
}

impl Padding {
    /// Resolve to concrete edges.
    ///
    /// Shorthand strings take 1 (all), 2 (vertical horizontal) or 4
    /// (top right bottom left) numeric tokens. Anything else falls back to
    /// the default padding on every side.
    pub fn edges(&self) -> Edges {
        match self {
            Padding::Uniform(v) => Edges::uniform(*v),
            Padding::Shorthand(s) => {
                let parts: Option<Vec<f64>> = s
                    .split_whitespace()
                    .map(|t| t.trim_end_matches("px").parse::<f64>().ok())
                    .collect();
                match parts.as_deref() {
                    Some([all]) => Edges::uniform(*all),
                    Some([v, h]) => Edges {
                        top: *v,
                        right: *h,
                        bottom: *v,
                        left: *h,
                    },
                    Some([t, r, b, l]) => Edges {
                        top: *t,
                        right: *r,
                        bottom: *b,
                        left: *l,
                    },
                    _ => Edges::uniform(DEFAULT_PADDING),
                }
            }
        }
    }
}

/// Concrete per-side values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl Default for Edges {
    fn default() -> Self {
        Edges::uniform(DEFAULT_PADDING)
    }
}

// ── Borders ────────────────────────────────────────────────────

/// One side of a cell border.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderStyle {
    /// `Some(false)` suppresses a border that would otherwise be inherited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<LineStyle>,
    /// Alternating on/off lengths for dashed and dotted lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<Vec<f64>>,
    /// Offset into the dash pattern at the start of the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_phase: Option<f64>,
}

impl BorderStyle {
    pub fn solid(width: f64, color: ColorInput) -> Self {
        Self {
            width: Some(width),
            color: Some(color),
            style: Some(LineStyle::Solid),
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            display: Some(false),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// A horizontal rule drawn `y_offset` points below a cell's top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalBorder {
    pub y_offset: f64,
    pub style: BorderStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

// ── Enumerations ───────────────────────────────────────────────

/// `"normal"`, `"bold"`, or a numeric CSS weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Keyword(WeightKeyword),
    Numeric(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightKeyword {
    Normal,
    Bold,
}

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight::Keyword(WeightKeyword::Normal);
    pub const BOLD: FontWeight = FontWeight::Keyword(WeightKeyword::Bold);

    pub fn is_bold(&self) -> bool {
        match self {
            FontWeight::Keyword(WeightKeyword::Bold) => true,
            FontWeight::Keyword(WeightKeyword::Normal) => false,
            FontWeight::Numeric(w) => *w >= 600,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordWrap {
    #[default]
    Normal,
    BreakWord,
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOverflow {
    #[default]
    Clip,
    Ellipsis,
}
