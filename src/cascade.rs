//! # Style Cascade
//!
//! Computes the effective style of one cell. The cascade is an explicit,
//! ordered list of `CellStyle` layers folded left to right with
//! [`CellStyle::merge_from`]: a later layer replaces every property it sets
//! and inherits every property it leaves unset.
//!
//! Layer order, lowest precedence first:
//!
//! ```text
//! base design properties
//!   -> heading row (row 0)        -> heading column (col 0)
//!   -> first row                  -> last row
//!   -> first column               -> last column
//!   -> odd / even row
//!   -> table section (head, body, foot)
//!   -> special cells, in list order
//!   -> the cell's own style
//! then: per-side default borders fill unset sides
//! then: design and per-cell additional borders are concatenated
//! ```
//!
//! Resolution is pure and never cached, so a design applied after cells were
//! styled is reflected at the next render.

use crate::design::{DesignConfig, Section, SectionStyle, TableDimensions};
use crate::style::{
    AdditionalBorder, Alignment, BorderStyle, CellStyle, Edges, FontStyle, FontWeight, Rgb,
    TextDecoration, TextOverflow, TextTransform, VerticalAlignment, WordWrap,
};

pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Fully concrete style of one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCellStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub font_color: Rgb,
    pub text_transform: TextTransform,
    pub text_decoration: TextDecoration,
    pub text_overflow: TextOverflow,
    pub background_color: Option<Rgb>,
    pub opacity: f64,
    pub padding: Edges,
    pub alignment: Alignment,
    pub vertical_alignment: VerticalAlignment,
    pub word_wrap: WordWrap,
    pub border_radius: Option<f64>,
    pub border_color: Option<Rgb>,
    pub border_width: Option<f64>,
    pub borders: SideBorders,
    pub additional_borders: Vec<AdditionalBorder>,
    pub column_span: Option<u32>,
    pub row_span: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideBorders {
    pub top: Option<BorderStyle>,
    pub right: Option<BorderStyle>,
    pub bottom: Option<BorderStyle>,
    pub left: Option<BorderStyle>,
}

impl SideBorders {
    pub fn any(&self) -> bool {
        self.top.is_some() || self.right.is_some() || self.bottom.is_some() || self.left.is_some()
    }
}

impl ResolvedCellStyle {
    /// Fill every property the cascade left unset with its default.
    pub fn from_cascaded(style: CellStyle) -> Self {
        ResolvedCellStyle {
            font_family: style.font_family,
            font_size: style
                .font_size
                .filter(|s| *s > 0.0)
                .unwrap_or(DEFAULT_FONT_SIZE),
            font_weight: style.font_weight.unwrap_or(FontWeight::NORMAL),
            font_style: style.font_style.unwrap_or_default(),
            font_color: style
                .font_color
                .as_ref()
                .map(|c| c.normalize())
                .unwrap_or(Rgb::BLACK),
            text_transform: style.text_transform.unwrap_or_default(),
            text_decoration: style.text_decoration.unwrap_or_default(),
            text_overflow: style.text_overflow.unwrap_or_default(),
            background_color: style.background_color.as_ref().map(|c| c.normalize()),
            opacity: style.opacity.map(|o| o.clamp(0.0, 1.0)).unwrap_or(1.0),
            padding: style
                .padding
                .as_ref()
                .map(|p| p.edges())
                .unwrap_or_default(),
            alignment: style.alignment.unwrap_or_default(),
            vertical_alignment: style.vertical_alignment.unwrap_or_default(),
            word_wrap: style.word_wrap.unwrap_or_default(),
            border_radius: style.border_radius,
            border_color: style.border_color.as_ref().map(|c| c.normalize()),
            border_width: style.border_width,
            borders: SideBorders {
                top: style.top_border,
                right: style.right_border,
                bottom: style.bottom_border,
                left: style.left_border,
            },
            additional_borders: style.additional_borders.unwrap_or_default(),
            column_span: style.column_span,
            row_span: style.row_span,
        }
    }

    /// The uniform outline drawn when no side border is set, as
    /// `(color, width)`.
    pub fn legacy_outline(&self) -> Option<(Rgb, f64)> {
        if self.borders.any() {
            return None;
        }
        match (self.border_color, self.border_width) {
            (Some(color), Some(width)) if width > 0.0 => Some((color, width)),
            _ => None,
        }
    }
}

/// Resolves effective cell styles against one design configuration.
pub struct StyleResolver<'a> {
    design: &'a DesignConfig,
}

impl<'a> StyleResolver<'a> {
    pub fn new(design: &'a DesignConfig) -> Self {
        Self { design }
    }

    pub fn resolve(
        &self,
        row: usize,
        col: usize,
        raw: &CellStyle,
        dims: TableDimensions,
    ) -> ResolvedCellStyle {
        ResolvedCellStyle::from_cascaded(self.cascade(row, col, raw, dims))
    }

    /// The folded style before defaults are filled in.
    pub fn cascade(
        &self,
        row: usize,
        col: usize,
        raw: &CellStyle,
        dims: TableDimensions,
    ) -> CellStyle {
        let d = self.design;
        let mut style = d.base.clone();

        let is_first_row = row == 0;
        let is_first_col = col == 0;
        let is_last_row = dims.rows > 0 && row == dims.rows - 1;
        let is_last_col = dims.columns > 0 && col == dims.columns - 1;

        let positional = [
            (is_first_row, &d.heading_row_style),
            (is_first_col, &d.heading_column_style),
            (is_first_row, &d.first_row_style),
            (is_last_row, &d.last_row_style),
            (is_first_col, &d.first_column_style),
            (is_last_col, &d.last_column_style),
            (row % 2 == 1, &d.odd_row_style),
            (row % 2 == 0, &d.even_row_style),
        ];
        for (applies, layer) in positional {
            if let (true, Some(layer)) = (applies, layer) {
                style.merge_from(layer);
            }
        }

        self.apply_section(&mut style, row, dims.rows);

        for special in &d.special_cells {
            if special.selector.matches(row, col, dims) {
                style.merge_from(&special.style);
            }
        }

        let design_rules = style.additional_borders.take();
        style.merge_from(raw);

        fill_unset(&mut style.top_border, &d.default_top_border);
        fill_unset(&mut style.right_border, &d.default_right_border);
        fill_unset(&mut style.bottom_border, &d.default_bottom_border);
        fill_unset(&mut style.left_border, &d.default_left_border);

        style.additional_borders = match (design_rules, &raw.additional_borders) {
            (None, None) => None,
            (design_rules, cell_rules) => {
                let mut all = design_rules.unwrap_or_default();
                all.extend(cell_rules.iter().flatten().cloned());
                Some(all)
            }
        };

        style
    }

    fn apply_section(&self, style: &mut CellStyle, row: usize, rows: usize) {
        let section = Section::of_row(row, rows);
        let section_style: Option<&SectionStyle> = match section {
            Section::Head => self.design.thead_style.as_ref(),
            Section::Body => self.design.tbody_style.as_ref(),
            Section::Foot => self.design.tfoot_style.as_ref(),
        };
        let Some(s) = section_style else {
            return;
        };

        if let Some(cell) = &s.default_cell_style {
            style.merge_from(cell);
        }
        if let Some(bg) = &s.background_color {
            style.background_color = Some(bg.clone());
        }
        if let Some((first, last)) = section.row_span(rows) {
            if row == first {
                if let Some(top) = &s.border_top {
                    style.top_border = Some(top.clone());
                }
            }
            if row == last {
                if let Some(bottom) = &s.border_bottom {
                    style.bottom_border = Some(bottom.clone());
                }
            }
        }
    }
}

fn fill_unset(side: &mut Option<BorderStyle>, default: &Option<BorderStyle>) {
    if side.is_none() {
        *side = default.clone();
    }
}
