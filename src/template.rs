//! # Table Templates
//!
//! A template is a named, shareable description of a table's look, usually
//! kept as JSON. [`TemplateManager`] registers templates and turns them
//! into [`DesignConfig`]s:
//!
//! - `baseStyle` becomes the design's base properties, with `advanced`
//!   overriding vertical alignment, text transform, text overflow, word
//!   wrap and opacity.
//! - `headerRow`, `firstRow`, `lastRow`, `firstColumn`, `lastColumn`,
//!   `evenRows` and `oddRows` become the matching positional rules.
//!   `footerRow` stands in for `lastRow` when that is absent.
//! - `borders` become the default side borders, `sections` the
//!   thead/tbody/tfoot styles.
//! - `specialCells` selectors map as `coordinates` → a single cell, `row` →
//!   nth row, `column` → nth column, and `pattern` → the last row for
//!   `"total"` and the first row for anything else.

use serde::{Deserialize, Serialize};

use crate::design::{CellSelector, DesignConfig, SectionStyle, SpecialCell};
use crate::error::{Result, TableError};
use crate::style::{
    Alignment, BorderStyle, CellStyle, ColorInput, Padding, TextOverflow, TextTransform,
    VerticalAlignment, WordWrap,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableTemplate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub base_style: CellStyle,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_row: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_row: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_row: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_row: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_column: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_column: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub even_rows: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odd_rows: Option<CellStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub borders: Option<TemplateBorders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<TemplateSections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedOptions>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub special_cells: Vec<TemplateSpecialCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateBorders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_top: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_bottom: Option<BorderStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thead: Option<SectionStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbody: Option<SectionStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfoot: Option<SectionStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_row_height: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<WordWrap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_alignment: Option<VerticalAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_overflow: Option<TextOverflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSelector {
    Coordinates,
    Row,
    Column,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSpecialCell {
    pub selector: TemplateSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Named row pattern such as `"total"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub style: CellStyle,
}

impl TemplateSpecialCell {
    fn to_special_cell(&self) -> SpecialCell {
        let selector = match self.selector {
            TemplateSelector::Coordinates => {
                CellSelector::at(self.row.unwrap_or(0), self.column.unwrap_or(0))
            }
            TemplateSelector::Row => CellSelector::NthRow {
                index: self.row.unwrap_or(0),
            },
            TemplateSelector::Column => CellSelector::NthColumn {
                index: self.column.unwrap_or(0),
            },
            TemplateSelector::Pattern if self.pattern.as_deref() == Some("total") => {
                CellSelector::LastRow
            }
            TemplateSelector::Pattern => CellSelector::FirstRow,
        };
        SpecialCell::new(selector, self.style.clone())
    }
}

impl TableTemplate {
    pub fn to_design_config(&self) -> DesignConfig {
        let mut base = self.base_style.clone();
        if let Some(adv) = &self.advanced {
            base.vertical_alignment = adv.vertical_alignment.or(base.vertical_alignment);
            base.text_transform = adv.text_transform.or(base.text_transform);
            base.text_overflow = adv.text_overflow.or(base.text_overflow);
            base.word_wrap = adv.word_wrap.or(base.word_wrap);
            base.opacity = adv.opacity.or(base.opacity);
            base.alignment = base.alignment.or(adv.horizontal_alignment);
        }

        let borders = self.borders.clone().unwrap_or_default();
        let sections = self.sections.clone().unwrap_or_default();

        DesignConfig {
            base,
            heading_row_style: self.header_row.clone(),
            first_row_style: self.first_row.clone(),
            last_row_style: self.last_row.clone().or_else(|| self.footer_row.clone()),
            first_column_style: self.first_column.clone(),
            last_column_style: self.last_column.clone(),
            even_row_style: self.even_rows.clone(),
            odd_row_style: self.odd_rows.clone(),
            default_top_border: borders.top.or(borders.header_top),
            default_right_border: borders.right,
            default_bottom_border: borders.bottom.or(borders.header_bottom),
            default_left_border: borders.left,
            special_cells: self
                .special_cells
                .iter()
                .map(TemplateSpecialCell::to_special_cell)
                .collect(),
            dynamic_row_height: self.advanced.as_ref().and_then(|a| a.dynamic_row_height),
            thead_style: sections.thead,
            tbody_style: sections.tbody,
            tfoot_style: sections.tfoot,
            ..Default::default()
        }
    }
}

/// Registry of templates by name. Registration order is kept; adding a
/// template under an existing name replaces it in place.
#[derive(Debug, Clone, Default)]
pub struct TemplateManager {
    templates: Vec<TableTemplate>,
}

impl TemplateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager preloaded with the built-in templates.
    pub fn with_builtin() -> Self {
        TemplateManager {
            templates: builtin_templates(),
        }
    }

    pub fn add(&mut self, template: TableTemplate) -> Result<()> {
        if template.name.trim().is_empty() {
            return Err(TableError::InvalidTemplate(
                "a template must have a name".to_string(),
            ));
        }
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
        Ok(())
    }

    pub fn load_from_json(&mut self, json: &str) -> Result<()> {
        let template: TableTemplate = serde_json::from_str(json)?;
        self.add(template)
    }

    pub fn get(&self, name: &str) -> Option<&TableTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn all(&self) -> &[TableTemplate] {
        &self.templates
    }

    /// Design config of a registered template.
    pub fn to_design_config(&self, name: &str) -> Result<DesignConfig> {
        self.get(name)
            .map(TableTemplate::to_design_config)
            .ok_or_else(|| TableError::TemplateNotFound(name.to_string()))
    }
}

fn solid(width: f64, hex: &str) -> BorderStyle {
    BorderStyle::solid(width, ColorInput::hex(hex))
}

/// The templates [`TemplateManager::with_builtin`] starts with.
pub fn builtin_templates() -> Vec<TableTemplate> {
    let bold_header = |bg: &str, fg: &str| CellStyle {
        font_weight: Some(crate::style::FontWeight::BOLD),
        background_color: Some(ColorInput::hex(bg)),
        font_color: Some(ColorInput::hex(fg)),
        ..Default::default()
    };

    vec![
        TableTemplate {
            name: "classic".to_string(),
            description: Some("Grey header, thin rules on every side".to_string()),
            base_style: CellStyle {
                font_size: Some(11.0),
                ..Default::default()
            },
            header_row: Some(bold_header("#e6e6e6", "#000000")),
            borders: Some(TemplateBorders {
                top: Some(solid(0.5, "#999999")),
                right: Some(solid(0.5, "#999999")),
                bottom: Some(solid(0.5, "#999999")),
                left: Some(solid(0.5, "#999999")),
                ..Default::default()
            }),
            ..Default::default()
        },
        TableTemplate {
            name: "striped".to_string(),
            description: Some("Zebra rows under a dark header".to_string()),
            base_style: CellStyle {
                font_size: Some(10.0),
                padding: Some(Padding::Shorthand("4 6".to_string())),
                ..Default::default()
            },
            header_row: Some(bold_header("#2f3e4e", "#ffffff")),
            odd_rows: Some(CellStyle {
                background_color: Some(ColorInput::hex("#f3f5f7")),
                ..Default::default()
            }),
            borders: Some(TemplateBorders {
                bottom: Some(solid(0.5, "#d0d4d9")),
                ..Default::default()
            }),
            ..Default::default()
        },
        TableTemplate {
            name: "financial".to_string(),
            description: Some("Right-aligned figures with a bold total row".to_string()),
            base_style: CellStyle {
                font_size: Some(10.0),
                alignment: Some(Alignment::Right),
                ..Default::default()
            },
            header_row: Some(bold_header("#ffffff", "#000000")),
            first_column: Some(CellStyle {
                alignment: Some(Alignment::Left),
                ..Default::default()
            }),
            borders: Some(TemplateBorders {
                header_bottom: Some(solid(1.0, "#000000")),
                ..Default::default()
            }),
            special_cells: vec![TemplateSpecialCell {
                selector: TemplateSelector::Pattern,
                row: None,
                column: None,
                pattern: Some("total".to_string()),
                style: CellStyle {
                    font_weight: Some(crate::style::FontWeight::BOLD),
                    top_border: Some(solid(1.0, "#000000")),
                    ..Default::default()
                },
            }],
            ..Default::default()
        },
    ]
}
