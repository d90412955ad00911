//! # Font Management
//!
//! Fonts come from two places: the 14 standard PDF fonts, which need no
//! embedding, and custom TrueType fonts supplied as base64 payloads. Either
//! way the table engine only ever holds a [`Font`] handle, which is cheap to
//! clone and answers width queries.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::error::{Result, TableError};
use base64::Engine as _;
use std::collections::HashMap;
use std::sync::Arc;

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    /// Maps characters to their glyph IDs in the font.
    pub glyph_ids: HashMap<char, u16>,
}

impl CustomFontMetrics {
    /// Advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                glyph_ids.insert(ch, glyph_id.0);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            glyph_ids,
        })
    }
}

/// The 14 standard PDF fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
            Self::Symbol => "Symbol",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    pub fn metrics(&self) -> Option<StandardFontMetrics> {
        StandardFontMetrics::for_font(*self)
    }

    /// Pick a standard face for a CSS-like family list such as
    /// `"Helvetica, Arial, sans-serif"`. The first recognised family wins;
    /// unknown lists fall back to Helvetica.
    pub fn for_family(family: Option<&str>, bold: bool, italic: bool) -> StandardFont {
        let family = family
            .into_iter()
            .flat_map(|list| list.split(','))
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_ascii_lowercase())
            .find_map(|f| match f.as_str() {
                "helvetica" | "arial" | "sans-serif" => Some(Family::Helvetica),
                "times" | "times new roman" | "times-roman" | "serif" => Some(Family::Times),
                "courier" | "courier new" | "monospace" => Some(Family::Courier),
                _ => None,
            })
            .unwrap_or(Family::Helvetica);

        use StandardFont::*;
        match (family, bold, italic) {
            (Family::Helvetica, false, false) => Helvetica,
            (Family::Helvetica, true, false) => HelveticaBold,
            (Family::Helvetica, false, true) => HelveticaOblique,
            (Family::Helvetica, true, true) => HelveticaBoldOblique,
            (Family::Times, false, false) => TimesRoman,
            (Family::Times, true, false) => TimesBold,
            (Family::Times, false, true) => TimesItalic,
            (Family::Times, true, true) => TimesBoldItalic,
            (Family::Courier, false, false) => Courier,
            (Family::Courier, true, false) => CourierBold,
            (Family::Courier, false, true) => CourierOblique,
            (Family::Courier, true, true) => CourierBoldOblique,
        }
    }
}

#[derive(Clone, Copy)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

// ── Font handle ────────────────────────────────────────────────

#[derive(Debug)]
pub enum FontSource {
    Standard(StandardFont),
    Custom {
        data: Vec<u8>,
        metrics: CustomFontMetrics,
    },
}

#[derive(Debug)]
struct FontInner {
    name: String,
    source: FontSource,
}

/// A font embedded in a document. Clones share the same face.
#[derive(Debug, Clone)]
pub struct Font {
    inner: Arc<FontInner>,
}

impl Font {
    pub fn standard(font: StandardFont) -> Self {
        Font {
            inner: Arc::new(FontInner {
                name: font.pdf_name().to_string(),
                source: FontSource::Standard(font),
            }),
        }
    }

    /// Parse a TrueType payload. Fails if ttf-parser rejects it.
    pub fn custom(name: &str, data: Vec<u8>) -> Result<Self> {
        let metrics = CustomFontMetrics::from_font_data(&data).ok_or_else(|| {
            TableError::InvalidFontData(format!("\"{}\" is not a parsable TrueType font", name))
        })?;
        Ok(Font {
            inner: Arc::new(FontInner {
                name: name.to_string(),
                source: FontSource::Custom { data, metrics },
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn source(&self) -> &FontSource {
        &self.inner.source
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.inner.source, FontSource::Custom { .. })
    }

    /// Width of `text` at `size` points, if this face carries metrics.
    pub fn width_of_text_at_size(&self, text: &str, size: f64) -> Option<f64> {
        match &self.inner.source {
            FontSource::Standard(f) => f.metrics().map(|m| m.measure_string(text, size)),
            FontSource::Custom { metrics, .. } => Some(metrics.measure_string(text, size)),
        }
    }

    /// True if both handles point at the same embedded face.
    pub fn same_face(&self, other: &Font) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// True if both fonts end up as one PDF font resource: standard fonts
    /// by face, custom fonts by handle.
    pub fn same_resource(&self, other: &Font) -> bool {
        match (self.source(), other.source()) {
            (FontSource::Standard(a), FontSource::Standard(b)) => a == b,
            _ => self.same_face(other),
        }
    }
}

// ── Custom font payloads ───────────────────────────────────────

/// A caller-supplied TrueType font, base64 encoded.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CustomFont {
    pub name: String,
    pub base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl CustomFont {
    /// Build a custom font, rejecting payloads that are not valid base64.
    pub fn new(name: &str, base64: &str) -> Result<Self> {
        let font = CustomFont {
            name: name.to_string(),
            base64: base64.to_string(),
            extension: None,
        };
        font.decode()?;
        Ok(font)
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = Some(extension.to_string());
        self
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.base64.trim())
            .map_err(|e| {
                TableError::InvalidFontData(format!(
                    "Invalid Base64 data for font \"{}\": {}",
                    self.name, e
                ))
            })
    }
}
