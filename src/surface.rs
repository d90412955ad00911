//! # Document Surface
//!
//! An in-memory document the table engine draws onto. Pages record every
//! drawing call as a [`DrawOp`], so a rendered table can be inspected
//! directly or handed to the PDF serializer.
//!
//! Coordinates follow PDF conventions: the origin is the bottom-left corner
//! of the page and y grows upward.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::font::{Font, StandardFont};
use crate::image::{self, Image};
use crate::style::Rgb;

/// A4 portrait, in points.
pub const A4: PageSize = PageSize {
    width: 595.28,
    height: 841.89,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Index of a page within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct RectOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Fill color. `None` leaves the interior unpainted.
    pub color: Option<Rgb>,
    /// Outline color. `None` draws no outline.
    pub border_color: Option<Rgb>,
    pub border_width: f64,
    /// Fill opacity.
    pub opacity: f64,
}

impl Default for RectOptions {
    fn default() -> Self {
        RectOptions {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            color: None,
            border_color: None,
            border_width: 0.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Left edge of the run.
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub size: f64,
    pub color: Rgb,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineOptions {
    pub start: Point,
    pub end: Point,
    pub thickness: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One recorded drawing call.
#[derive(Debug, Clone)]
pub enum DrawOp {
    Rect(RectOptions),
    Text { text: String, options: TextOptions },
    Line(LineOptions),
    Image { image: Image, placement: ImagePlacement },
}

#[derive(Debug, Clone)]
pub struct Page {
    size: PageSize,
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn new(size: PageSize) -> Self {
        Page {
            size,
            ops: Vec::new(),
        }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn draw_rectangle(&mut self, options: RectOptions) {
        self.ops.push(DrawOp::Rect(options));
    }

    pub fn draw_text(&mut self, text: &str, options: TextOptions) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            options,
        });
    }

    pub fn draw_line(&mut self, options: LineOptions) {
        self.ops.push(DrawOp::Line(options));
    }

    pub fn draw_image(&mut self, image: &Image, placement: ImagePlacement) {
        self.ops.push(DrawOp::Image {
            image: image.clone(),
            placement,
        });
    }

    /// Every text run on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &TextOptions)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, options } => Some((text.as_str(), options)),
            _ => None,
        })
    }
}

/// Document information written to the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.subject.is_none()
    }
}

/// A sequence of pages plus the fonts and images embedded for them.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<Page>,
    fonts: Vec<Font>,
    images: Vec<Image>,
    metadata: Metadata,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an A4 page.
    pub fn add_page(&mut self) -> PageId {
        self.add_page_with_size(A4)
    }

    pub fn add_page_with_size(&mut self, size: PageSize) -> PageId {
        self.pages.push(Page::new(size));
        PageId(self.pages.len() - 1)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.get_mut(id.0)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    /// Embed a TrueType font under `custom_name`.
    pub fn embed_font(&mut self, data: Vec<u8>, custom_name: &str) -> Result<Font> {
        let font = Font::custom(custom_name, data)?;
        Ok(self.register_font(&font))
    }

    /// Embed a standard font, reusing an earlier embedding of the same face.
    pub fn embed_standard_font(&mut self, which: StandardFont) -> Font {
        self.register_font(&Font::standard(which))
    }

    /// Add `font` to the document's font registry, which the PDF writer
    /// emits in order. Returns the registered handle for that resource.
    pub fn register_font(&mut self, font: &Font) -> Font {
        if let Some(existing) = self.fonts.iter().find(|f| f.same_resource(font)) {
            return existing.clone();
        }
        self.fonts.push(font.clone());
        font.clone()
    }

    /// Validate, decode and embed a PNG.
    pub fn embed_png(&mut self, data: &[u8]) -> Result<Image> {
        let image = image::decode_png(data)?;
        self.images.push(image.clone());
        Ok(image)
    }

    /// Serialize to PDF bytes.
    pub fn save(&self) -> Result<Vec<u8>> {
        crate::pdf::PdfWriter::new().write(self)
    }
}
