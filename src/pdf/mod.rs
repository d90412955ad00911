//! # PDF Serializer
//!
//! Writes a recorded [`Document`] as a PDF 1.7 file.
//!
//! This is a small from-scratch writer: every page's draw operations become
//! one compressed content stream, and the fonts, images and opacity states
//! those operations reference are written once and shared by all pages.
//! Page coordinates are already in PDF space (origin bottom-left, y up), so
//! operations are written without any transformation.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! ## Font Embedding
//!
//! Standard fonts are simple Type1 references with WinAnsiEncoding. Custom
//! TrueType fonts are embedded whole as CIDFontType2 with Identity-H
//! encoding, producing 5 PDF objects per font: FontFile2, FontDescriptor,
//! CIDFont, ToUnicode CMap, and the root Type0 dictionary.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{Result, TableError};
use crate::font::{Font, FontSource, StandardFont};
use crate::image::Image;
use crate::style::Rgb;
use crate::surface::{Document, DrawOp, Metadata, Page};

#[derive(Debug, Default)]
pub struct PdfWriter;

/// Glyph lookup for a custom font, used to hex-encode its text.
struct CustomFontEmbedData {
    char_to_gid: HashMap<char, u16>,
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Fonts in resource order (/F0, /F1, ...) with their object ids.
    font_objects: Vec<(Font, usize)>,
    /// Keyed by position in `font_objects`.
    custom_font_data: HashMap<usize, CustomFontEmbedData>,
    /// Images in resource order (/Im0, /Im1, ...) with their object ids.
    image_objects: Vec<(Image, usize)>,
    /// Fill opacities in resource order (/GS0, /GS1, ...), in thousandths.
    ext_gstates: Vec<(u32, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(PdfObject { data });
        self.objects.len() - 1
    }

    /// Push a Flate-compressed stream object. `entries` are extra
    /// dictionary entries written ahead of `/Length`.
    fn push_stream(&mut self, entries: &str, payload: &[u8]) -> usize {
        let compressed = compress_to_vec_zlib(payload, 6);
        let mut data: Vec<u8> = Vec::with_capacity(compressed.len() + entries.len() + 64);
        let _ = write!(
            data,
            "<< {}{}/Length {} /Filter /FlateDecode >>\nstream\n",
            entries,
            if entries.is_empty() { "" } else { " " },
            compressed.len()
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }

    fn font_index(&self, font: &Font) -> usize {
        self.font_objects
            .iter()
            .position(|(f, _)| f.same_resource(font))
            .unwrap_or(0)
    }

    fn image_index(&self, image: &Image) -> Option<usize> {
        self.image_objects.iter().position(|(i, _)| i.same_image(image))
    }

    fn gstate_index(&self, opacity: f64) -> Option<usize> {
        let key = opacity_key(opacity)?;
        self.ext_gstates.iter().position(|(k, _)| *k == key)
    }
}

/// Opacity in thousandths, or `None` for fully opaque fills.
fn opacity_key(opacity: f64) -> Option<u32> {
    let key = (opacity.clamp(0.0, 1.0) * 1000.0).round() as u32;
    (key < 1000).then_some(key)
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize `doc` to a PDF byte vector.
    pub fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
            custom_font_data: HashMap::new(),
            image_objects: Vec::new(),
            ext_gstates: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        builder.push(Vec::new());
        builder.push(Vec::new());
        builder.push(Vec::new());

        self.register_fonts(&mut builder, doc)?;
        self.register_images(&mut builder, doc.pages());
        self.register_ext_gstates(&mut builder, doc.pages());

        let resources = self.build_resource_dict(&builder);
        let mut page_obj_ids: Vec<usize> = Vec::new();

        for page in doc.pages() {
            let content = self.build_content_stream_for_page(page, &builder);
            let content_obj_id = builder.push_stream("", content.as_bytes());

            let size = page.size();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                size.width, size.height, content_obj_id, resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = self.write_info(&mut builder, doc.metadata());

        log::debug!(
            "serialized {} page(s), {} font(s), {} image(s)",
            page_obj_ids.len(),
            builder.font_objects.len(),
            builder.image_objects.len()
        );
        Ok(self.serialize(&builder, info_obj_id))
    }

    fn write_info(&self, builder: &mut PdfBuilder, metadata: &Metadata) -> Option<usize> {
        if metadata.is_empty() {
            return None;
        }
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title ({}) ", Self::escape_pdf_string(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author ({}) ", Self::escape_pdf_string(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject ({}) ", Self::escape_pdf_string(subject));
        }
        let _ = write!(info, "/Producer (Tabula 0.1) /Creator (Tabula) >>");
        Some(builder.push(info.into_bytes()))
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream_for_page(&self, page: &Page, builder: &PdfBuilder) -> String {
        let mut stream = String::new();
        for op in page.ops() {
            self.write_op(&mut stream, op, builder);
        }
        stream
    }

    fn write_op(&self, stream: &mut String, op: &DrawOp, builder: &PdfBuilder) {
        match op {
            DrawOp::Rect(rect) => {
                if let Some(fill) = rect.color {
                    let _ = write!(stream, "q\n");
                    if let Some(gs) = builder.gstate_index(rect.opacity) {
                        let _ = write!(stream, "/GS{} gs\n", gs);
                    }
                    let _ = write!(
                        stream,
                        "{} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                        color_operands(fill),
                        rect.x,
                        rect.y,
                        rect.width,
                        rect.height
                    );
                }
                if let Some(stroke) = rect.border_color {
                    if rect.border_width > 0.0 {
                        let _ = write!(
                            stream,
                            "q\n{} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
                            color_operands(stroke),
                            rect.border_width,
                            rect.x,
                            rect.y,
                            rect.width,
                            rect.height
                        );
                    }
                }
            }

            DrawOp::Line(line) => {
                let _ = write!(
                    stream,
                    "q\n{} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    color_operands(line.color),
                    line.thickness,
                    line.start.x,
                    line.start.y,
                    line.end.x,
                    line.end.y
                );
            }

            DrawOp::Text { text, options } => {
                let idx = builder.font_index(&options.font);
                let _ = write!(
                    stream,
                    "BT\n{} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n",
                    color_operands(options.color),
                    idx,
                    options.size,
                    options.x,
                    options.y
                );

                match builder.custom_font_data.get(&idx) {
                    Some(embed) => {
                        let mut hex = String::new();
                        for ch in text.chars() {
                            let gid = embed.char_to_gid.get(&ch).copied().unwrap_or(0);
                            let _ = write!(hex, "{:04X}", gid);
                        }
                        let _ = write!(stream, "<{}> Tj\n", hex);
                    }
                    None => {
                        let _ = write!(stream, "({}) Tj\n", Self::encode_winansi(text));
                    }
                }
                let _ = write!(stream, "ET\n");
            }

            DrawOp::Image { image, placement } => match builder.image_index(image) {
                Some(idx) => {
                    let _ = write!(
                        stream,
                        "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                        placement.width, placement.height, placement.x, placement.y, idx
                    );
                }
                None => {
                    // Grey placeholder if the image was never registered
                    let _ = write!(
                        stream,
                        "q\n0.9 0.9 0.9 rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                        placement.x, placement.y, placement.width, placement.height
                    );
                }
            },
        }
    }

    /// Fonts in the document's registry come first, in embedding order,
    /// followed by any other face a text run was drawn with.
    fn register_fonts(&self, builder: &mut PdfBuilder, doc: &Document) -> Result<()> {
        let mut fonts: Vec<(Font, BTreeSet<char>)> = Vec::new();
        for font in doc.fonts() {
            if !fonts.iter().any(|(f, _)| f.same_resource(font)) {
                fonts.push((font.clone(), BTreeSet::new()));
            }
        }
        for page in doc.pages() {
            for (text, options) in page.texts() {
                let slot = match fonts.iter().position(|(f, _)| f.same_resource(&options.font)) {
                    Some(i) => i,
                    None => {
                        fonts.push((options.font.clone(), BTreeSet::new()));
                        fonts.len() - 1
                    }
                };
                fonts[slot].1.extend(text.chars());
            }
        }

        // Always have at least Helvetica
        if fonts.is_empty() {
            fonts.push((Font::standard(StandardFont::Helvetica), BTreeSet::new()));
        }

        for (font, used_chars) in fonts {
            let obj_id = match font.source() {
                FontSource::Standard(std_font) => {
                    let font_dict = format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        std_font.pdf_name()
                    );
                    builder.push(font_dict.into_bytes())
                }
                FontSource::Custom { data, .. } => {
                    let slot = builder.font_objects.len();
                    let (type0_id, embed) =
                        Self::write_custom_font_objects(builder, font.name(), data, &used_chars)?;
                    builder.custom_font_data.insert(slot, embed);
                    type0_id
                }
            };
            builder.font_objects.push((font, obj_id));
        }
        Ok(())
    }

    fn register_images(&self, builder: &mut PdfBuilder, pages: &[Page]) {
        for page in pages {
            for op in page.ops() {
                if let DrawOp::Image { image, .. } = op {
                    if builder.image_index(image).is_none() {
                        let obj_id = Self::write_image_xobject(builder, image);
                        builder.image_objects.push((image.clone(), obj_id));
                    }
                }
            }
        }
    }

    fn register_ext_gstates(&self, builder: &mut PdfBuilder, pages: &[Page]) {
        let keys: BTreeSet<u32> = pages
            .iter()
            .flat_map(|p| p.ops())
            .filter_map(|op| match op {
                DrawOp::Rect(rect) if rect.color.is_some() => opacity_key(rect.opacity),
                _ => None,
            })
            .collect();
        for key in keys {
            let alpha = key as f64 / 1000.0;
            let obj_id = builder.push(
                format!("<< /Type /ExtGState /ca {:.3} /CA {:.3} >>", alpha, alpha).into_bytes(),
            );
            builder.ext_gstates.push((key, obj_id));
        }
    }

    /// Image XObject in DeviceRGB, with a DeviceGray soft mask when the
    /// image has transparency.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &Image) -> usize {
        let pixels = image.pixels();
        let size = format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /BitsPerComponent 8",
            pixels.width_px, pixels.height_px
        );

        let smask = pixels.alpha.as_ref().map(|alpha| {
            let id = builder.push_stream(&format!("{} /ColorSpace /DeviceGray", size), alpha);
            format!(" /SMask {} 0 R", id)
        });

        builder.push_stream(
            &format!("{} /ColorSpace /DeviceRGB{}", size, smask.unwrap_or_default()),
            &pixels.rgb,
        )
    }

    /// Embed a TrueType face whole as a CIDFontType2 behind an Identity-H
    /// Type0 font. Returns the Type0 object id and the glyph lookup for the
    /// characters the document uses.
    fn write_custom_font_objects(
        builder: &mut PdfBuilder,
        name: &str,
        ttf_data: &[u8],
        used_chars: &BTreeSet<char>,
    ) -> Result<(usize, CustomFontEmbedData)> {
        let face = ttf_parser::Face::parse(ttf_data, 0).map_err(|e| {
            TableError::InvalidFontData(format!("cannot embed font \"{}\": {}", name, e))
        })?;

        let to_pdf_units = |v: f64| (v * 1000.0 / face.units_per_em() as f64) as i32;
        let char_to_gid: HashMap<char, u16> = used_chars
            .iter()
            .filter_map(|&ch| face.glyph_index(ch).map(|gid| (ch, gid.0)))
            .collect();
        let base_font = Self::sanitize_font_name(name);

        let font_file = builder.push_stream(&format!("/Length1 {}", ttf_data.len()), ttf_data);

        let bbox = face.global_bounding_box();
        let ascent = to_pdf_units(face.ascender() as f64);
        let descriptor = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 /FontBBox [{} {} {} {}] \
             /ItalicAngle 0 /Ascent {} /Descent {} /CapHeight {} /StemV 80 \
             /FontFile2 {} 0 R >>",
            base_font,
            to_pdf_units(bbox.x_min as f64),
            to_pdf_units(bbox.y_min as f64),
            to_pdf_units(bbox.x_max as f64),
            to_pdf_units(bbox.y_max as f64),
            ascent,
            to_pdf_units(face.descender() as f64),
            face.capital_height()
                .map(|h| to_pdf_units(h as f64))
                .unwrap_or(ascent),
            font_file,
        );
        let descriptor_id = builder.push(descriptor.into_bytes());

        let default_width = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .map(|adv| to_pdf_units(adv as f64))
            .unwrap_or(1000);
        let cid_font = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW {} /W {} /CIDToGIDMap /Identity >>",
            base_font,
            descriptor_id,
            default_width,
            Self::build_w_array(&char_to_gid, &face),
        );
        let cid_font_id = builder.push(cid_font.into_bytes());

        let cmap = Self::build_tounicode_cmap(&char_to_gid, &base_font);
        let to_unicode = builder.push_stream("", cmap.as_bytes());

        let type0 = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] /ToUnicode {} 0 R >>",
            base_font, cid_font_id, to_unicode,
        );
        let type0_id = builder.push(type0.into_bytes());

        Ok((type0_id, CustomFontEmbedData { char_to_gid }))
    }

    /// `/W` entries for every used glyph: `[gid [width] ...]`.
    fn build_w_array(char_to_gid: &HashMap<char, u16>, face: &ttf_parser::Face) -> String {
        let scale = 1000.0 / face.units_per_em() as f64;
        let gids: BTreeSet<u16> = char_to_gid.values().copied().collect();
        let entries: Vec<String> = gids
            .into_iter()
            .map(|gid| {
                let advance = face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0);
                format!("{} [{}]", gid, (advance as f64 * scale) as u32)
            })
            .collect();
        format!("[{}]", entries.join(" "))
    }

    /// ToUnicode CMap mapping glyph ids back to characters, so text can be
    /// extracted from the PDF.
    fn build_tounicode_cmap(char_to_gid: &HashMap<char, u16>, font_name: &str) -> String {
        let mut pairs: Vec<(u16, u32)> = char_to_gid
            .iter()
            .map(|(&ch, &gid)| (gid, ch as u32))
            .collect();
        pairs.sort_unstable();

        let mut cmap = format!(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /{}-UTF16 def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
            font_name
        );
        // At most 100 entries per bfchar block
        for block in pairs.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", block.len());
            for &(gid, code) in block {
                let _ = writeln!(cmap, "<{:04X}> <{:04X}>", gid, code);
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap
    }

    /// PDF names allow alphanumerics, `-` and `_` here.
    fn sanitize_font_name(name: &str) -> String {
        let name: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if name.is_empty() {
            "CustomFont".to_string()
        } else {
            name
        }
    }

    fn build_resource_dict(&self, builder: &PdfBuilder) -> String {
        let fonts = builder
            .font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ");
        let mut resources = format!("/Font << {} >>", fonts);

        if !builder.image_objects.is_empty() {
            let images = builder
                .image_objects
                .iter()
                .enumerate()
                .map(|(i, (_, obj_id))| format!("/Im{} {} 0 R", i, obj_id))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(resources, " /XObject << {} >>", images);
        }
        if !builder.ext_gstates.is_empty() {
            let states = builder
                .ext_gstates
                .iter()
                .enumerate()
                .map(|(i, (_, obj_id))| format!("/GS{} {} 0 R", i, obj_id))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(resources, " /ExtGState << {} >>", states);
        }
        resources
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Encode text for a WinAnsi string literal. Unmappable characters
    /// become `?`.
    fn encode_winansi(text: &str) -> String {
        let mut text_str = String::new();
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => text_str.push_str("\\\\"),
                b'(' => text_str.push_str("\\("),
                b')' => text_str.push_str("\\)"),
                0x20..=0x7E => text_str.push(b as char),
                _ => {
                    let _ = write!(text_str, "\\{:03o}", b);
                }
            }
        }
        text_str
    }

    /// Map a character to its WinAnsiEncoding (Windows-1252) byte.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        WINANSI_HIGH
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|&(_, byte)| byte)
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", builder.objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

/// The 0x80..=0x9F block of Windows-1252, which does not follow Latin-1.
const WINANSI_HIGH: [(char, u8); 23] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('•', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('™', 0x99),
    ('š', 0x9A),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

fn color_operands(c: Rgb) -> String {
    format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ImagePlacement, LineOptions, Point, RectOptions, TextOptions};

    fn contains(bytes: &[u8], needle: &str) -> bool {
        bytes.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    fn inflate_first_stream(bytes: &[u8]) -> String {
        let start = bytes
            .windows(7)
            .position(|w| w == b"stream\n")
            .map(|p| p + 7)
            .unwrap();
        let end = start
            + bytes[start..]
                .windows(10)
                .position(|w| w == b"\nendstream")
                .unwrap();
        let raw = miniz_oxide::inflate::decompress_to_vec_zlib(&bytes[start..end]).unwrap();
        String::from_utf8(raw).unwrap()
    }

    fn text_options(font: Font) -> TextOptions {
        TextOptions {
            x: 55.0,
            y: 700.0,
            size: 12.0,
            color: Rgb::BLACK,
            font,
        }
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(PdfWriter::escape_pdf_string("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::escape_pdf_string("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_winansi_encoding() {
        assert_eq!(PdfWriter::encode_winansi("a(b)"), "a\\(b\\)");
        assert_eq!(PdfWriter::encode_winansi("€"), "\\200");
        assert_eq!(PdfWriter::encode_winansi("漢"), "?");
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let mut doc = Document::new();
        doc.add_page();
        let bytes = PdfWriter::new().write(&doc).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, "%%EOF"));
        assert!(contains(&bytes, "xref"));
        assert!(contains(&bytes, "trailer"));
        assert!(contains(&bytes, "/Count 1"));
        assert!(contains(&bytes, "/BaseFont /Helvetica"));
    }

    #[test]
    fn test_metadata_in_pdf() {
        let mut doc = Document::new();
        doc.add_page();
        doc.set_metadata(Metadata {
            title: Some("Quarterly (draft)".to_string()),
            author: Some("Finance".to_string()),
            subject: None,
        });
        let bytes = PdfWriter::new().write(&doc).unwrap();
        assert!(contains(&bytes, "/Title (Quarterly \\(draft\\))"));
        assert!(contains(&bytes, "/Author (Finance)"));
        assert!(contains(&bytes, "/Info "));
    }

    #[test]
    fn test_ops_are_written_in_pdf_space() {
        let mut doc = Document::new();
        let id = doc.add_page();
        let font = doc.embed_standard_font(StandardFont::Helvetica);
        let page = doc.page_mut(id).unwrap();
        page.draw_rectangle(RectOptions {
            x: 50.0,
            y: 680.0,
            width: 80.0,
            height: 20.0,
            color: Some(Rgb::WHITE),
            border_color: Some(Rgb::BLACK),
            border_width: 1.0,
            opacity: 1.0,
        });
        page.draw_line(LineOptions {
            start: Point::new(50.0, 680.0),
            end: Point::new(130.0, 680.0),
            thickness: 0.5,
            color: Rgb::BLACK,
        });
        page.draw_text("Total", text_options(font));

        let bytes = PdfWriter::new().write(&doc).unwrap();
        let stream = inflate_first_stream(&bytes);
        assert!(stream.contains("50.00 680.00 80.00 20.00 re\nf"));
        assert!(stream.contains("1.00 w\n50.00 680.00 80.00 20.00 re\nS"));
        assert!(stream.contains("50.00 680.00 m\n130.00 680.00 l\nS"));
        assert!(stream.contains("/F0 12.0 Tf\n55.00 700.00 Td\n(Total) Tj"));
    }

    #[test]
    fn test_faces_registered_once_each() {
        let mut doc = Document::new();
        let id = doc.add_page();
        let page = doc.page_mut(id).unwrap();
        page.draw_text("a", text_options(Font::standard(StandardFont::Helvetica)));
        page.draw_text("b", text_options(Font::standard(StandardFont::Helvetica)));
        page.draw_text("c", text_options(Font::standard(StandardFont::HelveticaBold)));

        let bytes = PdfWriter::new().write(&doc).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/BaseFont /Helvetica ").count(), 1);
        assert_eq!(text.matches("/BaseFont /Helvetica-Bold ").count(), 1);
        let stream = inflate_first_stream(&bytes);
        assert!(stream.contains("/F1 12.0 Tf"));
    }

    #[test]
    fn test_registered_fonts_are_written_in_order() {
        let mut doc = Document::new();
        doc.embed_standard_font(StandardFont::Courier);
        let id = doc.add_page();
        doc.page_mut(id)
            .unwrap()
            .draw_text("x", text_options(Font::standard(StandardFont::TimesRoman)));

        let bytes = PdfWriter::new().write(&doc).unwrap();
        assert!(contains(&bytes, "/BaseFont /Courier "));
        assert!(!contains(&bytes, "/BaseFont /Helvetica "));
        // Times follows the registered Courier
        assert!(inflate_first_stream(&bytes).contains("/F1 12.0 Tf"));
    }

    #[test]
    fn test_translucent_fill_uses_ext_gstate() {
        let mut doc = Document::new();
        let id = doc.add_page();
        doc.page_mut(id).unwrap().draw_rectangle(RectOptions {
            width: 10.0,
            height: 10.0,
            color: Some(Rgb::BLACK),
            opacity: 0.5,
            ..Default::default()
        });
        let bytes = PdfWriter::new().write(&doc).unwrap();
        assert!(contains(&bytes, "/ExtGState << /GS0"));
        assert!(contains(&bytes, "/ca 0.500"));
        assert!(inflate_first_stream(&bytes).contains("/GS0 gs"));
    }

    #[test]
    fn test_image_with_alpha_gets_smask() {
        let mut doc = Document::new();
        let png = crate::image::encode_test_png([10, 20, 30, 128], 2, 2);
        let image = doc.embed_png(&png).unwrap();
        let id = doc.add_page();
        let placement = ImagePlacement {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        let page = doc.page_mut(id).unwrap();
        page.draw_image(&image, placement);
        page.draw_image(&image, placement);

        let bytes = PdfWriter::new().write(&doc).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/Subtype /Image").count(), 2);
        assert!(text.contains("/SMask "));
        assert!(text.contains("/XObject << /Im0"));
    }
}
