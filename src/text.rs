//! # Text Measurement and Wrapping
//!
//! Row-height planning and cell drawing both go through [`TextMeasurer`],
//! so the lines a row was sized for are exactly the lines that get drawn.

use crate::font::Font;
use crate::style::TextTransform;

/// Width factor used when a font has no metrics: `chars × size × 0.6`.
pub const FALLBACK_CHAR_WIDTH: f64 = 0.6;

/// Measures and wraps text in one font.
#[derive(Debug, Clone, Copy)]
pub struct TextMeasurer<'f> {
    font: &'f Font,
}

impl<'f> TextMeasurer<'f> {
    pub fn new(font: &'f Font) -> Self {
        Self { font }
    }

    pub fn measure_width(&self, text: &str, font_size: f64) -> f64 {
        self.font
            .width_of_text_at_size(text, font_size)
            .unwrap_or_else(|| text.chars().count() as f64 * font_size * FALLBACK_CHAR_WIDTH)
    }

    /// Greedily wrap `text` into lines no wider than `max_width`.
    ///
    /// Words are separated by single spaces. Each `\n` ends a paragraph and
    /// every paragraph is wrapped on its own, so the returned lines never
    /// contain a newline; an empty paragraph becomes an empty line. A word
    /// that does not fit on a line of its own is split between characters;
    /// a single character is always placed even if it overflows. Always
    /// returns at least one line.
    pub fn wrap(&self, text: &str, max_width: f64, font_size: f64) -> Vec<String> {
        if text.is_empty() {
            return vec![String::new()];
        }

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let before = lines.len();
            self.wrap_paragraph(paragraph, max_width, font_size, &mut lines);
            if lines.len() == before {
                lines.push(String::new());
            }
        }
        lines
    }

    fn wrap_paragraph(&self, paragraph: &str, max_width: f64, size: f64, out: &mut Vec<String>) {
        let fits = |s: &str| self.measure_width(s, size) <= max_width;
        let mut current: Option<String> = None;

        for word in paragraph.split(' ') {
            let candidate = match &current {
                Some(line) => format!("{} {}", line, word),
                None => word.to_string(),
            };
            if fits(&candidate) {
                current = Some(candidate);
                continue;
            }

            if let Some(line) = current.take() {
                out.push(line);
            }
            if fits(word) {
                current = Some(word.to_string());
                continue;
            }

            // The word alone is too wide: break it between characters.
            let mut chunk = String::new();
            for ch in word.chars() {
                let mut next = chunk.clone();
                next.push(ch);
                if chunk.is_empty() || fits(&next) {
                    chunk = next;
                } else {
                    out.push(std::mem::take(&mut chunk));
                    chunk.push(ch);
                }
            }
            current = Some(chunk);
        }

        if let Some(line) = current {
            out.push(line);
        }
    }

    /// Cut `text` until it fits `max_width` with a trailing `...`.
    /// Text that already fits is returned unchanged.
    pub fn truncate_with_ellipsis(&self, text: &str, max_width: f64, font_size: f64) -> String {
        if self.measure_width(text, font_size) <= max_width {
            return text.to_string();
        }
        let mut cut: Vec<char> = text.chars().collect();
        while !cut.is_empty() {
            cut.pop();
            let candidate: String = cut.iter().collect::<String>() + "...";
            if self.measure_width(&candidate, font_size) <= max_width {
                return candidate;
            }
        }
        "...".to_string()
    }
}

/// Apply a text transform to a display string.
pub fn apply_text_transform(text: &str, transform: TextTransform) -> String {
    match transform {
        TextTransform::None => text.to_string(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => {
            let mut result = String::with_capacity(text.len());
            let mut at_word_start = true;
            for ch in text.chars() {
                let is_word_char = ch.is_alphanumeric() || ch == '_';
                if at_word_start && is_word_char {
                    result.extend(ch.to_uppercase());
                } else {
                    result.push(ch);
                }
                at_word_start = !is_word_char;
            }
            result
        }
    }
}
