//! Color input normalization.
//!
//! Callers hand us colors in three shapes: 0–255 integer triples, 0–1
//! fractional triples, or hex strings. Everything downstream works with
//! [`Rgb`], a 0–1 fractional triple.

use serde::{Deserialize, Serialize};

/// A color as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorInput {
    /// Component triple. Each component above 1 is read as 0–255.
    Rgb { r: f64, g: f64, b: f64 },
    /// `#rgb`, `#rrggbb`, or either without the leading `#`.
    Hex(String),
}

impl ColorInput {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        ColorInput::Rgb { r, g, b }
    }

    pub fn hex(hex: &str) -> Self {
        ColorInput::Hex(hex.to_string())
    }

    /// Convert to a canonical 0–1 triple.
    pub fn normalize(&self) -> Rgb {
        match self {
            ColorInput::Rgb { r, g, b } => Rgb {
                r: normalize_component(*r),
                g: normalize_component(*g),
                b: normalize_component(*b),
            },
            ColorInput::Hex(hex) => parse_hex(hex),
        }
    }
}

/// A normalized color, every component in 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

fn normalize_component(v: f64) -> f64 {
    let v = if v > 1.0 { v / 255.0 } else { v };
    v.clamp(0.0, 1.0)
}

fn parse_hex(hex: &str) -> Rgb {
    let hex = hex.trim().trim_start_matches('#');
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    if expanded.len() != 6 || !expanded.is_ascii() {
        return Rgb::BLACK;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16).unwrap_or(0) as f64 / 255.0
    };
    Rgb {
        r: channel(0..2),
        g: channel(2..4),
        b: channel(4..6),
    }
}
