//! Advance widths of the standard PDF fonts, in 1/1000 em, for the printable
//! ASCII range (U+0020 to U+007E). Values come from the Adobe AFM files.

use super::StandardFont;

/// Width table for one standard font.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    widths: &'static [u16; 95],
    /// Width used for characters outside the table.
    default_width: u16,
}

impl StandardFontMetrics {
    /// Width tables are only carried for the faces tables are drawn with.
    pub fn for_font(font: StandardFont) -> Option<Self> {
        use StandardFont::*;
        match font {
            Helvetica | HelveticaOblique => Some(Self {
                widths: &HELVETICA,
                default_width: 556,
            }),
            HelveticaBold | HelveticaBoldOblique => Some(Self {
                widths: &HELVETICA_BOLD,
                default_width: 556,
            }),
            TimesRoman | TimesItalic => Some(Self {
                widths: &TIMES_ROMAN,
                default_width: 500,
            }),
            Courier | CourierBold | CourierOblique | CourierBoldOblique => Some(Self {
                widths: &COURIER,
                default_width: 600,
            }),
            TimesBold | TimesBoldItalic | Symbol | ZapfDingbats => None,
        }
    }

    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let code = ch as u32;
        let units = if (32..=126).contains(&code) {
            self.widths[(code - 32) as usize]
        } else {
            self.default_width
        };
        units as f64 / 1000.0 * font_size
    }

    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

static COURIER: [u16; 95] = [600; 95];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_space() {
        let m = StandardFontMetrics::for_font(StandardFont::Helvetica).unwrap();
        assert!((m.char_width(' ', 12.0) - 3.336).abs() < 1e-9);
    }

    #[test]
    fn bold_is_wider() {
        let regular = StandardFontMetrics::for_font(StandardFont::Helvetica).unwrap();
        let bold = StandardFontMetrics::for_font(StandardFont::HelveticaBold).unwrap();
        assert!(bold.measure_string("Total", 12.0) > regular.measure_string("Total", 12.0));
    }

    #[test]
    fn courier_is_monospaced() {
        let m = StandardFontMetrics::for_font(StandardFont::Courier).unwrap();
        assert_eq!(m.measure_string("iiii", 10.0), m.measure_string("WWWW", 10.0));
        assert!((m.measure_string("abc", 10.0) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_table_uses_default() {
        let m = StandardFontMetrics::for_font(StandardFont::Helvetica).unwrap();
        assert!((m.char_width('é', 10.0) - 5.56).abs() < 1e-9);
    }
}
