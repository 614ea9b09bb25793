//! Text measurement seam.
//!
//! The auto-fit algorithm only needs content extents for a candidate font
//! size; where those extents come from is a host concern. Hosts backed by
//! a real rasterizer (browser, skia, a print RIP) implement
//! [`TextMeasurer`] over their own metrics. The shipped
//! [`AdvanceWidthMeasurer`] is a deterministic per-glyph advance model
//! good enough for layout decisions and fully reproducible in tests.

use serde::{Deserialize, Serialize};

/// Measured content extents of a text block, in design pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextExtent {
    /// Widest line, including any unbreakable overflow.
    pub width: f32,
    /// Total height of all wrapped lines.
    pub height: f32,
}

/// What to measure.
#[derive(Debug, Clone, Copy)]
pub struct MeasureRequest<'a> {
    /// The text content. May contain explicit `\n` breaks.
    pub text: &'a str,
    /// Candidate font size in design pixels.
    pub font_size: f32,
    /// Effective font family. Implementations may ignore it if their
    /// metrics are family-agnostic.
    pub font_family: &'a str,
    /// Wrap width in design pixels; `None` lays the text out as single
    /// unwrapped lines.
    pub wrap_width: Option<f32>,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

/// Source of text content extents.
pub trait TextMeasurer {
    /// Measure the rendered extents of a text block.
    fn measure(&self, request: &MeasureRequest<'_>) -> TextExtent;
}

/// Deterministic measurer using per-character advance widths.
///
/// Widths are expressed as fractions of the font size, bucketed by glyph
/// class; non-ASCII text (CJK, emoji) is treated as full-width. Wrapping
/// is greedy on word boundaries, and a single word wider than the wrap
/// width overflows on its own line, matching how a rendered text node
/// behaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvanceWidthMeasurer;

impl AdvanceWidthMeasurer {
    /// Create a measurer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advance of one character as a fraction of the em size.
    fn char_advance(c: char) -> f32 {
        match c {
            ' ' => 0.28,
            'i' | 'j' | 'l' | '.' | ',' | '\'' | '|' | '!' | ':' | ';' => 0.30,
            'f' | 't' | 'r' | '-' | '(' | ')' | '[' | ']' => 0.36,
            'm' | 'w' | 'M' | 'W' | '@' => 0.85,
            c if c.is_ascii_uppercase() => 0.67,
            c if c.is_ascii_digit() => 0.56,
            c if c.is_ascii() => 0.50,
            _ => 1.0,
        }
    }

    fn word_width(word: &str, font_size: f32) -> f32 {
        word.chars().map(Self::char_advance).sum::<f32>() * font_size
    }

    /// Width of each wrapped line of one paragraph.
    fn wrap_paragraph(paragraph: &str, font_size: f32, wrap_width: Option<f32>) -> Vec<f32> {
        let Some(wrap_width) = wrap_width else {
            return vec![Self::word_width(paragraph, font_size)];
        };

        let space = Self::char_advance(' ') * font_size;
        let mut lines = Vec::new();
        let mut current = 0.0_f32;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let width = Self::word_width(word, font_size);
            if current <= 0.0 {
                current = width;
            } else if current + space + width <= wrap_width {
                current += space + width;
            } else {
                lines.push(current);
                current = width;
            }
        }
        if current > 0.0 || lines.is_empty() {
            lines.push(current);
        }
        lines
    }
}

impl TextMeasurer for AdvanceWidthMeasurer {
    fn measure(&self, request: &MeasureRequest<'_>) -> TextExtent {
        if request.text.is_empty() {
            return TextExtent::default();
        }

        let mut widths = Vec::new();
        for paragraph in request.text.split('\n') {
            widths.extend(Self::wrap_paragraph(
                paragraph,
                request.font_size,
                request.wrap_width,
            ));
        }

        let line_count = widths.len();
        let width = widths.iter().copied().fold(0.0_f32, f32::max);
        #[allow(clippy::cast_precision_loss)]
        let height = line_count as f32 * request.line_height * request.font_size;
        TextExtent { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(text: &str, font_size: f32, wrap_width: Option<f32>) -> TextExtent {
        AdvanceWidthMeasurer::new().measure(&MeasureRequest {
            text,
            font_size,
            font_family: "Arial",
            wrap_width,
            line_height: 1.2,
        })
    }

    #[test]
    fn test_empty_text_has_no_extent() {
        let extent = measure("", 40.0, Some(300.0));
        assert_eq!(extent, TextExtent::default());
    }

    #[test]
    fn test_single_line_height() {
        let extent = measure("hello", 40.0, Some(1000.0));
        assert!((extent.height - 48.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wrapping_adds_lines() {
        let narrow = measure("many little words keep on wrapping", 20.0, Some(100.0));
        let wide = measure("many little words keep on wrapping", 20.0, Some(10_000.0));
        assert!(narrow.height > wide.height);
        assert!(narrow.width <= 100.0);
    }

    #[test]
    fn test_explicit_newlines_break_lines() {
        let one = measure("aaa bbb", 20.0, None);
        let two = measure("aaa\nbbb", 20.0, None);
        assert!((two.height - 2.0 * one.height).abs() < 0.001);
        assert!(two.width < one.width);
    }

    #[test]
    fn test_unbreakable_word_overflows() {
        let extent = measure("incomprehensibilities", 40.0, Some(50.0));
        assert!(extent.width > 50.0, "long word must overflow the wrap width");
    }

    #[test]
    fn test_extent_scales_with_font_size() {
        let small = measure("Happy Birthday", 20.0, None);
        let large = measure("Happy Birthday", 40.0, None);
        assert!((large.width - 2.0 * small.width).abs() < 0.001);
        assert!((large.height - 2.0 * small.height).abs() < 0.001);
    }

    #[test]
    fn test_appending_never_shrinks_single_line_width() {
        let mut last = 0.0;
        let text = "Happy Birthday Grandma";
        for end in 1..=text.len() {
            if !text.is_char_boundary(end) {
                continue;
            }
            let extent = measure(&text[..end], 30.0, None);
            assert!(extent.width >= last);
            last = extent.width;
        }
    }

    #[test]
    fn test_non_ascii_treated_full_width() {
        let ascii = measure("ab", 20.0, None);
        let cjk = measure("你好", 20.0, None);
        assert!(cjk.width > ascii.width);
    }
}
