//! Input primitives supplied by the external page-model collaborator.
//!
//! The core never parses page descriptions itself. It consumes three
//! already-materialized feeds per page: the page rectangle, drawn
//! rectangle shapes with their fill color, and positioned glyph runs
//! with font metadata.

use crate::color::Color;
use crate::geometry::{Point, Rect};

/// A filled or stroked rectangle shape, as four vertices in path order.
///
/// Vertices are kept rather than a bounding box because thin-rectangle
/// detection needs the actual side lengths (a rotated rectangle must not
/// pass for an axis-aligned ruling).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawnRect {
    pub vertices: [Point; 4],
    pub color: Color,
}

impl DrawnRect {
    pub fn new(vertices: [Point; 4], color: Color) -> Self {
        Self { vertices, color }
    }

    /// Convenience constructor for an axis-aligned rectangle.
    pub fn axis_aligned(rect: Rect, color: Color) -> Self {
        Self {
            vertices: [
                Point::new(rect.left, rect.top),
                Point::new(rect.right, rect.top),
                Point::new(rect.right, rect.bottom),
                Point::new(rect.left, rect.bottom),
            ],
            color,
        }
    }
}

/// Font descriptor attached to a glyph run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSpec {
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// Neither bold nor italic.
    pub fn is_normal(&self) -> bool {
        !self.bold && !self.italic
    }

    /// Whether two specs describe the same face at the same size.
    pub fn same_face(&self, other: &FontSpec) -> bool {
        self.name == other.name
            && (self.size - other.size).abs() < 0.05
            && self.bold == other.bold
            && self.italic == other.italic
    }
}

/// A positioned glyph run: one or more glyphs sharing a font and baseline.
///
/// `seq` is the content-stream sequence number, used to keep runs in
/// emission order before spatial sorting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphRun {
    pub rect: Rect,
    pub text: String,
    pub font: FontSpec,
    pub seq: usize,
    /// Hyperlink target, when the run sits inside a link annotation.
    pub url: Option<String>,
}

impl GlyphRun {
    pub fn new(rect: Rect, text: impl Into<String>, font: FontSpec, seq: usize) -> Self {
        Self {
            rect,
            text: text.into(),
            font,
            seq,
            url: None,
        }
    }

    /// Average glyph advance for this run.
    pub fn avg_char_width(&self) -> f64 {
        let n = self.text.chars().count();
        if n == 0 {
            return 0.0;
        }
        self.rect.width() / n as f64
    }

    /// True when the run renders nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_vertices() {
        let d = DrawnRect::axis_aligned(Rect::new(1.0, 2.0, 5.0, 4.0), Color::black());
        assert_eq!(d.vertices[0], Point::new(1.0, 2.0));
        assert_eq!(d.vertices[2], Point::new(5.0, 4.0));
    }

    #[test]
    fn test_font_same_face() {
        let a = FontSpec::new("Times", 10.0);
        let b = FontSpec::new("Times", 10.0);
        let mut c = FontSpec::new("Times", 10.0);
        c.bold = true;
        assert!(a.same_face(&b));
        assert!(!a.same_face(&c));
        assert!(!a.same_face(&FontSpec::new("Times", 12.0)));
    }

    #[test]
    fn test_avg_char_width() {
        let run = GlyphRun::new(
            Rect::new(0.0, 0.0, 30.0, 10.0),
            "abc",
            FontSpec::new("Times", 10.0),
            0,
        );
        assert_eq!(run.avg_char_width(), 10.0);
    }

    #[test]
    fn test_blank_run() {
        let font = FontSpec::new("Times", 10.0);
        assert!(GlyphRun::new(Rect::new(0.0, 0.0, 1.0, 1.0), "  ", font.clone(), 0).is_blank());
        assert!(!GlyphRun::new(Rect::new(0.0, 0.0, 1.0, 1.0), "a ", font, 0).is_blank());
    }
}
