//! Fill/stroke color carried on drawing primitives.

/// Ink threshold per channel, on the 0..=255 scale. Matches the
/// rendering convention where table borders are drawn in near-black.
const INK_CHANNEL_MAX: f64 = 5.0 / 255.0;

/// Simple RGB color with components in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Black color (0, 0, 0).
    pub fn black() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        }
    }

    /// Whether this color is close enough to black to count as drawn ink.
    ///
    /// Every channel must stay at or below 5/255. Shapes filled in any
    /// other color are decoration, not table borders.
    pub fn is_near_black(&self) -> bool {
        self.r <= INK_CHANNEL_MAX && self.g <= INK_CHANNEL_MAX && self.b <= INK_CHANNEL_MAX
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}
