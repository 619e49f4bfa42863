//! Validated extraction configuration.
//!
//! Configuration is built once, validated eagerly, and passed by
//! reference into the orchestrator. There is no mutable global state:
//! a bad frame map or page range fails at construction, never mid-run.

use ruled_core::Rect;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// A configuration the orchestrator would misbehave on.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("frame for page {page}: {reason}")]
    Frame { page: usize, reason: String },

    #[error("inverted page range {start}..{end}")]
    InvertedRange { start: usize, end: usize },

    #[error("malformed frame map: {0}")]
    Parse(String),
}

/// A content frame in normalized page fractions, all in [0, 1].
///
/// Content outside the frame (running headers, margin stamps, the
/// drawing frame itself) is excluded from extraction on that page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    /// Scale the frame to a concrete page size.
    pub fn to_rect(&self, page_width: f64, page_height: f64) -> Rect {
        Rect::new(
            self.left * page_width,
            self.top * page_height,
            (self.left + self.width) * page_width,
            (self.top + self.height) * page_height,
        )
    }

    fn validate(&self, page: usize) -> Result<(), ConfigError> {
        let fields = [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
        ];
        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Frame {
                    page,
                    reason: format!("{name} = {value} outside [0, 1]"),
                });
            }
        }
        if self.left + self.width > 1.0 + 1e-9 || self.top + self.height > 1.0 + 1e-9 {
            return Err(ConfigError::Frame {
                page,
                reason: "frame extends past the page".to_string(),
            });
        }
        Ok(())
    }
}

/// Raw frame entry as produced by the frame detector: pixel coordinates
/// plus the dimensions of the image they were measured on.
#[derive(Debug, Deserialize)]
struct RawFrame {
    x_top_left: f64,
    y_top_left: f64,
    width: f64,
    height: f64,
    original_image_width: f64,
    original_image_height: f64,
}

/// Parse a frame map from its interchange JSON: page index keys mapped
/// to pixel frames, normalized here by the original image dimensions.
pub fn frames_from_json(text: &str) -> Result<BTreeMap<usize, FrameRect>, ConfigError> {
    let raw: BTreeMap<String, RawFrame> =
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let mut frames = BTreeMap::new();
    for (key, entry) in raw {
        let page: usize = key
            .parse()
            .map_err(|_| ConfigError::Parse(format!("page key {key:?} is not an index")))?;
        if entry.original_image_width <= 0.0 || entry.original_image_height <= 0.0 {
            return Err(ConfigError::Frame {
                page,
                reason: "zero original image dimensions".to_string(),
            });
        }
        frames.insert(
            page,
            FrameRect {
                left: entry.x_top_left / entry.original_image_width,
                top: entry.y_top_left / entry.original_image_height,
                width: entry.width / entry.original_image_width,
                height: entry.height / entry.original_image_height,
            },
        );
    }
    Ok(frames)
}

/// Validated extraction settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractConfig {
    frames: BTreeMap<usize, FrameRect>,
    page_range: Option<(usize, usize)>,
}

impl ExtractConfig {
    /// Build a configuration, rejecting out-of-range frames and an
    /// inverted page range.
    pub fn new(
        frames: BTreeMap<usize, FrameRect>,
        page_range: Option<(usize, usize)>,
    ) -> Result<Self, ConfigError> {
        for (&page, frame) in &frames {
            frame.validate(page)?;
        }
        if let Some((start, end)) = page_range {
            if start > end {
                return Err(ConfigError::InvertedRange { start, end });
            }
        }
        Ok(Self { frames, page_range })
    }

    pub fn frame(&self, page_index: usize) -> Option<&FrameRect> {
        self.frames.get(&page_index)
    }

    /// Inclusive 0-based page range, when restricted.
    pub fn page_range(&self) -> Option<(usize, usize)> {
        self.page_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(left: f64, top: f64, width: f64, height: f64) -> FrameRect {
        FrameRect {
            left,
            top,
            width,
            height,
        }
    }

    #[test]
    fn test_valid_config() {
        let mut frames = BTreeMap::new();
        frames.insert(0, frame(0.05, 0.05, 0.9, 0.9));
        let config = ExtractConfig::new(frames, Some((0, 3))).unwrap();
        assert!(config.frame(0).is_some());
        assert!(config.frame(1).is_none());
        assert_eq!(config.page_range(), Some((0, 3)));
    }

    #[test]
    fn test_out_of_range_frame_rejected() {
        let mut frames = BTreeMap::new();
        frames.insert(2, frame(-0.1, 0.0, 0.5, 0.5));
        let err = ExtractConfig::new(frames, None).unwrap_err();
        assert!(matches!(err, ConfigError::Frame { page: 2, .. }));
    }

    #[test]
    fn test_overflowing_frame_rejected() {
        let mut frames = BTreeMap::new();
        frames.insert(0, frame(0.5, 0.0, 0.6, 0.5));
        assert!(ExtractConfig::new(frames, None).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = ExtractConfig::new(BTreeMap::new(), Some((5, 2))).unwrap_err();
        assert_eq!(err, ConfigError::InvertedRange { start: 5, end: 2 });
    }

    #[test]
    fn test_frame_scales_to_page() {
        let f = frame(0.1, 0.2, 0.5, 0.5);
        assert_eq!(f.to_rect(1000.0, 500.0), Rect::new(100.0, 100.0, 600.0, 350.0));
    }

    #[test]
    fn test_frames_from_json_normalizes() {
        let text = r#"{
            "0": {
                "x_top_left": 100.0, "y_top_left": 200.0,
                "width": 800.0, "height": 1000.0,
                "original_image_width": 1000.0, "original_image_height": 2000.0
            }
        }"#;
        let frames = frames_from_json(text).unwrap();
        let f = frames[&0];
        assert_eq!(f.left, 0.1);
        assert_eq!(f.top, 0.1);
        assert_eq!(f.width, 0.8);
        assert_eq!(f.height, 0.5);
    }

    #[test]
    fn test_frames_from_json_rejects_zero_dimensions() {
        let text = r#"{
            "1": {
                "x_top_left": 0.0, "y_top_left": 0.0,
                "width": 10.0, "height": 10.0,
                "original_image_width": 0.0, "original_image_height": 100.0
            }
        }"#;
        let err = frames_from_json(text).unwrap_err();
        assert!(matches!(err, ConfigError::Frame { page: 1, .. }));
    }

    #[test]
    fn test_frames_from_json_rejects_bad_key() {
        let err = frames_from_json(r#"{"abc": {"x_top_left":0,"y_top_left":0,"width":1,"height":1,"original_image_width":1,"original_image_height":1}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
