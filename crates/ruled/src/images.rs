//! Placed page images, carried through to the writer geometry-only.

use ruled_core::Rect;

/// A raster image placed on a page. Decoding is out of scope; only the
/// placement rectangle and identity survive into the output document.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PageImage {
    pub rect: Rect,
    pub page_index: usize,
    /// Name recorded in the source document, if any.
    pub name: String,
    /// Stable identifier assigned by the collaborator.
    pub uuid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_round_trips_through_serde() {
        let image = PageImage {
            rect: Rect::new(10.0, 20.0, 110.0, 70.0),
            page_index: 2,
            name: "figure-1.png".to_string(),
            uuid: "3f2c".to_string(),
        };
        let json = serde_json::to_string(&image).unwrap();
        let back: PageImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}
