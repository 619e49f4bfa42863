//! Page-dump input format.
//!
//! The page model is an external collaborator; its output arrives here
//! as a JSON dump of per-page drawing primitives and glyph runs. This
//! module decodes that dump into the [`Document`] model the
//! orchestrator consumes.

use crate::error::ExtractError;
use crate::images::PageImage;
use crate::page::{Document, Page};
use ruled_core::{Color, DrawnRect, FontSpec, GlyphRun, Point, Rect};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct DocumentDump {
    pub document: String,
    pub pages: Vec<PageDump>,
}

#[derive(Debug, Deserialize)]
pub struct PageDump {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rects: Vec<RectDump>,
    #[serde(default)]
    pub glyphs: Vec<GlyphDump>,
    #[serde(default)]
    pub images: Vec<ImageDump>,
}

/// One drawn rectangle. Either four explicit vertices (rotated shapes)
/// or an axis-aligned bounding box.
#[derive(Debug, Deserialize)]
pub struct RectDump {
    #[serde(default)]
    pub vertices: Option<[[f64; 2]; 4]>,
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    /// RGB fill color, each channel in [0, 1].
    pub color: [f64; 3],
}

#[derive(Debug, Deserialize)]
pub struct GlyphDump {
    pub bbox: [f64; 4],
    pub text: String,
    pub font: FontDump,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FontDump {
    pub name: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImageDump {
    pub bbox: [f64; 4],
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
}

fn rect_from_bbox(b: [f64; 4]) -> Rect {
    Rect::new(b[0], b[1], b[2], b[3])
}

impl DocumentDump {
    pub fn from_json(text: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Materialize the dump into the document model. Glyph runs get
    /// their content-stream sequence numbers from dump order.
    pub fn into_document(self) -> Document {
        let pages = self
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, dump)| {
                let mut page = Page::new(index, dump.width, dump.height);

                page.shapes = dump
                    .rects
                    .into_iter()
                    .filter_map(|r| {
                        let color = Color::new(r.color[0], r.color[1], r.color[2]);
                        match (r.vertices, r.bbox) {
                            (Some(vs), _) => Some(DrawnRect::new(
                                vs.map(|[x, y]| Point::new(x, y)),
                                color,
                            )),
                            (None, Some(bbox)) => {
                                Some(DrawnRect::axis_aligned(rect_from_bbox(bbox), color))
                            }
                            (None, None) => None,
                        }
                    })
                    .collect();

                page.glyphs = dump
                    .glyphs
                    .into_iter()
                    .enumerate()
                    .map(|(seq, g)| {
                        let font = FontSpec {
                            name: g.font.name,
                            size: g.font.size,
                            bold: g.font.bold,
                            italic: g.font.italic,
                        };
                        let mut run = GlyphRun::new(rect_from_bbox(g.bbox), g.text, font, seq);
                        run.url = g.url;
                        run
                    })
                    .collect();

                page.images = dump
                    .images
                    .into_iter()
                    .map(|img| PageImage {
                        rect: rect_from_bbox(img.bbox),
                        page_index: index,
                        name: img.name,
                        uuid: img.uuid,
                    })
                    .collect();

                page
            })
            .collect();

        Document {
            name: self.document,
            pages,
        }
    }
}

/// Read and materialize a page dump in one step.
pub fn read_document(path: &Path) -> Result<Document, ExtractError> {
    Ok(DocumentDump::from_path(path)?.into_document())
}
