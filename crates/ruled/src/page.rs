//! Page and document model.
//!
//! A [`Page`] carries the primitive feed for one page plus the staged
//! results every pipeline stage leaves behind, so intermediate state
//! stays inspectable after extraction. Pages enter the pipeline with
//! the staged fields empty; the orchestrator returns filled copies.

use crate::images::PageImage;
use ruled_core::{DrawnRect, Grid, GlyphRun, Rect, RulingCollection, Table, TextChunk, Word};

/// Page orientation derived from the page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
    /// Square pages fit neither bucket.
    Neither,
}

/// One page: the primitive feed plus staged pipeline results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Page index, 0-based.
    pub index: usize,
    pub width: f64,
    pub height: f64,

    // primitive feed
    pub shapes: Vec<DrawnRect>,
    pub glyphs: Vec<GlyphRun>,
    pub images: Vec<PageImage>,

    // staged results, filled by the orchestrator
    pub rulings: RulingCollection,
    pub chunks: Vec<TextChunk>,
    pub words: Vec<Word>,
    pub lines: Vec<TextChunk>,
    /// Text blocks outside every table, ids assigned in reading order.
    pub blocks: Vec<TextChunk>,
    /// Candidate table areas with their grids.
    pub grids: Vec<Grid>,
    pub tables: Vec<Table>,
}

impl Page {
    pub fn new(index: usize, width: f64, height: f64) -> Self {
        Self {
            index,
            width,
            height,
            ..Self::default()
        }
    }

    /// The page rectangle, anchored at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn orientation(&self) -> PageOrientation {
        if self.width > self.height {
            PageOrientation::Landscape
        } else if self.width < self.height {
            PageOrientation::Portrait
        } else {
            PageOrientation::Neither
        }
    }
}

/// A document: its pages plus the source name used for table coding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub name: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Source name without a trailing extension, used in table codes.
    pub fn base_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(base, _)| base)
            .filter(|base| !base.is_empty())
            .unwrap_or(&self.name)
    }
}
