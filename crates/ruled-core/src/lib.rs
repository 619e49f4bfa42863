//! ruled-core: backend-independent geometry and algorithms.
//!
//! This crate holds the pure pipeline stages of ruled: ruling
//! collection and normalization, grid detection, cell and span
//! resolution, table assembly, and bottom-up text composition. It
//! consumes only the primitive feed ([`DrawnRect`], [`GlyphRun`])
//! produced by a page-model collaborator and knows nothing about
//! files, documents, or output formats.

pub mod cells;
pub mod chunk;
pub mod color;
pub mod compose;
pub mod geometry;
pub mod grid;
pub mod partition;
pub mod primitives;
pub mod ruling;
pub mod table;

pub use cells::{CellOptions, resolve_cells};
pub use chunk::{ChunkClassifier, ChunkTag, DefaultClassifier, TextChunk, Word};
pub use color::Color;
pub use compose::{
    ComposeOptions, assign_block_ids, classify_blocks, compose_blocks, compose_chunks,
    compose_lines, reading_order, split_words,
};
pub use geometry::{Point, Rect};
pub use grid::{Grid, GridOptions, detect_grids};
pub use partition::{fill_cell_text, partition_lines};
pub use primitives::{DrawnRect, FontSpec, GlyphRun};
pub use ruling::{
    Orientation, Ruling, RulingCollection, RulingOptions, collect_rulings, join_rulings,
    normalize_rulings,
};
pub use table::{
    Cell, MIN_MARGIN, Row, Table, TableType, complete_rows, continues, format_code,
    remove_empty_rows, split_cells,
};
