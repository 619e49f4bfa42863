//! ruled: reconstruct tables and text blocks from page drawing
//! primitives.
//!
//! This is the public API facade crate. It owns the document and page
//! model, validated configuration, the extraction orchestrator, and
//! the JSON document writer; the geometric algorithms live in
//! [`ruled_core`].
//!
//! # Architecture
//!
//! - **ruled-core**: backend-independent geometry and algorithms
//! - **ruled** (this crate): document model, orchestration, I/O

pub use ruled_core;

pub mod config;
pub mod dump;
pub mod error;
pub mod extract;
pub mod images;
pub mod page;
pub mod writer;

pub use config::{ConfigError, ExtractConfig, FrameRect, frames_from_json};
pub use dump::{DocumentDump, read_document};
pub use error::ExtractError;
pub use extract::{PipelineOptions, extract, extract_document, extract_range, process_page};
pub use images::PageImage;
pub use page::{Document, Page, PageOrientation};
pub use writer::{document_to_value, write_document};
