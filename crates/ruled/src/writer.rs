//! JSON document writer.
//!
//! The output schema is a hard surface consumed by downstream tooling:
//! field names, integer-truncated coordinates, and the reading-order
//! keys are all fixed. Changes here break consumers.

use crate::error::ExtractError;
use crate::page::{Document, Page};
use ruled_core::{Table, TextChunk, Word, reading_order};
use serde_json::{Value, json};
use std::io::Write;

fn trunc(v: f64) -> i64 {
    v as i64
}

fn block_value(block: &TextChunk, page_index: usize, previous_bottom: Option<f64>) -> Value {
    // `end` is the index of the last character, not the length.
    let end = block.text.chars().count().saturating_sub(1);
    let spacing = match previous_bottom {
        Some(bottom) => (block.rect.top - bottom).max(0.0),
        None => block.rect.top.max(0.0),
    };

    let mut annotations = Vec::with_capacity(block.words.len());
    let mut offset = 0usize;
    for word in &block.words {
        let len = word.text.chars().count();
        annotations.push(json!({
            "metadata": word.tag.as_str(),
            "url": &word.url,
            "text": &word.text,
            "is_bold": word.font.bold,
            "is_italic": word.font.italic,
            "is_normal": word.font.is_normal(),
            "font_name": &word.font.name,
            "font_size": trunc(word.font.size),
            "x_top_left": trunc(word.rect.left),
            "y_top_left": trunc(word.rect.top),
            "width": trunc(word.rect.width()),
            "height": trunc(word.rect.height().max(0.0)),
            "start": offset,
            "end": offset + len,
        }));
        offset += len + 1; // the joining space
    }

    json!({
        "order": reading_order(page_index, block.id),
        "x_top_left": trunc(block.rect.left),
        "y_top_left": trunc(block.rect.top),
        "width": trunc(block.rect.width()),
        "height": trunc(block.rect.height().max(0.0)),
        "text": &block.text,
        "start": 0,
        "end": end,
        "metadata": block.tag.as_str(),
        "indent": trunc(block.rect.left),
        "spacing": trunc(spacing),
        "annotations": annotations,
    })
}

/// One row cell: its joined text plus the geometry and text offsets of
/// every page word whose box intersects the cell.
fn cell_value(cell: &ruled_core::Cell, words: &[Word]) -> Value {
    let mut cell_blocks = Vec::new();
    let mut offset = 0usize;
    for word in words {
        if !cell.rect.intersects(&word.rect) {
            continue;
        }
        let len = word.text.chars().count();
        cell_blocks.push(json!({
            "x_top_left": trunc(word.rect.left),
            "y_top_left": trunc(word.rect.top),
            "width": trunc(word.rect.width()),
            "height": trunc(word.rect.height().max(0.0)),
            "start": offset,
            "end": offset + len,
        }));
        offset += len + 1;
    }
    json!({
        "text": &cell.text,
        "cell_blocks": cell_blocks,
    })
}

fn table_value(table: &Table, page_index: usize, words: &[Word]) -> Value {
    let rows: Vec<Vec<Value>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| cell_value(c, words)).collect())
        .collect();
    let cell_properties: Vec<Vec<Value>> = table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|c| {
                    json!({
                        "row_span": c.row_span(),
                        "col_span": c.col_span(),
                        "invisible": c.invisible,
                    })
                })
                .collect()
        })
        .collect();

    json!({
        "x_top_left": trunc(table.rect.left),
        "y_top_left": trunc(table.rect.top),
        "width": trunc(table.rect.width()),
        "height": trunc(table.rect.height().max(0.0)),
        "order": reading_order(page_index, table.order),
        "rows": rows,
        "cell_properties": cell_properties,
    })
}

fn page_value(page: &Page) -> Value {
    let mut blocks = Vec::with_capacity(page.blocks.len());
    let mut previous_bottom = None;
    for block in &page.blocks {
        blocks.push(block_value(block, page.index, previous_bottom));
        previous_bottom = Some(block.rect.bottom);
    }

    let tables: Vec<Value> = page
        .tables
        .iter()
        .map(|t| table_value(t, page.index, &page.words))
        .collect();

    let images: Vec<Value> = page
        .images
        .iter()
        .map(|img| {
            json!({
                "original_name": &img.name,
                "uuid": &img.uuid,
                "x_top_left": trunc(img.rect.left),
                "y_top_left": trunc(img.rect.top),
                "width": trunc(img.rect.width()),
                "height": trunc(img.rect.height().max(0.0)),
                "page_num": img.page_index + 1,
            })
        })
        .collect();

    json!({
        "number": page.index,
        "width": page.width,
        "height": page.height,
        "blocks": blocks,
        "tables": tables,
        "images": images,
    })
}

/// Serialize a staged document to its output JSON value.
pub fn document_to_value(document: &Document) -> Value {
    json!({
        "document": &document.name,
        "pages": document.pages.iter().map(page_value).collect::<Vec<_>>(),
    })
}

/// Write the output document as JSON.
pub fn write_document<W: Write>(
    document: &Document,
    writer: W,
    pretty: bool,
) -> Result<(), ExtractError> {
    let value = document_to_value(document);
    if pretty {
        serde_json::to_writer_pretty(writer, &value)?;
    } else {
        serde_json::to_writer(writer, &value)?;
    }
    Ok(())
}
