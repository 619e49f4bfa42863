//! Extraction orchestrator.
//!
//! Runs the per-page pipeline (rulings, grids, cells, tables, text
//! composition, partitioning), then the document-level passes that
//! need page adjacency: continuation detection and table coding.

use crate::config::ExtractConfig;
use crate::page::{Document, Page};
use ruled_core::{
    CellOptions, ComposeOptions, DefaultClassifier, GridOptions, Rect, RulingOptions, Table,
    assign_block_ids, classify_blocks, collect_rulings, complete_rows, compose_blocks,
    compose_chunks, compose_lines, continues, detect_grids, fill_cell_text, format_code,
    partition_lines, remove_empty_rows, resolve_cells, split_cells, split_words,
};

/// Section number used in table codes. Section splitting belongs to a
/// downstream consumer; extraction always codes section 1.
const SECTION: usize = 1;

/// Tolerances for every pipeline stage, in one place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    pub ruling: RulingOptions,
    pub grid: GridOptions,
    pub cell: CellOptions,
    pub compose: ComposeOptions,
}

fn center_inside(frame: &Rect, rect: &Rect) -> bool {
    frame.contains_point(&ruled_core::Point::new(
        (rect.left + rect.right) / 2.0,
        (rect.top + rect.bottom) / 2.0,
    ))
}

fn shape_bbox(shape: &ruled_core::DrawnRect) -> Rect {
    let xs = shape.vertices.map(|p| p.x);
    let ys = shape.vertices.map(|p| p.y);
    Rect::new(
        xs.iter().copied().fold(f64::INFINITY, f64::min),
        ys.iter().copied().fold(f64::INFINITY, f64::min),
        xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    )
}

/// Run the per-page pipeline, returning the page with every staged
/// field filled. Pure: the input page is not modified.
pub fn process_page(page: &Page, config: &ExtractConfig, opts: &PipelineOptions) -> Page {
    let span = tracing::debug_span!("page", index = page.index);
    let _enter = span.enter();

    let mut staged = page.clone();

    // Content outside the configured frame never enters the pipeline.
    if let Some(frame) = config.frame(page.index) {
        let frame = frame.to_rect(page.width, page.height);
        staged.shapes.retain(|s| center_inside(&frame, &shape_bbox(s)));
        staged.glyphs.retain(|g| center_inside(&frame, &g.rect));
        staged.images.retain(|i| center_inside(&frame, &i.rect));
    }

    staged.rulings = collect_rulings(&staged.shapes, &opts.ruling);
    let dropped = staged.shapes.len() - staged.rulings.raw.len();
    if dropped > 0 {
        tracing::debug!(dropped, "shapes rejected by the ruling collector");
    }

    staged.grids = detect_grids(
        &staged.rulings.joined_horizontals(),
        &staged.rulings.joined_verticals(),
        &opts.grid,
    );

    let mut tables: Vec<Table> = staged
        .grids
        .iter()
        .filter_map(|grid| {
            let cells = resolve_cells(grid, &opts.cell);
            if cells.is_empty() {
                return None;
            }
            Some(Table::from_cells(grid.area, cells, page.index))
        })
        .collect();

    staged.chunks = compose_chunks(&staged.glyphs, &opts.compose);
    staged.words = split_words(&staged.chunks, &opts.compose);
    staged.lines = compose_lines(&staged.words, &opts.compose);

    let (outside, inside) = partition_lines(&staged.lines, &tables);
    tables = tables
        .into_iter()
        .map(|t| {
            let t = fill_cell_text(t, &inside);
            complete_rows(remove_empty_rows(split_cells(t)))
        })
        .collect();

    tables.sort_by(|a, b| {
        a.rect
            .top
            .partial_cmp(&b.rect.top)
            .unwrap()
            .then_with(|| a.rect.left.partial_cmp(&b.rect.left).unwrap())
    });
    for (i, table) in tables.iter_mut().enumerate() {
        table.order = i + 1;
    }
    staged.tables = tables;

    staged.blocks = assign_block_ids(classify_blocks(
        compose_blocks(&outside, &opts.compose),
        &DefaultClassifier,
    ));

    tracing::debug!(
        tables = staged.tables.len(),
        blocks = staged.blocks.len(),
        "page staged"
    );
    staged
}

fn effective_range(
    config: &ExtractConfig,
    override_range: Option<(usize, usize)>,
    page_count: usize,
) -> Option<(usize, usize)> {
    let (start, end) = override_range.or(config.page_range())?;
    if start >= page_count {
        return Some((1, 0)); // empty, normalized below
    }
    Some((start, end.min(page_count.saturating_sub(1))))
}

fn run(document: &Document, config: &ExtractConfig, range: Option<(usize, usize)>) -> Document {
    let selected: Vec<&Page> = match effective_range(config, range, document.pages.len()) {
        None => document.pages.iter().collect(),
        Some((start, end)) if start > end => Vec::new(),
        Some((start, end)) => document.pages[start..=end].iter().collect(),
    };

    let opts = PipelineOptions::default();

    #[cfg(feature = "parallel")]
    let mut pages: Vec<Page> = {
        use rayon::prelude::*;
        selected
            .par_iter()
            .map(|p| process_page(p, config, &opts))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let mut pages: Vec<Page> = selected
        .iter()
        .map(|p| process_page(p, config, &opts))
        .collect();

    // Continuation needs adjacent pages in document order.
    for i in 1..pages.len() {
        if pages[i].index != pages[i - 1].index + 1 {
            continue;
        }
        let prev_rect = pages[i - 1].rect();
        let next_rect = pages[i].rect();
        let Some(prev_last) = pages[i - 1].tables.last().cloned() else {
            continue;
        };
        if let Some(next_first) = pages[i].tables.first_mut() {
            if continues(&prev_last, &prev_rect, next_first, &next_rect) {
                next_first.continued = true;
            }
        }
    }

    let base = document.base_name().to_string();
    for page in &mut pages {
        for table in &mut page.tables {
            table.code = format_code(&base, SECTION, page.index, table.order, table.table_type);
        }
    }

    Document {
        name: document.name.clone(),
        pages,
    }
}

/// Extract the full document, returning it with staged pages. Pages
/// outside the configured page range are omitted from the result.
pub fn extract_document(document: &Document, config: &ExtractConfig) -> Document {
    run(document, config, None)
}

/// Extract and return all tables of the document in reading order.
pub fn extract(document: &Document, config: &ExtractConfig) -> Vec<Table> {
    extract_document(document, config)
        .pages
        .into_iter()
        .flat_map(|p| p.tables)
        .collect()
}

/// Extract tables from the inclusive 0-based page range `[start, end]`.
/// The range is clamped to the document; a start beyond the last page
/// yields no tables rather than an error.
pub fn extract_range(
    document: &Document,
    config: &ExtractConfig,
    start: usize,
    end: usize,
) -> Vec<Table> {
    run(document, config, Some((start, end)))
        .pages
        .into_iter()
        .flat_map(|p| p.tables)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameRect;
    use ruled_core::{Color, DrawnRect, FontSpec, GlyphRun, TableType};
    use std::collections::BTreeMap;

    fn thin_h(y: f64, x0: f64, x1: f64) -> DrawnRect {
        DrawnRect::axis_aligned(Rect::new(x0, y, x1, y + 1.0), Color::black())
    }

    fn thin_v(x: f64, y0: f64, y1: f64) -> DrawnRect {
        DrawnRect::axis_aligned(Rect::new(x, y0, x + 1.0, y1), Color::black())
    }

    fn glyph(text: &str, left: f64, top: f64, seq: usize) -> GlyphRun {
        let width = text.chars().count() as f64 * 5.0;
        GlyphRun::new(
            Rect::new(left, top, left + width, top + 10.0),
            text,
            FontSpec::new("Times", 10.0),
            seq,
        )
    }

    /// A page with one single-cell bordered box and some loose text.
    fn boxed_page(index: usize) -> Page {
        let mut page = Page::new(index, 200.0, 300.0);
        page.shapes = vec![
            thin_h(100.0, 20.0, 120.0),
            thin_h(150.0, 20.0, 120.0),
            thin_v(20.0, 100.0, 150.0),
            thin_v(120.0, 100.0, 150.0),
        ];
        page.glyphs = vec![
            glyph("Outside text", 20.0, 20.0, 0),
            glyph("inside", 40.0, 115.0, 1),
        ];
        page
    }

    fn doc(pages: Vec<Page>) -> Document {
        Document::new("report.pdf", pages)
    }

    fn config() -> ExtractConfig {
        ExtractConfig::default()
    }

    #[test]
    fn test_single_boxed_cell_becomes_table() {
        let tables = extract(&doc(vec![boxed_page(0)]), &config());
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.table_type, TableType::FullBordered);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0].cells.len(), 1);
        assert_eq!(t.rows[0].cells[0].text, "inside");
        assert_eq!(t.code, "report_S01_P001_T001BR");
        assert_eq!(t.order, 1);
    }

    #[test]
    fn test_text_partitioned_around_table() {
        let staged = extract_document(&doc(vec![boxed_page(0)]), &config());
        let page = &staged.pages[0];
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].text, "Outside text");
        assert_eq!(page.blocks[0].id, 1);
        assert_eq!(
            ruled_core::reading_order(page.index, page.blocks[0].id),
            10_001
        );
    }

    #[test]
    fn test_page_without_rulings_yields_no_tables() {
        let mut page = Page::new(0, 200.0, 300.0);
        page.glyphs = vec![glyph("just text", 10.0, 10.0, 0)];
        let staged = extract_document(&doc(vec![page]), &config());
        assert!(staged.pages[0].tables.is_empty());
        assert_eq!(staged.pages[0].blocks.len(), 1);
    }

    #[test]
    fn test_range_clamped_and_empty_beyond_end() {
        let document = doc(vec![boxed_page(0), boxed_page(1)]);
        assert_eq!(extract_range(&document, &config(), 0, 99).len(), 2);
        assert_eq!(extract_range(&document, &config(), 1, 1).len(), 1);
        assert!(extract_range(&document, &config(), 5, 9).is_empty());
    }

    #[test]
    fn test_continuation_across_pages() {
        // table ends 2 units from page 0's bottom, next starts 2 units
        // from page 1's top, same column count
        let mut first = Page::new(0, 200.0, 300.0);
        first.shapes = vec![
            thin_h(250.0, 20.0, 120.0),
            thin_h(297.0, 20.0, 120.0),
            thin_v(20.0, 250.0, 297.0),
            thin_v(120.0, 250.0, 297.0),
        ];
        first.glyphs = vec![glyph("head", 40.0, 260.0, 0)];
        let mut second = Page::new(1, 200.0, 300.0);
        second.shapes = vec![
            thin_h(2.0, 20.0, 120.0),
            thin_h(60.0, 20.0, 120.0),
            thin_v(20.0, 2.0, 60.0),
            thin_v(120.0, 2.0, 60.0),
        ];
        second.glyphs = vec![glyph("tail", 40.0, 20.0, 0)];

        let tables = extract(&doc(vec![first, second]), &config());
        assert_eq!(tables.len(), 2);
        assert!(!tables[0].continued);
        assert!(tables[1].continued);
    }

    #[test]
    fn test_far_tables_not_continued() {
        let document = doc(vec![boxed_page(0), boxed_page(1)]);
        let tables = extract(&document, &config());
        assert!(tables.iter().all(|t| !t.continued));
    }

    #[test]
    fn test_frame_excludes_outside_content() {
        // frame covers the lower half of the page only
        let mut frames = BTreeMap::new();
        frames.insert(
            0,
            FrameRect {
                left: 0.0,
                top: 0.3,
                width: 1.0,
                height: 0.7,
            },
        );
        let config = ExtractConfig::new(frames, None).unwrap();
        let staged = extract_document(&doc(vec![boxed_page(0)]), &config);
        let page = &staged.pages[0];
        // the table sits inside the frame, the loose text above it does not
        assert_eq!(page.tables.len(), 1);
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn test_two_tables_ordered_top_to_bottom() {
        let mut page = Page::new(0, 200.0, 400.0);
        page.shapes = vec![
            // upper box
            thin_h(50.0, 20.0, 120.0),
            thin_h(90.0, 20.0, 120.0),
            thin_v(20.0, 50.0, 90.0),
            thin_v(120.0, 50.0, 90.0),
            // lower box
            thin_h(200.0, 20.0, 120.0),
            thin_h(240.0, 20.0, 120.0),
            thin_v(20.0, 200.0, 240.0),
            thin_v(120.0, 200.0, 240.0),
        ];
        page.glyphs = vec![glyph("a", 40.0, 60.0, 0), glyph("b", 40.0, 210.0, 1)];
        let tables = extract(&doc(vec![page]), &config());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].order, 1);
        assert_eq!(tables[1].order, 2);
        assert!(tables[0].rect.top < tables[1].rect.top);
        assert_eq!(tables[0].code, "report_S01_P001_T001BR");
        assert_eq!(tables[1].code, "report_S01_P001_T002BR");
    }
}
