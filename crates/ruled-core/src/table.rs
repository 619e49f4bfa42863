//! Table entities and assembly.
//!
//! Cells resolved from a grid are grouped into rows and assembled into
//! a classified [`Table`]. Post-processing steps (`remove_empty_rows`,
//! `split_cells`, `complete_rows`) are pure `Table -> Table`
//! transformations applied by the orchestrator in a fixed order rather
//! than hidden mutation methods.

use crate::geometry::Rect;

/// A resolved table cell with its inclusive grid span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub rect: Rect,
    /// Inclusive row index range, zero-based.
    pub row_top: usize,
    pub row_bottom: usize,
    /// Inclusive column index range, zero-based.
    pub col_left: usize,
    pub col_right: usize,
    /// No drawn border on at least one side.
    pub invisible: bool,
    /// Accumulated text content, filled during partitioning.
    pub text: String,
}

impl Cell {
    pub fn row_span(&self) -> usize {
        self.row_bottom - self.row_top + 1
    }

    pub fn col_span(&self) -> usize {
        self.col_right - self.col_left + 1
    }
}

/// An ordered run of cells anchored at the same top row index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    /// A row is empty when every cell's text is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.text.trim().is_empty())
    }
}

/// How a table's borders were drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableType {
    /// Every cell has all four borders drawn.
    FullBordered,
    /// At least one cell is missing a border.
    PartialBordered,
    /// Detected purely by whitespace alignment (separate detection
    /// mode; never produced by the ruling pipeline).
    Unbordered,
}

impl TableType {
    /// Two-letter code suffix.
    pub fn suffix(&self) -> &'static str {
        match self {
            TableType::FullBordered => "BR",
            TableType::PartialBordered => "PB",
            TableType::Unbordered => "UN",
        }
    }
}

/// An assembled table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub rect: Rect,
    pub rows: Vec<Row>,
    pub table_type: TableType,
    /// This table is the tail of a table that started on a prior page.
    pub continued: bool,
    /// Document-unique code, assigned after assembly.
    pub code: String,
    /// 1-based reading-order position within the page.
    pub order: usize,
    pub page_index: usize,
}

impl Table {
    /// Assemble a table from resolved cells.
    ///
    /// Cells are grouped into rows by their anchoring top row index,
    /// ordered top-to-bottom with cells left-to-right. Classification
    /// is derived from the invisible flags.
    pub fn from_cells(area: Rect, cells: Vec<Cell>, page_index: usize) -> Table {
        let table_type = classify(&cells);
        let row_count = cells.iter().map(|c| c.row_bottom + 1).max().unwrap_or(0);

        let mut rows: Vec<Row> = Vec::with_capacity(row_count);
        for index in 0..row_count {
            let mut row_cells: Vec<Cell> = cells
                .iter()
                .filter(|c| c.row_top == index)
                .cloned()
                .collect();
            row_cells.sort_by(|a, b| a.col_left.cmp(&b.col_left));
            rows.push(Row {
                index,
                cells: row_cells,
            });
        }

        Table {
            rect: area,
            rows,
            table_type,
            continued: false,
            code: String::new(),
            order: 0,
            page_index,
        }
    }

    /// All cells in reading order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }

    /// Number of columns, from the widest recorded span.
    pub fn column_count(&self) -> usize {
        self.cells().map(|c| c.col_right + 1).max().unwrap_or(0)
    }
}

/// Classify by invisible-cell count. A table with every cell invisible
/// cannot come out of the ruling pipeline (grid detection requires
/// drawn borders), so that case is not a reachable classification.
fn classify(cells: &[Cell]) -> TableType {
    let invisible = cells.iter().filter(|c| c.invisible).count();
    debug_assert!(
        cells.is_empty() || invisible < cells.len(),
        "ruling-derived table with every cell invisible"
    );
    if invisible == 0 {
        TableType::FullBordered
    } else {
        TableType::PartialBordered
    }
}

/// Drop rows whose cells are all empty of text. Idempotent.
pub fn remove_empty_rows(table: Table) -> Table {
    let rows = table
        .rows
        .into_iter()
        .filter(|row| !row.is_empty())
        .collect();
    Table { rows, ..table }
}

/// Pad each row with invisible empty filler cells so the row covers
/// every column not already claimed by a spanning cell. Idempotent.
pub fn complete_rows(table: Table) -> Table {
    let cols = table.column_count();
    if cols == 0 {
        return table;
    }

    // Columns covered at each row index by any cell, spans included.
    let mut covered: std::collections::HashMap<usize, Vec<bool>> = std::collections::HashMap::new();
    for cell in table.cells() {
        for r in cell.row_top..=cell.row_bottom {
            let marks = covered.entry(r).or_insert_with(|| vec![false; cols]);
            for c in cell.col_left..=cell.col_right {
                marks[c] = true;
            }
        }
    }

    // Column edges from the cells anchored at each index; a column no
    // cell anchors at borrows its neighbor's edge. Columns are not
    // uniform, so filler bounds cannot come from dividing the width.
    let mut lefts: Vec<Option<f64>> = vec![None; cols];
    let mut rights: Vec<Option<f64>> = vec![None; cols];
    for cell in table.cells() {
        let l = &mut lefts[cell.col_left];
        *l = Some(l.map_or(cell.rect.left, |v| v.min(cell.rect.left)));
        let r = &mut rights[cell.col_right];
        *r = Some(r.map_or(cell.rect.right, |v| v.max(cell.rect.right)));
    }
    let col_left_edge = |c: usize| {
        lefts[c]
            .or(if c > 0 { rights[c - 1] } else { None })
            .unwrap_or(table.rect.left)
    };
    let col_right_edge = |c: usize| {
        rights[c]
            .or(if c + 1 < cols { lefts[c + 1] } else { None })
            .unwrap_or(table.rect.right)
    };

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let marks = covered.get(&row.index);
            let mut cells = row.cells.clone();
            for c in 0..cols {
                let is_covered = marks.map(|m| m[c]).unwrap_or(false);
                if !is_covered {
                    cells.push(Cell {
                        rect: Rect::new(
                            col_left_edge(c),
                            row_top_edge(&table, row.index),
                            col_right_edge(c),
                            row_bottom_edge(&table, row.index),
                        ),
                        row_top: row.index,
                        row_bottom: row.index,
                        col_left: c,
                        col_right: c,
                        invisible: true,
                        text: String::new(),
                    });
                }
            }
            cells.sort_by(|a, b| a.col_left.cmp(&b.col_left));
            Row {
                index: row.index,
                cells,
            }
        })
        .collect();

    Table { rows, ..table }
}

fn row_top_edge(table: &Table, index: usize) -> f64 {
    table
        .cells()
        .filter(|c| c.row_top == index)
        .map(|c| c.rect.top)
        .fold(f64::INFINITY, f64::min)
        .min(table.rect.bottom)
}

fn row_bottom_edge(table: &Table, index: usize) -> f64 {
    table
        .cells()
        .filter(|c| c.row_bottom == index)
        .map(|c| c.rect.bottom)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(table.rect.top)
}

/// Split cells whose text carries a column-break marker (a run of two
/// or more spaces) left behind by a missed ruling. Best effort: a cell
/// is split only when the marker count matches its column span.
pub fn split_cells(table: Table) -> Table {
    let marker = regex::Regex::new(" {2,}").expect("static pattern");

    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(row.cells.len());
            for cell in row.cells {
                let span = cell.col_span();
                let parts: Vec<&str> = marker.split(cell.text.trim()).collect();
                if span > 1 && parts.len() == span {
                    let width = cell.rect.width() / span as f64;
                    for (i, part) in parts.iter().enumerate() {
                        let left = cell.rect.left + i as f64 * width;
                        cells.push(Cell {
                            rect: Rect::new(left, cell.rect.top, left + width, cell.rect.bottom),
                            row_top: cell.row_top,
                            row_bottom: cell.row_bottom,
                            col_left: cell.col_left + i,
                            col_right: cell.col_left + i,
                            invisible: true,
                            text: part.to_string(),
                        });
                    }
                } else {
                    cells.push(cell);
                }
            }
            Row {
                index: row.index,
                cells,
            }
        })
        .collect();

    Table { rows, ..table }
}

/// Margin within which a table edge counts as touching the page edge
/// for continuation detection.
pub const MIN_MARGIN: f64 = 5.0;

/// Whether `next` continues `prev` across a page boundary: `prev` ends
/// within the margin of its page bottom, `next` starts within the
/// margin of its page top, and the column counts match.
pub fn continues(prev: &Table, prev_page: &Rect, next: &Table, next_page: &Rect) -> bool {
    prev_page.bottom - prev.rect.bottom <= MIN_MARGIN
        && next.rect.top - next_page.top <= MIN_MARGIN
        && prev.column_count() == next.column_count()
}

/// Format the document-unique table code:
/// `{base}_S{section:02}_P{page+1:03}_T{ordinal:03}{suffix}`.
pub fn format_code(
    base_name: &str,
    section: usize,
    page_index: usize,
    ordinal: usize,
    table_type: TableType,
) -> String {
    format!(
        "{}_S{:02}_P{:03}_T{:03}{}",
        base_name,
        section,
        page_index + 1,
        ordinal,
        table_type.suffix()
    )
}
