//! Partitioning of composed text against assembled tables.
//!
//! A line is outside the tables iff its rectangle intersects no table
//! rectangle, so the outside and inside sets are disjoint by
//! construction. Inside lines fill cells word by word.

use crate::chunk::TextChunk;
use crate::geometry::Point;
use crate::table::{Row, Table};

/// Split lines into (outside, inside) sets against the page's tables.
pub fn partition_lines(
    lines: &[TextChunk],
    tables: &[Table],
) -> (Vec<TextChunk>, Vec<TextChunk>) {
    lines
        .iter()
        .cloned()
        .partition(|line| !tables.iter().any(|t| t.rect.intersects(&line.rect)))
}

/// Fill cell text from the lines lying inside the table.
///
/// Routing happens per word, not per line: a line composed across a
/// cell border must not drag its words into one cell. Each word goes
/// to the cell containing its center point and is appended in reading
/// order, space-separated. Words whose center falls in no cell
/// (borders, rounding) are dropped.
pub fn fill_cell_text(table: Table, lines: &[TextChunk]) -> Table {
    let mut ordered: Vec<&TextChunk> = lines
        .iter()
        .filter(|l| table.rect.intersects(&l.rect))
        .collect();
    ordered.sort_by(|a, b| {
        a.rect
            .top
            .partial_cmp(&b.rect.top)
            .unwrap()
            .then_with(|| a.rect.left.partial_cmp(&b.rect.left).unwrap())
    });

    let mut rows: Vec<Row> = table.rows.clone();
    for line in ordered {
        for word in &line.words {
            let center = Point::new(
                (word.rect.left + word.rect.right) / 2.0,
                (word.rect.top + word.rect.bottom) / 2.0,
            );
            let target = rows
                .iter_mut()
                .flat_map(|r| r.cells.iter_mut())
                .find(|c| c.rect.contains_point(&center));
            if let Some(cell) = target {
                if !cell.text.is_empty() {
                    cell.text.push(' ');
                }
                cell.text.push_str(&word.text);
            }
        }
    }

    Table { rows, ..table }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkTag, Word};
    use crate::geometry::Rect;
    use crate::primitives::FontSpec;
    use crate::table::Cell;

    fn line(text: &str, rect: Rect) -> TextChunk {
        TextChunk::from_words(vec![Word {
            rect,
            text: text.to_string(),
            font: FontSpec::new("Times", 10.0),
            tag: ChunkTag::Unknown,
            url: None,
            space_width: 0.0,
        }])
        .unwrap()
    }

    fn one_by_two_table() -> Table {
        let cells = vec![
            Cell {
                rect: Rect::new(0.0, 0.0, 50.0, 20.0),
                row_top: 0,
                row_bottom: 0,
                col_left: 0,
                col_right: 0,
                invisible: false,
                text: String::new(),
            },
            Cell {
                rect: Rect::new(50.0, 0.0, 100.0, 20.0),
                row_top: 0,
                row_bottom: 0,
                col_left: 1,
                col_right: 1,
                invisible: false,
                text: String::new(),
            },
        ];
        Table::from_cells(Rect::new(0.0, 0.0, 100.0, 20.0), cells, 0)
    }

    #[test]
    fn test_partition_is_disjoint_and_total() {
        let tables = vec![one_by_two_table()];
        let lines = vec![
            line("in left", Rect::new(5.0, 5.0, 40.0, 15.0)),
            line("below", Rect::new(5.0, 40.0, 40.0, 50.0)),
            line("in right", Rect::new(55.0, 5.0, 95.0, 15.0)),
        ];
        let (outside, inside) = partition_lines(&lines, &tables);
        assert_eq!(outside.len(), 1);
        assert_eq!(inside.len(), 2);
        assert_eq!(outside.len() + inside.len(), lines.len());
        assert_eq!(outside[0].text, "below");
    }

    #[test]
    fn test_everything_outside_without_tables() {
        let lines = vec![line("free", Rect::new(0.0, 0.0, 10.0, 10.0))];
        let (outside, inside) = partition_lines(&lines, &[]);
        assert_eq!(outside.len(), 1);
        assert!(inside.is_empty());
    }

    #[test]
    fn test_fill_cell_text_routes_by_center() {
        let table = one_by_two_table();
        let lines = vec![
            line("beta", Rect::new(55.0, 5.0, 95.0, 15.0)),
            line("alpha", Rect::new(5.0, 5.0, 40.0, 15.0)),
        ];
        let filled = fill_cell_text(table, &lines);
        assert_eq!(filled.rows[0].cells[0].text, "alpha");
        assert_eq!(filled.rows[0].cells[1].text, "beta");
    }

    #[test]
    fn test_fill_cell_text_appends_in_reading_order() {
        let table = one_by_two_table();
        // both lines land in the left cell, stacked vertically
        let lines = vec![
            line("second", Rect::new(5.0, 11.0, 40.0, 18.0)),
            line("first", Rect::new(5.0, 1.0, 40.0, 9.0)),
        ];
        let filled = fill_cell_text(table, &lines);
        assert_eq!(filled.rows[0].cells[0].text, "first second");
    }

    #[test]
    fn test_line_spanning_cells_routes_words_separately() {
        let table = one_by_two_table();
        let spanning = TextChunk::from_members(&[
            line("name", Rect::new(25.0, 5.0, 45.0, 15.0)),
            line("vote", Rect::new(75.0, 5.0, 95.0, 15.0)),
        ])
        .unwrap();
        let filled = fill_cell_text(table, &[spanning]);
        assert_eq!(filled.rows[0].cells[0].text, "name");
        assert_eq!(filled.rows[0].cells[1].text, "vote");
    }

    #[test]
    fn test_fill_cell_text_ignores_distant_lines() {
        let table = one_by_two_table();
        let lines = vec![line("far away", Rect::new(0.0, 200.0, 50.0, 210.0))];
        let filled = fill_cell_text(table, &lines);
        assert!(filled.rows[0].cells.iter().all(|c| c.text.is_empty()));
    }
}
