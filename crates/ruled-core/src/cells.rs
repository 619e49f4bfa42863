//! Cell and span resolution.
//!
//! Walks a detected grid, merges adjacent base cells that lack a drawn
//! dividing ruling, and flags cells missing any outer border as
//! invisible. The resolved cells tile the candidate area exactly.

use crate::geometry::Rect;
use crate::grid::Grid;
use crate::ruling::{Orientation, Ruling};
use crate::table::Cell;

/// Tolerances for border detection.
#[derive(Debug, Clone, PartialEq)]
pub struct CellOptions {
    /// Fraction of a side's length a drawn ruling must cover for the
    /// side to count as bordered.
    pub border_coverage_ratio: f64,
    /// Perpendicular distance within which a ruling backs a grid line.
    pub snap_tolerance: f64,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            border_coverage_ratio: 0.9,
            snap_tolerance: 2.0,
        }
    }
}

/// Total length of drawn ruling coverage at `pos` clipped to [lo, hi].
fn coverage(rulings: &[Ruling], pos: f64, lo: f64, hi: f64, snap_tolerance: f64) -> f64 {
    rulings
        .iter()
        .filter(|r| (r.pos - pos).abs() <= snap_tolerance)
        .map(|r| (r.hi.min(hi) - r.lo.max(lo)).max(0.0))
        .sum()
}

/// Resolve the merged, span-indexed cells of one grid.
///
/// Every base grid cell ends up in exactly one resolved cell, so the
/// result tiles `grid.area` with no gaps or overlapping interiors.
/// Returns an empty list for degenerate grids; callers drop those
/// silently.
pub fn resolve_cells(grid: &Grid, opts: &CellOptions) -> Vec<Cell> {
    let rows = grid.rows();
    let cols = grid.cols();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    debug_assert!(grid
        .horizontals
        .iter()
        .all(|r| r.orientation == Orientation::Horizontal));
    debug_assert!(grid
        .verticals
        .iter()
        .all(|r| r.orientation == Orientation::Vertical));

    let h_border = |y: f64, x_lo: f64, x_hi: f64| -> bool {
        coverage(&grid.horizontals, y, x_lo, x_hi, opts.snap_tolerance)
            >= opts.border_coverage_ratio * (x_hi - x_lo)
    };
    let v_border = |x: f64, y_lo: f64, y_hi: f64| -> bool {
        coverage(&grid.verticals, x, y_lo, y_hi, opts.snap_tolerance)
            >= opts.border_coverage_ratio * (y_hi - y_lo)
    };

    let xs = &grid.xs;
    let ys = &grid.ys;
    let mut taken = vec![vec![false; cols]; rows];
    let mut cells = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            if taken[r][c] {
                continue;
            }

            let (mut rb, mut cr) = (r, c);
            // Grow the span across missing dividers until stable.
            // Growing down can expose a missing right divider, so loop.
            loop {
                let mut grew = false;
                while cr + 1 < cols
                    && (r..=rb).all(|rr| !taken[rr][cr + 1])
                    && !v_border(xs[cr + 1], ys[r], ys[rb + 1])
                {
                    cr += 1;
                    grew = true;
                }
                while rb + 1 < rows
                    && (c..=cr).all(|cc| !taken[rb + 1][cc])
                    && !h_border(ys[rb + 1], xs[c], xs[cr + 1])
                {
                    rb += 1;
                    grew = true;
                }
                if !grew {
                    break;
                }
            }

            for rr in r..=rb {
                for cc in c..=cr {
                    taken[rr][cc] = true;
                }
            }

            let rect = Rect::new(xs[c], ys[r], xs[cr + 1], ys[rb + 1]);
            // A cell bordered on at most 3 sides belongs to a partially
            // bordered table; the 4th side is implied by the outer rect.
            let invisible = !(h_border(ys[r], xs[c], xs[cr + 1])
                && h_border(ys[rb + 1], xs[c], xs[cr + 1])
                && v_border(xs[c], ys[r], ys[rb + 1])
                && v_border(xs[cr + 1], ys[r], ys[rb + 1]));

            cells.push(Cell {
                rect,
                row_top: r,
                row_bottom: rb,
                col_left: c,
                col_right: cr,
                invisible,
                text: String::new(),
            });
        }
    }

    cells
}
