//! Table area and grid detection.
//!
//! Joined rulings are clustered into maximal connected components;
//! each component with at least two distinct lines per axis yields a
//! candidate table area with its row/column coordinate arrays.

use crate::geometry::Rect;
use crate::ruling::{Orientation, Ruling};

/// Tolerances for grid detection.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Distance within which two rulings "nearly touch" and connect.
    pub touch_tolerance: f64,
    /// Distance within which two line positions are the same grid line.
    pub snap_tolerance: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            touch_tolerance: 3.0,
            snap_tolerance: 2.0,
        }
    }
}

/// A candidate table area with its intersection grid.
///
/// `xs` are the distinct vertical line positions (column boundaries),
/// `ys` the distinct horizontal line positions (row boundaries), both
/// sorted ascending. The grid has `ys.len() - 1` rows and
/// `xs.len() - 1` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub area: Rect,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Horizontal rulings belonging to this cluster.
    pub horizontals: Vec<Ruling>,
    /// Vertical rulings belonging to this cluster.
    pub verticals: Vec<Ruling>,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.ys.len().saturating_sub(1)
    }

    pub fn cols(&self) -> usize {
        self.xs.len().saturating_sub(1)
    }
}

fn ruling_rect(r: &Ruling) -> Rect {
    match r.orientation {
        Orientation::Horizontal => Rect::new(r.lo, r.pos, r.hi, r.pos),
        Orientation::Vertical => Rect::new(r.pos, r.lo, r.pos, r.hi),
    }
}

/// Two rulings connect when their segments intersect or nearly touch.
fn rulings_touch(a: &Ruling, b: &Ruling, tolerance: f64) -> bool {
    ruling_rect(a).expand(tolerance).intersects(&ruling_rect(b))
}

/// Detect candidate table grids from one page's joined rulings.
///
/// Returns no grids when either orientation is absent; pages without
/// tables are common and not an error. Clusters that cannot form a
/// single cell (fewer than two distinct lines on either axis) are
/// dropped silently.
pub fn detect_grids(
    horizontals: &[Ruling],
    verticals: &[Ruling],
    opts: &GridOptions,
) -> Vec<Grid> {
    if horizontals.is_empty() || verticals.is_empty() {
        return Vec::new();
    }

    let all: Vec<Ruling> = horizontals.iter().chain(verticals.iter()).copied().collect();
    let n = all.len();

    // Union-find over rulings that mutually intersect or nearly touch.
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if rulings_touch(&all[i], &all[j], opts.touch_tolerance) {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut clusters: std::collections::HashMap<usize, Vec<Ruling>> =
        std::collections::HashMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        clusters.entry(root).or_default().push(all[i]);
    }

    let mut grids: Vec<Grid> = clusters
        .into_values()
        .filter_map(|members| grid_from_cluster(members, opts))
        .collect();

    // Deterministic order: top-to-bottom, then left-to-right.
    grids.sort_by(|a, b| {
        a.area
            .top
            .partial_cmp(&b.area.top)
            .unwrap()
            .then_with(|| a.area.left.partial_cmp(&b.area.left).unwrap())
    });
    grids
}

fn grid_from_cluster(members: Vec<Ruling>, opts: &GridOptions) -> Option<Grid> {
    let horizontals: Vec<Ruling> = members
        .iter()
        .filter(|r| r.orientation == Orientation::Horizontal)
        .copied()
        .collect();
    let verticals: Vec<Ruling> = members
        .iter()
        .filter(|r| r.orientation == Orientation::Vertical)
        .copied()
        .collect();

    let ys = distinct_positions(&horizontals, opts.snap_tolerance);
    let xs = distinct_positions(&verticals, opts.snap_tolerance);
    if xs.len() < 2 || ys.len() < 2 {
        return None;
    }

    let area = Rect::new(xs[0], ys[0], *xs.last().unwrap(), *ys.last().unwrap());
    Some(Grid {
        area,
        xs,
        ys,
        horizontals,
        verticals,
    })
}

/// Sorted distinct line positions, collapsing positions within the snap
/// tolerance to their first representative.
fn distinct_positions(rulings: &[Ruling], snap_tolerance: f64) -> Vec<f64> {
    let mut positions: Vec<f64> = rulings.iter().map(|r| r.pos).collect();
    positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut distinct: Vec<f64> = Vec::with_capacity(positions.len());
    for p in positions {
        match distinct.last() {
            Some(&last) if (p - last).abs() <= snap_tolerance => {}
            _ => distinct.push(p),
        }
    }
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> GridOptions {
        GridOptions::default()
    }

    #[test]
    fn test_no_grid_without_both_orientations() {
        let h = vec![Ruling::horizontal(0.0, 0.0, 100.0)];
        assert!(detect_grids(&h, &[], &opts()).is_empty());
        let v = vec![Ruling::vertical(0.0, 0.0, 100.0)];
        assert!(detect_grids(&[], &v, &opts()).is_empty());
    }

    #[test]
    fn test_single_rectangle_grid() {
        let h = vec![
            Ruling::horizontal(0.0, 0.0, 100.0),
            Ruling::horizontal(50.0, 0.0, 100.0),
        ];
        let v = vec![
            Ruling::vertical(0.0, 0.0, 50.0),
            Ruling::vertical(100.0, 0.0, 50.0),
        ];
        let grids = detect_grids(&h, &v, &opts());
        assert_eq!(grids.len(), 1);
        let g = &grids[0];
        assert_eq!(g.area, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(g.rows(), 1);
        assert_eq!(g.cols(), 1);
    }

    #[test]
    fn test_three_by_two_grid_dimensions() {
        let h = vec![
            Ruling::horizontal(0.0, 0.0, 120.0),
            Ruling::horizontal(30.0, 0.0, 120.0),
            Ruling::horizontal(60.0, 0.0, 120.0),
            Ruling::horizontal(90.0, 0.0, 120.0),
        ];
        let v = vec![
            Ruling::vertical(0.0, 0.0, 90.0),
            Ruling::vertical(60.0, 0.0, 90.0),
            Ruling::vertical(120.0, 0.0, 90.0),
        ];
        let grids = detect_grids(&h, &v, &opts());
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].rows(), 3);
        assert_eq!(grids[0].cols(), 2);
    }

    #[test]
    fn test_disconnected_clusters_become_separate_grids() {
        // two independent boxes on the same page
        let h = vec![
            Ruling::horizontal(0.0, 0.0, 100.0),
            Ruling::horizontal(50.0, 0.0, 100.0),
            Ruling::horizontal(300.0, 0.0, 100.0),
            Ruling::horizontal(350.0, 0.0, 100.0),
        ];
        let v = vec![
            Ruling::vertical(0.0, 0.0, 50.0),
            Ruling::vertical(100.0, 0.0, 50.0),
            Ruling::vertical(0.0, 300.0, 350.0),
            Ruling::vertical(100.0, 300.0, 350.0),
        ];
        let grids = detect_grids(&h, &v, &opts());
        assert_eq!(grids.len(), 2);
        assert!(grids[0].area.top < grids[1].area.top);
    }

    #[test]
    fn test_degenerate_cluster_dropped() {
        // one horizontal crossing one vertical: no cell can form
        let h = vec![Ruling::horizontal(50.0, 0.0, 100.0)];
        let v = vec![Ruling::vertical(50.0, 0.0, 100.0)];
        assert!(detect_grids(&h, &v, &opts()).is_empty());
    }

    #[test]
    fn test_nearly_touching_rulings_connect() {
        // vertical ends 2 units above the horizontal: still one cluster
        let h = vec![
            Ruling::horizontal(100.0, 0.0, 100.0),
            Ruling::horizontal(50.0, 0.0, 100.0),
        ];
        let v = vec![
            Ruling::vertical(0.0, 50.0, 98.0),
            Ruling::vertical(100.0, 50.0, 98.0),
        ];
        let grids = detect_grids(&h, &v, &opts());
        assert_eq!(grids.len(), 1);
    }

    #[test]
    fn test_snapped_positions_collapse() {
        let h = vec![
            Ruling::horizontal(0.0, 0.0, 100.0),
            Ruling::horizontal(1.0, 0.0, 100.0), // same grid line as y=0
            Ruling::horizontal(50.0, 0.0, 100.0),
        ];
        let v = vec![
            Ruling::vertical(0.0, 0.0, 50.0),
            Ruling::vertical(100.0, 0.0, 50.0),
        ];
        let grids = detect_grids(&h, &v, &opts());
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].rows(), 1);
    }
}
