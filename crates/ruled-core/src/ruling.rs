//! Ruling collection and normalization.
//!
//! A ruling is a straight border line segment recovered from a thin
//! ink-colored rectangle shape. Rulings are immutable once built;
//! normalization and joining always produce new segments.

use crate::geometry::Point;
use crate::primitives::DrawnRect;

/// Orientation of a ruling. Askew segments are discarded at
/// construction, so only the two axis cases exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Tolerances for ruling collection. Defaults follow the reference
/// rendering conventions: sides under 3 units are thin, a 1:10 run
/// ratio separates axis-aligned from askew, and merged rulings must
/// overlap by 90% of the shorter operand.
#[derive(Debug, Clone, PartialEq)]
pub struct RulingOptions {
    /// A rectangle side shorter than this counts as thin.
    pub thin_side_max: f64,
    /// Long-axis run ratio beyond which a segment is axis-aligned.
    pub askew_ratio: f64,
    /// Fraction of the shorter operand's length two rulings must
    /// overlap by to merge during normalization.
    pub merge_overlap_ratio: f64,
    /// Perpendicular distance within which two rulings are collinear.
    pub snap_tolerance: f64,
    /// Maximum gap between collinear visible rulings fused by joining.
    pub join_gap: f64,
    /// Minimum length for a ruling to count as a visible border.
    pub min_visible_len: f64,
}

impl Default for RulingOptions {
    fn default() -> Self {
        Self {
            thin_side_max: 3.0,
            askew_ratio: 10.0,
            merge_overlap_ratio: 0.9,
            snap_tolerance: 2.0,
            join_gap: 3.0,
            min_visible_len: 3.0,
        }
    }
}

/// A horizontal or vertical border line segment.
///
/// Stored as a perpendicular position plus an interval along the long
/// axis: for a horizontal ruling `pos` is y and `[lo, hi]` spans x.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ruling {
    pub orientation: Orientation,
    pub pos: f64,
    pub lo: f64,
    pub hi: f64,
}

impl Ruling {
    pub fn horizontal(y: f64, x_lo: f64, x_hi: f64) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            pos: y,
            lo: x_lo.min(x_hi),
            hi: x_lo.max(x_hi),
        }
    }

    pub fn vertical(x: f64, y_lo: f64, y_hi: f64) -> Self {
        Self {
            orientation: Orientation::Vertical,
            pos: x,
            lo: y_lo.min(y_hi),
            hi: y_lo.max(y_hi),
        }
    }

    /// Length along the long axis.
    pub fn length(&self) -> f64 {
        self.hi - self.lo
    }

    /// Segment endpoints as (x1, y1, x2, y2).
    pub fn endpoints(&self) -> (f64, f64, f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.lo, self.pos, self.hi, self.pos),
            Orientation::Vertical => (self.pos, self.lo, self.pos, self.hi),
        }
    }

    /// Build a ruling from a drawn rectangle shape, or reject it.
    ///
    /// Rejects shapes that are not ink-colored, rectangles small on both
    /// side pairs (noise) or large on both (a real filled box), and thin
    /// rectangles whose long axis is not within the askew ratio of an
    /// axis (1:10 by default).
    pub fn from_drawn_rect(shape: &DrawnRect, opts: &RulingOptions) -> Option<Ruling> {
        if !shape.color.is_near_black() {
            return None;
        }

        let [p0, p1, p2, p3] = shape.vertices;
        let side_a = p0.distance(&p1);
        let side_b = p1.distance(&p2);
        let a_small = side_a < opts.thin_side_max;
        let b_small = side_b < opts.thin_side_max;

        match (a_small, b_small) {
            // (p0,p1) and (p2,p3) are the short sides
            (true, false) => Self::from_thin(p0, p1, p2, p3, opts),
            // (p1,p2) and (p3,p0) are the short sides
            (false, true) => Self::from_thin(p1, p2, p3, p0, opts),
            // noise or a filled box, not a line
            _ => None,
        }
    }

    /// Vertices are ordered so (p0,p1) and (p2,p3) are the short sides.
    fn from_thin(p0: Point, p1: Point, p2: Point, p3: Point, opts: &RulingOptions) -> Option<Ruling> {
        let long_dx = (p2.x - p1.x).abs();
        let long_dy = (p2.y - p1.y).abs();

        let xs = [p0.x, p1.x, p2.x, p3.x];
        let ys = [p0.y, p1.y, p2.y, p3.y];

        if long_dx * opts.askew_ratio < long_dy {
            let x = xs.iter().sum::<f64>() / 4.0;
            let lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some(Ruling::vertical(x, lo, hi))
        } else if long_dy * opts.askew_ratio < long_dx {
            let y = ys.iter().sum::<f64>() / 4.0;
            let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some(Ruling::horizontal(y, lo, hi))
        } else {
            // too askew to be a border line
            None
        }
    }

    /// Overlap length of the two rulings' long-axis intervals.
    fn overlap(&self, other: &Ruling) -> f64 {
        (self.hi.min(other.hi) - self.lo.max(other.lo)).max(0.0)
    }

    /// Whether normalization may merge the two rulings: same
    /// orientation, collinear within the snap tolerance, and interval
    /// overlap of at least `merge_overlap_ratio` of the shorter operand.
    pub fn mergeable_with(&self, other: &Ruling, opts: &RulingOptions) -> bool {
        if self.orientation != other.orientation {
            return false;
        }
        if (self.pos - other.pos).abs() > opts.snap_tolerance {
            return false;
        }
        let overlap = self.overlap(other);
        if overlap <= 0.0 {
            return false;
        }
        let shorter = self.length().min(other.length());
        overlap >= opts.merge_overlap_ratio * shorter
    }

    /// Union of two mergeable rulings. Produces a new ruling.
    pub fn merged_with(&self, other: &Ruling) -> Ruling {
        Ruling {
            orientation: self.orientation,
            pos: (self.pos + other.pos) / 2.0,
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }
}

/// The staged per-page ruling lists produced by collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulingCollection {
    /// Every ruling recovered from a drawn shape, unmerged.
    pub raw: Vec<Ruling>,
    /// Raw rulings with near-duplicates merged.
    pub normalized: Vec<Ruling>,
    /// Normalized rulings long enough to render as borders.
    pub visible: Vec<Ruling>,
    /// Visible rulings with collinear gap-adjacent segments fused.
    pub joined: Vec<Ruling>,
}

impl RulingCollection {
    pub fn joined_horizontals(&self) -> Vec<Ruling> {
        self.joined
            .iter()
            .filter(|r| r.orientation == Orientation::Horizontal)
            .copied()
            .collect()
    }

    pub fn joined_verticals(&self) -> Vec<Ruling> {
        self.joined
            .iter()
            .filter(|r| r.orientation == Orientation::Vertical)
            .copied()
            .collect()
    }
}

/// Run the full collection pipeline for one page's drawn shapes.
pub fn collect_rulings(shapes: &[DrawnRect], opts: &RulingOptions) -> RulingCollection {
    let raw: Vec<Ruling> = shapes
        .iter()
        .filter_map(|s| Ruling::from_drawn_rect(s, opts))
        .collect();
    let normalized = normalize_rulings(&raw, opts);
    let visible: Vec<Ruling> = normalized
        .iter()
        .filter(|r| r.length() >= opts.min_visible_len)
        .copied()
        .collect();
    let joined = join_rulings(&visible, opts);
    RulingCollection {
        raw,
        normalized,
        visible,
        joined,
    }
}

/// Merge near-duplicate and heavily overlapping rulings.
///
/// Rulings of each orientation are sorted by perpendicular position and
/// interval start; a single greedy left-to-right pass then merges each
/// ruling into its predecessor when [`Ruling::mergeable_with`] holds.
/// Running the pass on already-normalized input is the identity.
pub fn normalize_rulings(rulings: &[Ruling], opts: &RulingOptions) -> Vec<Ruling> {
    let mut result = Vec::with_capacity(rulings.len());
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let mut group: Vec<Ruling> = rulings
            .iter()
            .filter(|r| r.orientation == orientation)
            .copied()
            .collect();
        group.sort_by(|a, b| {
            a.pos
                .partial_cmp(&b.pos)
                .unwrap()
                .then_with(|| a.lo.partial_cmp(&b.lo).unwrap())
        });

        let mut merged: Vec<Ruling> = Vec::with_capacity(group.len());
        for r in group {
            match merged.last() {
                Some(last) if last.mergeable_with(&r, opts) => {
                    let fused = merged.pop().unwrap().merged_with(&r);
                    merged.push(fused);
                }
                _ => merged.push(r),
            }
        }
        result.extend(merged);
    }
    result
}

/// Fuse collinear visible rulings separated by a small gap into
/// continuous border segments for grid building.
pub fn join_rulings(rulings: &[Ruling], opts: &RulingOptions) -> Vec<Ruling> {
    let mut result = Vec::with_capacity(rulings.len());
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let mut group: Vec<Ruling> = rulings
            .iter()
            .filter(|r| r.orientation == orientation)
            .copied()
            .collect();
        group.sort_by(|a, b| {
            a.pos
                .partial_cmp(&b.pos)
                .unwrap()
                .then_with(|| a.lo.partial_cmp(&b.lo).unwrap())
        });

        let mut joined: Vec<Ruling> = Vec::with_capacity(group.len());
        for r in group {
            match joined.last() {
                Some(last)
                    if (last.pos - r.pos).abs() <= opts.snap_tolerance
                        && r.lo - last.hi <= opts.join_gap =>
                {
                    let fused = joined.pop().unwrap().merged_with(&r);
                    joined.push(fused);
                }
                _ => joined.push(r),
            }
        }
        result.extend(joined);
    }
    result
}
