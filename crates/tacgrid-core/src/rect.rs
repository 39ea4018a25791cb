//! Maximal-rectangle search over a sparse set of occupied grid cells.
//!
//! Given a set of occupied cells and a required cell, [`biggest_rect_all`]
//! enumerates every maximal axis-aligned rectangle of contiguous occupied
//! cells containing that cell, and [`biggest_rect`] picks one of them by a
//! preference metric with random (optionally seeded) tie-breaking.
//!
//! The search works on horizontal *spans*: each row of occupied cells is
//! reduced to the maximal contiguous x-range aligned with the required
//! cell, rows are joined while they stay vertically contiguous, and
//! candidate rectangles are grown inside the joined spans. Worst case is
//! (width combinations) x (row count) — fine for tactical/puzzle boards,
//! not for large procedural terrains.

use std::collections::{HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::geom::{GridPoint, GridRect};

/// Criterion used by [`biggest_rect`] to pick among the maximal rectangles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RectPreference {
    /// Pick the widest rectangle.
    Widest,
    /// Pick the tallest rectangle.
    Tallest,
    /// Pick the rectangle with the most cells.
    #[default]
    Largest,
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A row of occupied cells at a fixed y, with the maximal contiguous
/// x-range around the anchor column cached by [`identify_limits`].
///
/// A span can only take part in a rectangle if it covers the anchor
/// column; otherwise it cannot connect contiguously to the start row.
struct Span {
    xs: HashSet<i32>,
    x_min: i32,
    x_max: i32,
}

impl Span {
    fn new() -> Self {
        Self {
            xs: HashSet::new(),
            x_min: i32::MAX,
            x_max: i32::MIN,
        }
    }

    fn insert(&mut self, x: i32) {
        self.xs.insert(x);
    }

    fn width(&self) -> i32 {
        self.x_max - self.x_min + 1
    }

    /// Compute the maximal contiguous x-range around `anchor_x`.
    ///
    /// Returns `false` if the span does not cover the anchor column at
    /// all. Expansion in each direction stops at the first gap.
    fn identify_limits(&mut self, anchor_x: i32) -> bool {
        if !self.xs.contains(&anchor_x) {
            return false;
        }
        self.x_min = anchor_x;
        self.x_max = anchor_x;

        let mut grow_max = true;
        let mut grow_min = true;
        // The point count bounds the expansion; contiguity failure exits
        // earlier.
        for i in 1..=self.xs.len() as i32 {
            if grow_max {
                if self.xs.contains(&(anchor_x + i)) {
                    self.x_max = anchor_x + i;
                } else {
                    grow_max = false;
                }
            }
            if grow_min {
                if self.xs.contains(&(anchor_x - i)) {
                    self.x_min = anchor_x - i;
                } else {
                    grow_min = false;
                }
            }
            if !grow_max && !grow_min {
                break;
            }
        }
        true
    }

    /// Narrow this span's usable range to the reference range. Any
    /// rectangle through the anchor cell cannot exceed the start span.
    fn clamp_to(&mut self, x_min: i32, x_max: i32) {
        self.x_min = self.x_min.max(x_min);
        self.x_max = self.x_max.min(x_max);
    }

    fn covers(&self, x_min: i32, x_max: i32) -> bool {
        self.x_min <= x_min && self.x_max >= x_max
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Find every maximal rectangle of contiguous occupied cells containing
/// `start`.
///
/// A rectangle is valid when every cell inside it is in `points`, it
/// contains `start`, and it meets `min_width` and `min_height`. The result
/// holds only maximal rectangles: none is contained in another with the
/// same footprint. Returns an empty list when `start` is not in `points`
/// or no rectangle can satisfy the minimums.
///
/// Candidate widths are enumerated in strictly decreasing order for each
/// left edge, so a candidate sharing the previous candidate's vertical
/// bounds is necessarily narrower and gets suppressed. The enumeration
/// order is load-bearing for that deduplication.
pub fn biggest_rect_all(
    points: &[GridPoint],
    start: GridPoint,
    min_width: i32,
    min_height: i32,
) -> Vec<GridRect> {
    let mut output = Vec::new();
    let point_set: HashSet<GridPoint> = points.iter().copied().collect();

    // No rectangle can contain a start cell that is not occupied.
    if !point_set.contains(&start) {
        return output;
    }

    // Group cells into per-row spans.
    let mut spans: HashMap<i32, Span> = HashMap::new();
    for p in &point_set {
        spans.entry(p.y).or_insert_with(Span::new).insert(p.x);
    }
    let span_count = spans.len() as i32;

    let (start_x_min, start_x_max) = {
        let Some(span) = spans.get_mut(&start.y) else {
            return output;
        };
        span.identify_limits(start.x);
        if span.width() < min_width {
            // The start row alone cannot satisfy the width requirement.
            return output;
        }
        (span.x_min, span.x_max)
    };

    // Walk away from the start row in both directions while each row stays
    // connected along the anchor column, clamping every connected row to
    // the start span's range. Expansion in a direction ends at the first
    // missing or disconnected row.
    let mut span_y_min = start.y;
    let mut span_y_max = start.y;
    let mut grow_up = true;
    let mut grow_down = true;
    for i in 1..span_count.max(1) {
        if grow_up {
            grow_up = match spans.get_mut(&(start.y + i)) {
                Some(span) => {
                    if span.identify_limits(start.x) {
                        span.clamp_to(start_x_min, start_x_max);
                        span_y_max = start.y + i;
                        true
                    } else {
                        false
                    }
                }
                None => false,
            };
        }
        if grow_down {
            grow_down = match spans.get_mut(&(start.y - i)) {
                Some(span) => {
                    if span.identify_limits(start.x) {
                        span.clamp_to(start_x_min, start_x_max);
                        span_y_min = start.y - i;
                        true
                    } else {
                        false
                    }
                }
                None => false,
            };
        }
        if !grow_up && !grow_down {
            break;
        }
    }

    if span_y_max - span_y_min + 1 < min_height {
        return output;
    }

    // Enumerate candidates: every (left, right) pair inside the start
    // span's range that brackets the start column, grown as far vertically
    // as every row still covers the pair. Candidates are visited widest
    // first for any vertical bounds, so the first rectangle recorded for a
    // bounds pair contains every later candidate with the same bounds.
    let mut seen_bounds: HashSet<(i32, i32)> = HashSet::new();
    for rect_x_min in start_x_min..=start.x {
        for rect_x_max in (start.x..=start_x_max).rev() {
            if rect_x_max - rect_x_min + 1 < min_width {
                continue;
            }

            let mut rect_y_min = start.y;
            let mut rect_y_max = start.y;
            grow_up = true;
            grow_down = true;
            for i in 1..span_count.max(1) {
                if grow_up {
                    let y = start.y + i;
                    if y <= span_y_max
                        && spans.get(&y).is_some_and(|s| s.covers(rect_x_min, rect_x_max))
                    {
                        rect_y_max = y;
                    } else {
                        grow_up = false;
                    }
                }
                if grow_down {
                    let y = start.y - i;
                    if y >= span_y_min
                        && spans.get(&y).is_some_and(|s| s.covers(rect_x_min, rect_x_max))
                    {
                        rect_y_min = y;
                    } else {
                        grow_down = false;
                    }
                }
                if !grow_up && !grow_down {
                    break;
                }
            }

            // A narrower candidate with already-recorded vertical bounds
            // cannot be maximal.
            if seen_bounds.contains(&(rect_y_min, rect_y_max)) {
                continue;
            }

            if rect_y_max - rect_y_min + 1 >= min_height {
                output.push(GridRect::from_bounds(
                    rect_x_min, rect_y_min, rect_x_max, rect_y_max,
                ));
                seen_bounds.insert((rect_y_min, rect_y_max));
            }
        }
    }

    output
}

/// Find the best rectangle of contiguous occupied cells containing
/// `start`, judged by `pref`.
///
/// All rectangles tying for the best metric value are collected and one
/// is chosen uniformly at random. With `deterministic_ties` the choice is
/// seeded from a hash of `start`, so repeated calls with the same start
/// cell pick the same rectangle. Returns `None` when no rectangle meets
/// the minimums.
pub fn biggest_rect(
    points: &[GridPoint],
    start: GridPoint,
    pref: RectPreference,
    min_width: i32,
    min_height: i32,
    deterministic_ties: bool,
) -> Option<GridRect> {
    let all = biggest_rect_all(points, start, min_width, min_height);
    if all.is_empty() {
        return None;
    }

    let metric = |r: &GridRect| -> i64 {
        match pref {
            RectPreference::Widest => r.width as i64,
            RectPreference::Tallest => r.height as i64,
            RectPreference::Largest => r.area(),
        }
    };

    let best = all.iter().map(metric).max()?;
    let ties: Vec<GridRect> = all.into_iter().filter(|r| metric(r) == best).collect();
    if ties.len() == 1 {
        return Some(ties[0]);
    }

    let pick = if deterministic_ties {
        let mut hasher = DefaultHasher::new();
        start.hash(&mut hasher);
        StdRng::seed_from_u64(hasher.finish()).random_range(0..ties.len())
    } else {
        rand::rng().random_range(0..ties.len())
    };
    Some(ties[pick])
}
