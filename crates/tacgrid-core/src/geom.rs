//! Geometry primitives: [`Point3`], [`GridPoint`] and [`GridRect`].

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

// ---------------------------------------------------------------------------
// Point3
// ---------------------------------------------------------------------------

/// A world position. Navigation in 2D modes simply ignores `z`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new position.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a position in the z = 0 plane.
    #[inline]
    pub const fn new_2d(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean length of the vector.
    #[inline]
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean length ignoring the z component.
    #[inline]
    pub fn magnitude_2d(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Point3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Point3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Orthogonal (Manhattan) distance between two positions in the x/y plane,
/// rounded up to the next whole step.
///
/// This is the metric used for orthogonal grid movement, where any
/// fractional offset still costs a full move.
#[inline]
pub fn ortho_dist(a: Point3, b: Point3) -> f32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()).ceil()
}

/// Normalize `angle` (degrees) to the half-open interval (-180, 180]
/// relative to `relative`.
pub fn bound_angle(angle: f32, relative: f32) -> f32 {
    let mut out = angle - relative;
    if out > 180.0 {
        out = ((out + 180.0) % 360.0) - 180.0;
    }
    if out <= -180.0 {
        out = ((out - 180.0) % 360.0) + 180.0;
    }
    out
}

// ---------------------------------------------------------------------------
// GridPoint
// ---------------------------------------------------------------------------

/// A 2D integer grid coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new grid point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Manhattan (L1) distance between two grid points.
#[inline]
pub fn manhattan(a: GridPoint, b: GridPoint) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

impl PartialOrd for GridPoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GridPoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for GridPoint {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPoint {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// GridRect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle of grid cells.
///
/// `min` is the lowest-coordinate cell; `width` and `height` are cell
/// counts, so the rectangle covers `[min.x, min.x + width)` by
/// `[min.y, min.y + height)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRect {
    pub min: GridPoint,
    pub width: i32,
    pub height: i32,
}

impl GridRect {
    /// Create a rectangle from its min corner and cell counts.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            min: GridPoint::new(x, y),
            width,
            height,
        }
    }

    /// Create a rectangle from inclusive cell bounds.
    #[inline]
    pub const fn from_bounds(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            min: GridPoint::new(x_min, y_min),
            width: x_max - x_min + 1,
            height: y_max - y_min + 1,
        }
    }

    /// The last cell column covered (inclusive).
    #[inline]
    pub const fn x_max(self) -> i32 {
        self.min.x + self.width - 1
    }

    /// The last cell row covered (inclusive).
    #[inline]
    pub const fn y_max(self) -> i32 {
        self.min.y + self.height - 1
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        self.width as i64 * self.height as i64
    }

    /// Whether the rectangle covers no cells.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `p` is one of the covered cells.
    #[inline]
    pub const fn contains(self, p: GridPoint) -> bool {
        p.x >= self.min.x && p.x <= self.x_max() && p.y >= self.min.y && p.y <= self.y_max()
    }

    /// Whether every cell of `other` is also a cell of `self`.
    #[inline]
    pub const fn contains_rect(self, other: GridRect) -> bool {
        if other.is_empty() {
            return true;
        }
        other.min.x >= self.min.x
            && other.x_max() <= self.x_max()
            && other.min.y >= self.min.y
            && other.y_max() <= self.y_max()
    }

    /// Row-major iterator over every covered cell.
    #[inline]
    pub fn points(self) -> GridRectIter {
        GridRectIter {
            rect: self,
            cur: self.min,
        }
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}x{}]", self.min, self.width, self.height)
    }
}

/// Row-major iterator over the cells of a [`GridRect`].
#[derive(Clone, Debug)]
pub struct GridRectIter {
    rect: GridRect,
    cur: GridPoint,
}

impl Iterator for GridRectIter {
    type Item = GridPoint;

    #[inline]
    fn next(&mut self) -> Option<GridPoint> {
        if self.rect.is_empty() || self.cur.y > self.rect.y_max() {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x > self.rect.x_max() {
            self.cur.x = self.rect.min.x;
            self.cur.y += 1;
        }
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point3_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 6.0, 8.0);
        assert_eq!(a + b, Point3::new(5.0, 8.0, 11.0));
        assert_eq!(b - a, Point3::new(3.0, 4.0, 5.0));
        assert_eq!(a * 2.0, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn point3_magnitudes() {
        let p = Point3::new(3.0, 4.0, 12.0);
        assert_eq!(p.magnitude(), 13.0);
        assert_eq!(p.magnitude_2d(), 5.0);
    }

    #[test]
    fn ortho_dist_ceils_fractional_steps() {
        let a = Point3::new_2d(0.0, 0.0);
        let b = Point3::new_2d(1.5, 0.4);
        assert_eq!(ortho_dist(a, b), 2.0);
        assert_eq!(ortho_dist(a, Point3::new_2d(3.0, 2.0)), 5.0);
        // z never contributes.
        assert_eq!(ortho_dist(a, Point3::new(0.0, 0.0, 9.0)), 0.0);
    }

    #[test]
    fn bound_angle_wraps() {
        assert_eq!(bound_angle(190.0, 0.0), -170.0);
        assert_eq!(bound_angle(-190.0, 0.0), 170.0);
        assert_eq!(bound_angle(45.0, 0.0), 45.0);
        assert_eq!(bound_angle(0.0, 90.0), -90.0);
        assert_eq!(bound_angle(180.0, 0.0), 180.0);
    }

    #[test]
    fn grid_point_ordering_row_major() {
        let mut pts = vec![
            GridPoint::new(1, 1),
            GridPoint::new(0, 2),
            GridPoint::new(2, 0),
        ];
        pts.sort();
        assert_eq!(
            pts,
            vec![
                GridPoint::new(2, 0),
                GridPoint::new(1, 1),
                GridPoint::new(0, 2),
            ]
        );
    }

    #[test]
    fn manhattan_dist() {
        assert_eq!(manhattan(GridPoint::new(0, 0), GridPoint::new(3, 4)), 7);
        assert_eq!(manhattan(GridPoint::new(-2, 1), GridPoint::new(2, -1)), 6);
    }

    #[test]
    fn rect_bounds_and_area() {
        let r = GridRect::from_bounds(1, 2, 4, 3);
        assert_eq!(r, GridRect::new(1, 2, 4, 2));
        assert_eq!(r.x_max(), 4);
        assert_eq!(r.y_max(), 3);
        assert_eq!(r.area(), 8);
        assert!(!r.is_empty());
    }

    #[test]
    fn rect_contains() {
        let r = GridRect::new(0, 0, 3, 2);
        assert!(r.contains(GridPoint::new(0, 0)));
        assert!(r.contains(GridPoint::new(2, 1)));
        assert!(!r.contains(GridPoint::new(3, 0)));
        assert!(!r.contains(GridPoint::new(0, 2)));
    }

    #[test]
    fn rect_contains_rect() {
        let outer = GridRect::new(0, 0, 5, 5);
        let inner = GridRect::new(1, 1, 2, 2);
        assert!(outer.contains_rect(inner));
        assert!(!inner.contains_rect(outer));
        assert!(outer.contains_rect(outer));
        // Empty rectangles are inside everything.
        assert!(inner.contains_rect(GridRect::new(9, 9, 0, 0)));
    }

    #[test]
    fn rect_points_row_major() {
        let r = GridRect::new(1, 1, 3, 2);
        let pts: Vec<_> = r.points().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], GridPoint::new(1, 1));
        assert_eq!(pts[2], GridPoint::new(3, 1));
        assert_eq!(pts[5], GridPoint::new(3, 2));
    }

    #[test]
    fn empty_rect_points() {
        assert_eq!(GridRect::new(0, 0, 0, 3).points().count(), 0);
        assert_eq!(GridRect::default().points().count(), 0);
    }
}
