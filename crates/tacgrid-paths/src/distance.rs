use tacgrid_core::{Point3, ortho_dist};

/// Navigation mode — selects the distance metric used for edge costs and
/// the A* heuristic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavMode {
    /// Orthogonal 2D movement: ceiling Manhattan distance.
    #[default]
    Ortho2D,
    /// Free 2D movement: Euclidean distance in the x/y plane.
    Free2D,
    /// Free 3D movement: Euclidean distance.
    Free3D,
}

/// Distance between two positions under the mode's metric.
#[inline]
pub fn distance(mode: NavMode, a: Point3, b: Point3) -> f32 {
    match mode {
        NavMode::Ortho2D => ortho_dist(a, b),
        NavMode::Free2D => (a - b).magnitude_2d(),
        NavMode::Free3D => (a - b).magnitude(),
    }
}
