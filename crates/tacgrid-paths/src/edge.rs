//! Environment hook for mid-edge blocking.
//!
//! The graph only knows adjacency; whether the move along an edge is
//! actually clear of walls or props is the embedding application's
//! knowledge. [`EdgeOracle`] is the seam where that knowledge plugs in,
//! and [`NavGraph::path_blocked`] picks the query shape from the
//! navigation mode.

use tacgrid_core::Point3;

use crate::distance::NavMode;
use crate::graph::NavGraph;
use crate::node::NodeId;

/// Environment queries for obstacles between nodes.
pub trait EdgeOracle {
    /// Whether the environment blocks the given position.
    fn point_blocked(&self, pos: Point3) -> bool;

    /// Whether the environment blocks the straight segment from `a` to
    /// `b`. The default samples the midpoint; override with a sweep or
    /// raycast when the environment supports one.
    fn segment_blocked(&self, a: Point3, b: Point3) -> bool {
        self.point_blocked((a + b) * 0.5)
    }
}

/// An environment with no obstacles.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoBarriers;

impl EdgeOracle for NoBarriers {
    fn point_blocked(&self, _pos: Point3) -> bool {
        false
    }
}

impl NavGraph {
    /// Whether the move between two adjacent nodes is blocked by the
    /// environment. Orthogonal mode checks the cell boundary at the
    /// edge midpoint; free modes check the whole segment. Unknown or
    /// destroyed nodes count as blocked.
    pub fn path_blocked<O: EdgeOracle>(&self, a: NodeId, b: NodeId, oracle: &O) -> bool {
        let (Some(pa), Some(pb)) = (self.position(a), self.position(b)) else {
            return true;
        };
        match self.config.mode {
            NavMode::Ortho2D => oracle.point_blocked((pa + pb) * 0.5),
            NavMode::Free2D | NavMode::Free3D => oracle.segment_blocked(pa, pb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NavConfig;

    /// Blocks a single wall position.
    struct WallAt(Point3);

    impl EdgeOracle for WallAt {
        fn point_blocked(&self, pos: Point3) -> bool {
            (pos - self.0).magnitude() < 1e-3
        }
    }

    /// Blocks every segment but no single point.
    struct SolidAir;

    impl EdgeOracle for SolidAir {
        fn point_blocked(&self, _pos: Point3) -> bool {
            false
        }

        fn segment_blocked(&self, _a: Point3, _b: Point3) -> bool {
            true
        }
    }

    fn chain(mode: NavMode) -> (NavGraph, Vec<NodeId>) {
        let mut graph = NavGraph::new(NavConfig::with_mode(mode));
        let ids = graph.add_nodes(&[
            Point3::new_2d(0.0, 0.0),
            Point3::new_2d(1.0, 0.0),
            Point3::new_2d(2.0, 0.0),
        ]);
        graph.build_connections(1.1);
        (graph, ids)
    }

    #[test]
    fn ortho_checks_the_edge_midpoint() {
        let (graph, ids) = chain(NavMode::Ortho2D);
        let wall = WallAt(Point3::new_2d(1.5, 0.0));
        assert!(!graph.path_blocked(ids[0], ids[1], &wall));
        assert!(graph.path_blocked(ids[1], ids[2], &wall));
        assert!(!graph.path_blocked(ids[0], ids[1], &NoBarriers));
    }

    #[test]
    fn free_modes_check_the_segment() {
        let (graph, ids) = chain(NavMode::Free2D);
        assert!(graph.path_blocked(ids[0], ids[1], &SolidAir));
        let (ortho, _) = chain(NavMode::Ortho2D);
        assert!(!ortho.path_blocked(ids[0], ids[1], &SolidAir));
    }

    #[test]
    fn destroyed_nodes_block() {
        let (mut graph, ids) = chain(NavMode::Ortho2D);
        graph.destroy_node(ids[1]);
        assert!(graph.path_blocked(ids[0], ids[1], &NoBarriers));
    }
}
