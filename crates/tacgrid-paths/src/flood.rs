//! Flood-fill reachability: every node reachable from an origin within
//! a cost ceiling, plus widowed-node detection built on top of it.

use std::collections::{HashSet, VecDeque};

use tacgrid_core::Point3;

use crate::graph::NavGraph;
use crate::node::{NodeId, NodeStatus};
use crate::profile::{BlockHandling, BlockRules, BlockType, NavProfile};

/// Upper bound on dequeues without discovering a new node. A healthy
/// fill discovers steadily; spinning past this without progress means
/// the adjacency lists are degenerate.
const FLOOD_STALL_CAP: u32 = 10_000;

impl NavGraph {
    /// Every node reachable from `origin` within the profile's cost
    /// ceiling, origin first.
    ///
    /// Distances accumulate along edges rather than as the crow flies,
    /// and a node reached again by a strictly shorter route is expanded
    /// again, so the fill never under-reports the frontier.
    /// Destination-only nodes are included but not expanded through.
    /// The origin is always part of the result.
    pub fn pathfind_all<R: BlockRules>(
        &mut self,
        origin: NodeId,
        profile: &NavProfile<R>,
    ) -> Vec<NodeId> {
        if !self.contains(origin) {
            return Vec::new();
        }
        let dist_max = self.resolve_max(profile.max);
        self.clean_nodes();
        let state = &mut self.states[origin.0];
        state.status = NodeStatus::Start;
        state.distance = 0.0;
        self.dirty.push(origin);

        let mut result = vec![origin];
        let mut queue = VecDeque::from([origin]);
        let mut stalled = 0u32;
        while let Some(current) = queue.pop_front() {
            stalled += 1;
            if stalled > FLOOD_STALL_CAP {
                log::warn!("flood fill from {origin} stalled; dropping the remaining frontier");
                break;
            }
            let base = self.states[current.0].distance;
            let mut nbuf = std::mem::take(&mut self.nbuf);
            nbuf.clear();
            nbuf.extend_from_slice(self.connections(current));
            for &next in &nbuf {
                let dist = base + self.node_distance(current, next);
                if dist_max > 0.0 && dist > dist_max {
                    continue;
                }
                match self.states[next.0].status {
                    NodeStatus::Clean => {
                        self.dirty.push(next);
                        if profile.block != BlockHandling::Ignore
                            && profile.rules.check_blocked(self, next) != BlockType::Clear
                        {
                            self.states[next.0].status = NodeStatus::Calculated;
                            continue;
                        }
                        let state = &mut self.states[next.0];
                        state.status = NodeStatus::Initial;
                        state.distance = dist;
                        state.prev = Some(current);
                        result.push(next);
                        stalled = 0;
                        if self.nodes[next.0].passable {
                            queue.push_back(next);
                        }
                    }
                    NodeStatus::Initial => {
                        let state = &mut self.states[next.0];
                        if dist < state.distance {
                            state.distance = dist;
                            state.prev = Some(current);
                            // A shorter route still never expands through
                            // a destination-only node.
                            if self.nodes[next.0].passable {
                                queue.push_back(next);
                            }
                        }
                    }
                    NodeStatus::Start | NodeStatus::Calculated => {}
                }
            }
            self.nbuf = nbuf;
        }
        result
    }

    /// [`pathfind_all`](Self::pathfind_all) by position; empty when no
    /// node sits at `origin`.
    pub fn pathfind_all_at<R: BlockRules>(
        &mut self,
        origin: Point3,
        profile: &NavProfile<R>,
    ) -> Vec<NodeId> {
        match self.node_at(origin) {
            Some(id) => self.pathfind_all(id, profile),
            None => Vec::new(),
        }
    }

    /// [`pathfind_all`](Self::pathfind_all), returning node positions.
    pub fn pathfind_all_positions<R: BlockRules>(
        &mut self,
        origin: NodeId,
        profile: &NavProfile<R>,
    ) -> Vec<Point3> {
        self.pathfind_all(origin, profile)
            .into_iter()
            .filter_map(|id| self.position(id))
            .collect()
    }

    /// Live nodes with no connection chain to `origin`, ignoring
    /// passability and block rules. These typically appear after
    /// destroying nodes splits the graph.
    pub fn find_widowed_nodes(&self, origin: NodeId) -> Vec<NodeId> {
        if !self.contains(origin) {
            return Vec::new();
        }
        let mut seen: HashSet<NodeId> = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        while let Some(current) = queue.pop_front() {
            for &next in self.connections(current) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        self.node_ids().filter(|id| !seen.contains(id)).collect()
    }

    /// [`find_widowed_nodes`](Self::find_widowed_nodes), destroying the
    /// widowed nodes. Returns where they were, so callers can clean up
    /// whatever the nodes represented.
    pub fn find_widowed_nodes_destroy(&mut self, origin: NodeId) -> Vec<Point3> {
        let widowed = self.find_widowed_nodes(origin);
        let mut positions = Vec::with_capacity(widowed.len());
        for id in widowed {
            if let Some(pos) = self.position(id) {
                positions.push(pos);
            }
            self.destroy_node(id);
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use tacgrid_core::Point3;

    use crate::graph::NavGraph;
    use crate::node::NodeId;
    use crate::profile::{BlockHandling, BlockRules, BlockType, NavArb, NavProfile};

    struct PawnsAt(Vec<NodeId>);

    impl BlockRules for PawnsAt {
        fn check_blocked(&self, _graph: &NavGraph, node: NodeId) -> BlockType {
            if self.0.contains(&node) {
                BlockType::Pawn
            } else {
                BlockType::Clear
            }
        }
    }

    fn chain(n: usize) -> (NavGraph, Vec<NodeId>) {
        let mut graph = NavGraph::default();
        let positions: Vec<Point3> = (0..n).map(|i| Point3::new_2d(i as f32, 0.0)).collect();
        let ids = graph.add_nodes(&positions);
        graph.build_connections(1.1);
        (graph, ids)
    }

    fn profile_max(max: f32) -> NavProfile {
        NavProfile::new(NavArb::Simple, BlockHandling::Avoid, max, -1.0)
    }

    #[test]
    fn fill_respects_the_cost_ceiling() {
        let (mut graph, ids) = chain(4);
        let reached = graph.pathfind_all(ids[0], &profile_max(1.0));
        assert_eq!(reached, vec![ids[0], ids[1]]);
    }

    #[test]
    fn origin_is_always_included() {
        let (mut graph, ids) = chain(3);
        let reached = graph.pathfind_all(ids[0], &profile_max(0.5));
        assert_eq!(reached, vec![ids[0]]);
    }

    #[test]
    fn zero_max_floods_everything() {
        let (mut graph, ids) = chain(40);
        graph.config_mut().path_find_max = 3.0;
        let reached = graph.pathfind_all(ids[0], &profile_max(0.0));
        assert_eq!(reached.len(), 40);
    }

    #[test]
    fn pawns_bound_the_fill() {
        let (mut graph, ids) = chain(4);
        let profile = NavProfile::with_rules(
            NavArb::Simple,
            BlockHandling::Avoid,
            0.0,
            -1.0,
            PawnsAt(vec![ids[1]]),
        );
        let reached = graph.pathfind_all(ids[0], &profile);
        assert_eq!(reached, vec![ids[0]]);
    }

    #[test]
    fn ignore_floods_through_pawns() {
        let (mut graph, ids) = chain(4);
        let profile = NavProfile::with_rules(
            NavArb::Simple,
            BlockHandling::Ignore,
            0.0,
            -1.0,
            PawnsAt(vec![ids[1]]),
        );
        let reached = graph.pathfind_all(ids[0], &profile);
        assert_eq!(reached.len(), 4);
    }

    #[test]
    fn destination_only_nodes_join_but_do_not_extend_the_fill() {
        let (mut graph, ids) = chain(3);
        graph.set_passable(ids[1], false);
        let reached = graph.pathfind_all(ids[0], &profile_max(0.0));
        assert_eq!(reached, vec![ids[0], ids[1]]);
    }

    // A long and a short route to the same junction, arranged so the
    // junction is expanded before the short route arrives. The far node
    // is only in range through the short route, so it must be picked up
    // by the re-expansion.
    #[test]
    fn shorter_late_arrival_re_expands_the_node() {
        let mut graph = NavGraph::default();
        let a = graph.add_node(Point3::new_2d(0.0, 0.0));
        let c = graph.add_node(Point3::new_2d(0.0, 6.0));
        let d = graph.add_node(Point3::new_2d(4.0, 5.0));
        let e = graph.add_node(Point3::new_2d(5.5, 5.0));
        let b1 = graph.add_node(Point3::new_2d(1.0, 0.0));
        let b2 = graph.add_node(Point3::new_2d(3.0, 0.0));
        graph.connect(a, c);
        graph.connect(a, b1);
        graph.connect(b1, b2);
        graph.connect(b2, d);
        graph.connect(c, d);
        graph.connect(d, e);
        let reached = graph.pathfind_all(a, &profile_max(12.0));
        assert!(reached.contains(&e));
        assert_eq!(reached.len(), 6);
    }

    // Same long-then-short arrangement, but the junction is a
    // destination-only node: the shorter second arrival must update its
    // distance without expanding through it.
    #[test]
    fn shorter_rereach_of_destination_only_node_does_not_expand() {
        let mut graph = NavGraph::default();
        let a = graph.add_node(Point3::new_2d(0.0, 0.0));
        let c = graph.add_node(Point3::new_2d(0.0, 6.0));
        let x = graph.add_node(Point3::new_2d(4.0, 5.0));
        let z = graph.add_node(Point3::new_2d(5.0, 5.0));
        let b1 = graph.add_node(Point3::new_2d(1.0, 0.0));
        let b2 = graph.add_node(Point3::new_2d(3.0, 0.0));
        graph.connect(a, c);
        graph.connect(a, b1);
        graph.connect(b1, b2);
        graph.connect(b2, x);
        graph.connect(c, x);
        graph.connect(x, z);
        graph.set_passable(x, false);
        let reached = graph.pathfind_all(a, &profile_max(0.0));
        assert!(reached.contains(&x));
        assert!(!reached.contains(&z), "fill expanded through {x}");
        assert_eq!(graph.path_distance(x), 9.0);
    }

    #[test]
    fn fill_by_position_and_as_positions() {
        let (mut graph, ids) = chain(3);
        let at = graph.pathfind_all_at(Point3::new_2d(0.0, 0.0), &profile_max(1.0));
        assert_eq!(at, vec![ids[0], ids[1]]);
        assert!(
            graph
                .pathfind_all_at(Point3::new_2d(0.5, 0.0), &profile_max(1.0))
                .is_empty()
        );
        let positions = graph.pathfind_all_positions(ids[0], &profile_max(1.0));
        assert_eq!(
            positions,
            vec![Point3::new_2d(0.0, 0.0), Point3::new_2d(1.0, 0.0)]
        );
    }

    #[test]
    fn widowed_nodes_are_the_unreachable_ones() {
        let (mut graph, ids) = chain(5);
        graph.destroy_node(ids[2]);
        let mut widowed = graph.find_widowed_nodes(ids[0]);
        widowed.sort();
        assert_eq!(widowed, vec![ids[3], ids[4]]);
    }

    #[test]
    fn widowed_detection_ignores_passability() {
        let (mut graph, ids) = chain(3);
        graph.set_passable(ids[1], false);
        assert!(graph.find_widowed_nodes(ids[0]).is_empty());
    }

    #[test]
    fn destroying_widows_prunes_the_graph() {
        let (mut graph, ids) = chain(5);
        graph.destroy_node(ids[2]);
        let removed = graph.find_widowed_nodes_destroy(ids[0]);
        assert_eq!(
            removed,
            vec![Point3::new_2d(3.0, 0.0), Point3::new_2d(4.0, 0.0)]
        );
        assert_eq!(graph.len(), 2);
        assert!(!graph.contains(ids[4]));
    }

    #[test]
    fn fill_distances_accumulate_along_edges() {
        let (mut graph, ids) = chain(4);
        graph.pathfind_all(ids[0], &profile_max(0.0));
        for (i, &id) in ids.iter().enumerate() {
            assert_eq!(graph.path_distance(id), i as f32);
        }
    }

    // The straight-line metric never exceeds the route distance, so an
    // A* heuristic built on it cannot overestimate.
    #[test]
    fn straight_line_lower_bounds_fill_distances() {
        let (mut graph, ids) = chain(6);
        graph.connect(ids[0], ids[3]);
        let reached = graph.pathfind_all(ids[0], &profile_max(0.0));
        for id in reached {
            assert!(graph.node_distance(ids[0], id) <= graph.path_distance(id) + 1e-4);
        }
    }
}
