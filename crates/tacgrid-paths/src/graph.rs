//! The [`NavGraph`] — owning context for the node arena, per-search state
//! table, and dirty-list cleanup.

use tacgrid_core::Point3;

use crate::distance::{NavMode, distance};
use crate::node::{NavNode, NodeId, SearchState};

/// Positions closer than this are treated as the same node location.
const POS_EPSILON: f32 = 1e-3;

/// Graph-wide navigation settings and divert tuning.
///
/// The divert constants are gameplay-tuned: `divert_mult` and
/// `divert_flat` bound how much longer a clear route may be before a
/// search accepts a route through pawns, and `divert_pawn_weight` is the
/// cost multiplier for stepping onto a pawn in the through-pawn pass.
/// `path_find_max` is the default path-cost ceiling used when a profile
/// does not set its own.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    pub mode: NavMode,
    pub divert_pawn_weight: f32,
    pub divert_mult: f32,
    pub divert_flat: f32,
    pub path_find_max: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            mode: NavMode::Ortho2D,
            divert_pawn_weight: 4.0,
            divert_mult: 4.0,
            divert_flat: 4.0,
            path_find_max: 20.0,
        }
    }
}

impl NavConfig {
    /// Default tuning with the given navigation mode.
    pub fn with_mode(mode: NavMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

/// Spatial proximity query used to build node adjacency.
///
/// `build_connections` asks this once per node; swap in a spatial index
/// when linear scans get too slow for the graph at hand.
pub trait NodeLocator {
    /// Append every node within `radius` of `pos` to `out`. The caller
    /// clears `out` first and removes the queried node itself.
    fn nodes_within(&self, graph: &NavGraph, pos: Point3, radius: f32, out: &mut Vec<NodeId>);
}

/// Default locator: a linear scan over the arena.
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearLocator;

impl NodeLocator for LinearLocator {
    fn nodes_within(&self, graph: &NavGraph, pos: Point3, radius: f32, out: &mut Vec<NodeId>) {
        for id in graph.node_ids() {
            if let Some(p) = graph.position(id) {
                if (p - pos).magnitude() <= radius {
                    out.push(id);
                }
            }
        }
    }
}

/// Owning context for a navigation graph.
///
/// All pathfinding operations run against an explicit `NavGraph`; there
/// is no process-wide instance. Nodes live in an arena indexed by
/// [`NodeId`], and per-search transient state lives in a parallel
/// side-table. Every node touched during a search is recorded once in a
/// dirty list, so resetting between searches costs O(touched) rather
/// than O(all nodes).
pub struct NavGraph {
    pub(crate) config: NavConfig,
    pub(crate) nodes: Vec<NavNode>,
    pub(crate) states: Vec<SearchState>,
    pub(crate) dirty: Vec<NodeId>,
    // Scratch buffer for neighbor iteration during searches.
    pub(crate) nbuf: Vec<NodeId>,
}

impl Default for NavGraph {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl NavGraph {
    /// Create an empty graph with the given settings.
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            states: Vec::new(),
            dirty: Vec::new(),
            nbuf: Vec::new(),
        }
    }

    /// The graph settings.
    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Mutable access to the graph settings.
    #[inline]
    pub fn config_mut(&mut self) -> &mut NavConfig {
        &mut self.config
    }

    // -----------------------------------------------------------------------
    // Node management
    // -----------------------------------------------------------------------

    /// Place a passable node at `pos` and return its handle.
    pub fn add_node(&mut self, pos: Point3) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NavNode::new(pos));
        self.states.push(SearchState::default());
        id
    }

    /// Place one node per position, returning the handles in order.
    pub fn add_nodes(&mut self, positions: &[Point3]) -> Vec<NodeId> {
        positions.iter().map(|&p| self.add_node(p)).collect()
    }

    /// Mark a node as destination-only (`false`) or passable (`true`).
    pub fn set_passable(&mut self, id: NodeId, passable: bool) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.passable = passable;
        }
    }

    /// Set the layer bits consulted by mask-style block rules.
    pub fn set_layer(&mut self, id: NodeId, layer: u32) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.layer = layer;
        }
    }

    /// Whether `id` refers to a live node.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.alive)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.alive).count()
    }

    /// Whether the graph has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterator over the handles of all live nodes, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.alive)
            .map(|(i, _)| NodeId(i))
    }

    /// A node's position.
    pub fn position(&self, id: NodeId) -> Option<Point3> {
        self.nodes.get(id.0).filter(|n| n.alive).map(|n| n.pos)
    }

    /// Whether a node may be pathed through (not destination-only).
    pub fn passable(&self, id: NodeId) -> Option<bool> {
        self.nodes.get(id.0).filter(|n| n.alive).map(|n| n.passable)
    }

    /// A node's layer bits.
    pub fn layer(&self, id: NodeId) -> Option<u32> {
        self.nodes.get(id.0).filter(|n| n.alive).map(|n| n.layer)
    }

    /// A node's adjacency list (empty for unknown or destroyed nodes).
    pub fn connections(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .filter(|n| n.alive)
            .map_or(&[], |n| n.connections.as_slice())
    }

    /// The general-purpose node scalar. Cleared by every search.
    pub fn node_value(&self, id: NodeId) -> f32 {
        self.states.get(id.0).map_or(0.0, |s| s.value)
    }

    /// Set the general-purpose node scalar.
    pub fn set_node_value(&mut self, id: NodeId, value: f32) {
        if let Some(state) = self.states.get_mut(id.0) {
            state.value = value;
        }
    }

    /// Accumulated route distance recorded for `id` by the most recent
    /// flood fill. Valid until the next search resets the touched nodes;
    /// untouched nodes read as 0.
    pub fn path_distance(&self, id: NodeId) -> f32 {
        self.states.get(id.0).map_or(0.0, |s| s.distance)
    }

    /// Remove a node from the graph and from every adjacency list.
    pub fn destroy_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        node.alive = false;
        node.connections.clear();
        for other in &mut self.nodes {
            other.connections.retain(|&n| n != id);
        }
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.states.clear();
        self.dirty.clear();
    }

    // -----------------------------------------------------------------------
    // Adjacency
    // -----------------------------------------------------------------------

    /// Build every node's adjacency list from scratch: each node connects
    /// to every other node within `max_radius`, with no self-loops. Call
    /// after all nodes are placed, or whenever the graph is rebuilt.
    pub fn build_connections(&mut self, max_radius: f32) {
        self.build_connections_with(&LinearLocator, max_radius);
    }

    /// [`build_connections`](Self::build_connections) with a caller-supplied
    /// proximity query.
    pub fn build_connections_with<L: NodeLocator>(&mut self, locator: &L, max_radius: f32) {
        let ids: Vec<NodeId> = self.node_ids().collect();
        for id in ids {
            let pos = self.nodes[id.0].pos;
            let mut conns = Vec::new();
            locator.nodes_within(self, pos, max_radius, &mut conns);
            conns.retain(|&n| n != id);
            self.nodes[id.0].connections = conns;
        }
    }

    /// Connect two nodes directly, both ways. Useful for hand-built
    /// graphs and irregular adjacency a radius query cannot express.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b || !self.contains(a) || !self.contains(b) {
            return;
        }
        if !self.nodes[a.0].connections.contains(&b) {
            self.nodes[a.0].connections.push(b);
        }
        if !self.nodes[b.0].connections.contains(&a) {
            self.nodes[b.0].connections.push(a);
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// The node at the given position, if any.
    pub fn node_at(&self, pos: Point3) -> Option<NodeId> {
        self.node_ids()
            .find(|&id| (self.nodes[id.0].pos - pos).magnitude() <= POS_EPSILON)
    }

    /// The node nearest to the given position, if the graph is non-empty.
    pub fn nearest_node(&self, pos: Point3) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for id in self.node_ids() {
            let dist = (self.nodes[id.0].pos - pos).magnitude();
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((id, dist));
            }
        }
        best.map(|(id, _)| id)
    }

    // -----------------------------------------------------------------------
    // Search support
    // -----------------------------------------------------------------------

    /// Distance between two nodes under the configured metric.
    pub(crate) fn node_distance(&self, a: NodeId, b: NodeId) -> f32 {
        distance(self.config.mode, self.nodes[a.0].pos, self.nodes[b.0].pos)
    }

    /// Reset the transient state of every node touched by the previous
    /// search. Runs before each new search.
    pub(crate) fn clean_nodes(&mut self) {
        for id in self.dirty.drain(..) {
            if let Some(state) = self.states.get_mut(id.0) {
                *state = SearchState::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph(n: usize) -> (NavGraph, Vec<NodeId>) {
        let mut graph = NavGraph::default();
        let positions: Vec<Point3> = (0..n).map(|i| Point3::new_2d(i as f32, 0.0)).collect();
        let ids = graph.add_nodes(&positions);
        graph.build_connections(1.1);
        (graph, ids)
    }

    #[test]
    fn build_connections_links_neighbors_only() {
        let (graph, ids) = line_graph(3);
        assert_eq!(graph.connections(ids[0]), &[ids[1]]);
        assert_eq!(graph.connections(ids[1]), &[ids[0], ids[2]]);
        assert_eq!(graph.connections(ids[2]), &[ids[1]]);
    }

    #[test]
    fn build_connections_no_self_loops() {
        let (graph, ids) = line_graph(4);
        for &id in &ids {
            assert!(!graph.connections(id).contains(&id));
        }
    }

    #[test]
    fn node_at_and_nearest() {
        let (graph, ids) = line_graph(3);
        assert_eq!(graph.node_at(Point3::new_2d(1.0, 0.0)), Some(ids[1]));
        assert_eq!(graph.node_at(Point3::new_2d(0.5, 0.0)), None);
        assert_eq!(graph.nearest_node(Point3::new_2d(1.8, 0.3)), Some(ids[2]));
        assert_eq!(NavGraph::default().nearest_node(Point3::ZERO), None);
    }

    #[test]
    fn destroy_node_unlinks_everywhere() {
        let (mut graph, ids) = line_graph(3);
        graph.destroy_node(ids[1]);
        assert!(!graph.contains(ids[1]));
        assert_eq!(graph.len(), 2);
        assert!(graph.connections(ids[0]).is_empty());
        assert!(graph.connections(ids[2]).is_empty());
        assert_eq!(graph.position(ids[1]), None);
    }

    #[test]
    fn connect_is_symmetric_and_idempotent() {
        let mut graph = NavGraph::default();
        let a = graph.add_node(Point3::ZERO);
        let b = graph.add_node(Point3::new_2d(5.0, 0.0));
        graph.connect(a, b);
        graph.connect(a, b);
        graph.connect(a, a);
        assert_eq!(graph.connections(a), &[b]);
        assert_eq!(graph.connections(b), &[a]);
    }

    #[test]
    fn node_value_round_trip() {
        let (mut graph, ids) = line_graph(2);
        graph.set_node_value(ids[0], 2.5);
        assert_eq!(graph.node_value(ids[0]), 2.5);
        assert_eq!(graph.node_value(ids[1]), 0.0);
    }

    #[test]
    fn clear_empties_graph() {
        let (mut graph, _) = line_graph(3);
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.node_ids().count(), 0);
    }
}
