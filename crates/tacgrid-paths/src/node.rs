//! Node storage: handles, node records, and per-search transient state.

use std::fmt;

use tacgrid_core::Point3;

/// Stable handle to a node in a [`NavGraph`](crate::NavGraph) arena.
///
/// Handles stay valid across searches and node destruction (destroyed
/// slots are never reused).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The arena index behind this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One traversable location in the graph.
pub(crate) struct NavNode {
    pub(crate) pos: Point3,
    /// Destination-only nodes never let a path pass through them.
    pub(crate) passable: bool,
    /// Layer bits consulted by mask-style block rules.
    pub(crate) layer: u32,
    pub(crate) connections: Vec<NodeId>,
    pub(crate) alive: bool,
}

impl NavNode {
    pub(crate) fn new(pos: Point3) -> Self {
        Self {
            pos,
            passable: true,
            layer: 0,
            connections: Vec::new(),
            alive: true,
        }
    }
}

/// Per-search lifecycle of a node. A node only moves forward through
/// these states within one search pass; `clean_nodes` resets it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum NodeStatus {
    /// Not yet touched by the current search.
    #[default]
    Clean,
    /// In the open set, waiting to be expanded.
    Initial,
    /// Expanded or rejected.
    Calculated,
    /// The search origin.
    Start,
}

/// Transient search fields, kept in a side-table parallel to the node
/// arena and reset in bulk through the dirty list.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct SearchState {
    pub(crate) status: NodeStatus,
    /// Cost from the origin to this node.
    pub(crate) g: f32,
    /// Heuristic estimate to the target. Must never overestimate.
    pub(crate) h: f32,
    /// g + h, the expansion priority.
    pub(crate) f: f32,
    pub(crate) prev: Option<NodeId>,
    /// Accumulated distance for flood fills.
    pub(crate) distance: f32,
    /// General-purpose caller scalar, cleared with the rest.
    pub(crate) value: f32,
}
