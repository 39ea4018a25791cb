//! Search configuration: blocking policies, tie-break arbitration, and the
//! pluggable block-rules strategy.

use crate::graph::NavGraph;
use crate::node::NodeId;

/// Classification of whatever occupies a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockType {
    /// Passable right now.
    #[default]
    Clear,
    /// Occupied by an obstacle that might move (e.g. a friendly unit).
    /// Whether a path may go through it depends on the blocking policy.
    Pawn,
    /// Permanently impassable.
    Block,
}

/// How a search treats blocked nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockHandling {
    /// Path around obstacles, but accept a path through pawns when the
    /// clear route would be too much of a detour.
    Divert,
    /// Ignore all obstacles and find the plain shortest route.
    Ignore,
    /// Never return a path through a pawn or block.
    #[default]
    Avoid,
}

/// Tie-break arbitration, applied when open nodes tie on both F and H
/// cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavArb {
    /// Keep the first node found. Stable, but depends on the graph's
    /// node-insertion order.
    #[default]
    Simple,
    /// Coin-flip at each conflict.
    Random,
    /// Prefer the candidate closer to the target along the axis with the
    /// greatest remaining offset. Falls back to first-found on an exact
    /// tie, to stay deterministic.
    Direct,
}

/// Pluggable blocked/cost queries consulted for every node a search
/// considers.
///
/// The defaults treat every node as clear at unit cost; implementations
/// override either method to model occupancy and terrain.
pub trait BlockRules {
    /// Classify whatever occupies `node`.
    fn check_blocked(&self, graph: &NavGraph, node: NodeId) -> BlockType {
        let _ = (graph, node);
        BlockType::Clear
    }

    /// Cost multiplier for moving into `node`. Usable for difficult
    /// terrain; must be >= 1 to keep the heuristic admissible.
    fn move_cost(&self, graph: &NavGraph, node: NodeId) -> f32 {
        let _ = (graph, node);
        1.0
    }
}

/// The default rules: every node is clear at unit cost.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlwaysClear;

impl BlockRules for AlwaysClear {}

/// Layer-mask rules: a node whose layer bits intersect `avoid_mask` is a
/// permanent block.
#[derive(Copy, Clone, Debug, Default)]
pub struct MaskRules {
    pub avoid_mask: u32,
}

impl MaskRules {
    /// Create mask rules avoiding the given layer bits.
    pub fn new(avoid_mask: u32) -> Self {
        Self { avoid_mask }
    }
}

impl BlockRules for MaskRules {
    fn check_blocked(&self, graph: &NavGraph, node: NodeId) -> BlockType {
        match graph.layer(node) {
            Some(layer) if layer & self.avoid_mask != 0 => BlockType::Block,
            _ => BlockType::Clear,
        }
    }
}

/// Immutable-per-search configuration bundle.
///
/// `max` bounds the total path cost: negative means use the graph's
/// default limit, zero means unbounded, positive is the limit itself.
/// `divert_mult_override`, when positive, scales the graph's divert
/// multiplier for this search only.
#[derive(Copy, Clone, Debug)]
pub struct NavProfile<R = AlwaysClear> {
    pub arb: NavArb,
    pub block: BlockHandling,
    pub max: f32,
    pub divert_mult_override: f32,
    pub rules: R,
}

impl NavProfile<AlwaysClear> {
    /// Profile with the default always-clear rules.
    pub fn new(arb: NavArb, block: BlockHandling, max: f32, divert_mult_override: f32) -> Self {
        Self {
            arb,
            block,
            max,
            divert_mult_override,
            rules: AlwaysClear,
        }
    }
}

impl<R: BlockRules> NavProfile<R> {
    /// Profile with a custom block-rules strategy.
    pub fn with_rules(
        arb: NavArb,
        block: BlockHandling,
        max: f32,
        divert_mult_override: f32,
        rules: R,
    ) -> Self {
        Self {
            arb,
            block,
            max,
            divert_mult_override,
            rules,
        }
    }
}

impl Default for NavProfile<AlwaysClear> {
    fn default() -> Self {
        Self::new(NavArb::Simple, BlockHandling::Avoid, -1.0, -1.0)
    }
}
