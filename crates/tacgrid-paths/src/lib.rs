//! Node-graph pathfinding for grid-based games.
//!
//! This crate implements policy-driven navigation over an explicit node
//! graph:
//!
//! - **A\*** point-to-point search ([`NavGraph::pathfind`]) with
//!   pluggable blocking policies — avoid obstacles, ignore them, or
//!   divert through movable pawns when the clear route is too long
//! - **Flood fill** reachability within a cost ceiling
//!   ([`NavGraph::pathfind_all`])
//! - **Widowed-node detection** for graphs split by destroyed nodes
//!   ([`NavGraph::find_widowed_nodes`])
//! - **Mid-edge blocking** against the embedding environment
//!   ([`NavGraph::path_blocked`])
//!
//! All operations run through [`NavGraph`], which owns the node arena
//! and reuses its per-search state so that repeated queries only pay
//! for the nodes they touch.
//!
//! Searches are parameterised by a [`NavProfile`] (arbitration, block
//! handling, cost ceiling) and a [`BlockRules`] strategy that classifies
//! node occupancy per query.

mod astar;
mod distance;
mod edge;
mod flood;
mod graph;
mod node;
mod profile;

pub use distance::{NavMode, distance};
pub use edge::{EdgeOracle, NoBarriers};
pub use graph::{LinearLocator, NavConfig, NavGraph, NodeLocator};
pub use node::NodeId;
pub use profile::{
    AlwaysClear, BlockHandling, BlockRules, BlockType, MaskRules, NavArb, NavProfile,
};
