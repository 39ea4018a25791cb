//! Point-to-point pathfinding over a [`NavGraph`].
//!
//! The search is A* over the node arena: an open set selected by lowest
//! F cost, H as the tie-break, and a profile-chosen arbitration rule
//! when both tie. Blocking is policy-driven — `Avoid` never crosses an
//! obstacle, `Ignore` crosses everything, and `Divert` runs two searches
//! and only routes through pawns when the clear route is too much of a
//! detour.

use tacgrid_core::Point3;

use crate::distance::NavMode;
use crate::graph::NavGraph;
use crate::node::{NodeId, NodeStatus};
use crate::profile::{BlockHandling, BlockRules, BlockType, NavProfile};

use rand::RngExt;

impl NavGraph {
    /// Find a path from `origin` to `target`.
    ///
    /// Returns the path from the target back to (but excluding) the
    /// origin, so callers pop the next step off the end. `Some(vec![])`
    /// means the origin already is the target; `None` means no
    /// acceptable path exists under the profile.
    pub fn pathfind<R: BlockRules>(
        &mut self,
        origin: NodeId,
        target: NodeId,
        profile: &NavProfile<R>,
    ) -> Option<Vec<NodeId>> {
        if !self.contains(origin) || !self.contains(target) {
            return None;
        }
        if origin == target {
            return Some(Vec::new());
        }
        let dist_max = self.resolve_max(profile.max);
        // The straight-line distance lower-bounds any path cost.
        if dist_max > 0.0 && self.node_distance(origin, target) > dist_max {
            return None;
        }
        match profile.block {
            BlockHandling::Ignore => self.search_path(origin, target, profile, 1.0, dist_max),
            BlockHandling::Avoid => self.search_path(origin, target, profile, 0.0, dist_max),
            BlockHandling::Divert => self.pathfind_divert(origin, target, profile, dist_max),
        }
    }

    /// [`pathfind`](Self::pathfind) by position: both endpoints must sit
    /// exactly on a node.
    pub fn pathfind_at<R: BlockRules>(
        &mut self,
        origin: Point3,
        target: Point3,
        profile: &NavProfile<R>,
    ) -> Option<Vec<NodeId>> {
        let origin = self.node_at(origin)?;
        let target = self.node_at(target)?;
        self.pathfind(origin, target, profile)
    }

    fn search_path<R: BlockRules>(
        &mut self,
        origin: NodeId,
        target: NodeId,
        profile: &NavProfile<R>,
        pawn_value: f32,
        dist_max: f32,
    ) -> Option<Vec<NodeId>> {
        if !self.search(origin, target, profile, pawn_value, dist_max) {
            return None;
        }
        let path = self.build_path(origin, target);
        if path.is_empty() { None } else { Some(path) }
    }

    /// Two-pass divert search: one pass around pawns, one through them
    /// at weighted cost, then pick.
    fn pathfind_divert<R: BlockRules>(
        &mut self,
        origin: NodeId,
        target: NodeId,
        profile: &NavProfile<R>,
        dist_max: f32,
    ) -> Option<Vec<NodeId>> {
        let open = self
            .search_path(origin, target, profile, 0.0, dist_max)
            .unwrap_or_default();

        // Entering a pawn costs `divert_pawn_weight` times the move, so
        // the cost ceiling is inflated by the same factor to keep a
        // within-range through-pawn route reachable.
        let weight = self.config.divert_pawn_weight;
        let through_max = if dist_max > 0.0 { dist_max * weight } else { 0.0 };
        let through = self
            .search_path(origin, target, profile, weight, through_max)
            .unwrap_or_default();

        if through.is_empty() {
            return if open.is_empty() { None } else { Some(open) };
        }
        let mut mult = self.config.divert_mult;
        if profile.divert_mult_override > 0.0 {
            mult *= profile.divert_mult_override;
        }
        let allowed =
            (mult * through.len() as f32).max(through.len() as f32 + self.config.divert_flat);
        if !open.is_empty() && open.len() as f32 <= allowed {
            return Some(open);
        }
        // The clear route is missing or too long; divert through pawns
        // if that route fits the un-inflated cost ceiling.
        if dist_max <= 0.0 || through.len() as f32 <= dist_max {
            Some(through)
        } else if open.is_empty() {
            None
        } else {
            Some(open)
        }
    }

    /// The effective cost ceiling: negative means the graph default,
    /// zero means unbounded.
    pub(crate) fn resolve_max(&self, profile_max: f32) -> f32 {
        if profile_max < 0.0 {
            self.config.path_find_max
        } else {
            profile_max
        }
    }

    /// Core A* pass. Leaves prev-links in the state table for
    /// `build_path`; returns whether the target was reached.
    pub(crate) fn search<R: BlockRules>(
        &mut self,
        origin: NodeId,
        target: NodeId,
        profile: &NavProfile<R>,
        pawn_value: f32,
        dist_max: f32,
    ) -> bool {
        self.clean_nodes();
        let h0 = self.node_distance(origin, target);
        let state = &mut self.states[origin.0];
        state.status = NodeStatus::Start;
        state.g = 0.0;
        state.h = h0;
        state.f = h0;
        self.dirty.push(origin);

        let mut current = origin;
        // Every iteration retires one node, so the arena size bounds the
        // loop; tripping the guard means the state table is corrupt.
        let guard = self.nodes.len() + 1;
        for _ in 0..guard {
            if current == target {
                return true;
            }
            let mut nbuf = std::mem::take(&mut self.nbuf);
            nbuf.clear();
            nbuf.extend_from_slice(self.connections(current));
            for &next in &nbuf {
                self.init_neighbor(next, current, target, profile, pawn_value, dist_max);
            }
            self.nbuf = nbuf;
            if self.states[current.0].status != NodeStatus::Start {
                self.states[current.0].status = NodeStatus::Calculated;
            }
            let Some(next) = self.select_open(target, profile) else {
                return false;
            };
            current = next;
        }
        log::warn!("search exceeded the expansion guard between {origin} and {target}");
        false
    }

    /// Score one neighbor the first time a search reaches it.
    fn init_neighbor<R: BlockRules>(
        &mut self,
        node: NodeId,
        from: NodeId,
        target: NodeId,
        profile: &NavProfile<R>,
        pawn_value: f32,
        dist_max: f32,
    ) {
        if self.states[node.0].status != NodeStatus::Clean {
            return;
        }
        self.dirty.push(node);
        // Destination-only nodes may end a path but never continue one.
        if node != target && !self.nodes[node.0].passable {
            self.states[node.0].status = NodeStatus::Calculated;
            return;
        }
        let mut difficulty = 1.0;
        if profile.block != BlockHandling::Ignore {
            match profile.rules.check_blocked(self, node) {
                BlockType::Block => {
                    self.states[node.0].status = NodeStatus::Calculated;
                    return;
                }
                BlockType::Pawn => {
                    if pawn_value <= 0.0 {
                        self.states[node.0].status = NodeStatus::Calculated;
                        return;
                    }
                    difficulty = profile.rules.move_cost(self, node) * pawn_value;
                }
                BlockType::Clear => difficulty = profile.rules.move_cost(self, node),
            }
        }
        let g = self.states[from.0].g + self.node_distance(from, node) * difficulty;
        let h = self.node_distance(node, target);
        let f = g + h;
        if dist_max > 0.0 && f > dist_max {
            self.states[node.0].status = NodeStatus::Calculated;
            return;
        }
        let state = &mut self.states[node.0];
        state.status = NodeStatus::Initial;
        state.g = g;
        state.h = h;
        state.f = f;
        state.prev = Some(from);
    }

    /// Pick the open node with the lowest F, breaking F ties by H and
    /// full ties by the profile's arbitration rule.
    fn select_open<R: BlockRules>(&self, target: NodeId, profile: &NavProfile<R>) -> Option<NodeId> {
        use crate::profile::NavArb;

        let mut best: Option<NodeId> = None;
        for i in 0..self.nodes.len() {
            if self.states[i].status != NodeStatus::Initial {
                continue;
            }
            let id = NodeId(i);
            let Some(b) = best else {
                best = Some(id);
                continue;
            };
            let bs = self.states[b.0];
            let s = self.states[i];
            if s.f < bs.f {
                best = Some(id);
                continue;
            }
            if s.f > bs.f {
                continue;
            }
            if s.h < bs.h {
                best = Some(id);
                continue;
            }
            if s.h > bs.h {
                continue;
            }
            let take = match profile.arb {
                NavArb::Simple => false,
                NavArb::Random => rand::rng().random_bool(0.5),
                NavArb::Direct => self.direct_tiebreak(b, id, target),
            };
            if take {
                best = Some(id);
            }
        }
        best
    }

    /// Whether `cand` beats `best` under Direct arbitration: closer to
    /// the target along the axis with the greatest remaining offset.
    fn direct_tiebreak(&self, best: NodeId, cand: NodeId, target: NodeId) -> bool {
        let tpos = self.nodes[target.0].pos;
        let cur = tpos - self.nodes[best.0].pos;
        let off = tpos - self.nodes[cand.0].pos;
        let three_d = self.config.mode == NavMode::Free3D;
        if cur.x.abs() > cur.y.abs() {
            if three_d && cur.x.abs() <= cur.z.abs() {
                off.z.abs() < cur.z.abs()
            } else {
                off.x.abs() < cur.x.abs()
            }
        } else if three_d && cur.y.abs() <= cur.z.abs() {
            off.z.abs() < cur.z.abs()
        } else {
            off.y.abs() < cur.y.abs()
        }
    }

    /// Walk the prev-links from the target back to the origin. Any
    /// inconsistency yields an empty path rather than a bogus one.
    fn build_path(&self, origin: NodeId, target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = target;
        while current != origin {
            path.push(current);
            let Some(prev) = self.states[current.0].prev else {
                log::error!("path chain from {target} broke at {current}");
                return Vec::new();
            };
            if prev == current || !self.connections(prev).contains(&current) {
                log::error!("path chain from {target} has a bad link {prev} -> {current}");
                return Vec::new();
            }
            if path.len() > self.nodes.len() {
                log::error!("path chain from {target} exceeds the node count");
                return Vec::new();
            }
            current = prev;
        }
        path
    }
}
