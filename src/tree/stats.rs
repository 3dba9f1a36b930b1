//! Shape statistics for a game tree.

use serde::{Deserialize, Serialize};

use super::node::{DefenseNode, NodeKind, NodeRef, Terminal};

/// Node counts and leaf classification for a game tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub defense_nodes: usize,
    pub draw_nodes: usize,
    pub placement_nodes: usize,
    pub offense_turn_nodes: usize,
    pub action_nodes: usize,

    /// Action leaves where a unit reached the winning row.
    pub offense_wins: usize,

    /// Defense leaves where the bag ran out.
    pub defense_wins: usize,

    /// Action leaves cut off by the round limit.
    pub horizon_leaves: usize,

    /// Highest round with a defense node.
    pub max_round: u32,

    /// Largest number of children under one node.
    pub max_branching: usize,

    /// Total number of children over all nodes.
    pub total_edges: usize,
}

impl TreeStats {
    /// Walk the tree below `root`.
    #[must_use]
    pub fn collect(root: &DefenseNode) -> Self {
        let mut stats = TreeStats::default();
        let mut stack = vec![NodeRef::Defense(root)];

        while let Some(node) = stack.pop() {
            match node.kind() {
                NodeKind::Defense => stats.defense_nodes += 1,
                NodeKind::Draw => stats.draw_nodes += 1,
                NodeKind::Placement => stats.placement_nodes += 1,
                NodeKind::OffenseTurn => stats.offense_turn_nodes += 1,
                NodeKind::Action => stats.action_nodes += 1,
            }
            if let NodeRef::Defense(n) = node {
                stats.max_round = stats.max_round.max(n.round);
            }
            match node.terminal() {
                Some(Terminal::OffenseWin) => stats.offense_wins += 1,
                Some(Terminal::DefenseWin) => stats.defense_wins += 1,
                Some(Terminal::Horizon) => stats.horizon_leaves += 1,
                None => {}
            }

            let children = node.child_count();
            stats.max_branching = stats.max_branching.max(children);
            stats.total_edges += children;
            stack.extend(node.children());
        }

        stats
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.defense_nodes
            + self.draw_nodes
            + self.placement_nodes
            + self.offense_turn_nodes
            + self.action_nodes
    }

    /// Leaves of every kind.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.offense_wins + self.defense_wins + self.horizon_leaves
    }

    /// Leaves with a winner; this is what the root's `num_outcomes` counts.
    #[must_use]
    pub fn resolved_outcomes(&self) -> usize {
        self.offense_wins + self.defense_wins
    }

    /// Average children per node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let nodes = self.node_count();
        if nodes == 0 {
            0.0
        } else {
            self.total_edges as f64 / nodes as f64
        }
    }
}
