//! Backward induction over a built tree.
//!
//! A single post-order pass fills `can_offense_win` and `num_outcomes` on
//! every node:
//!
//! | node            | value                                                   |
//! |-----------------|---------------------------------------------------------|
//! | ActionNode      | offense win: (true, 1); else its next round; horizon: (false, 0) |
//! | OffenseTurnNode | OR / sum over action children                           |
//! | PlacementNode   | its offense turn                                        |
//! | DrawNode        | OR / sum over placements                                |
//! | DefenseNode     | bag exhausted: (false, 1); else OR / sum over draws     |
//!
//! Every node is visited. A node whose two fields are already populated keeps
//! them and reports the stored value to its parent; only missing fields are
//! filled. Re-running on an annotated tree (including one loaded from disk)
//! is therefore a no-op, and a partially annotated tree is completed.

use super::node::{Annotated, DefenseNode, NodeMut, Outcome};

/// Counters from one annotation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Nodes whose outcome was computed in this pass.
    pub computed: usize,

    /// Nodes whose stored outcome was reused.
    pub cached: usize,
}

/// Annotate every node below (and including) `root`.
pub fn annotate(root: &mut DefenseNode) -> (Outcome, AnnotateStats) {
    let mut stats = AnnotateStats::default();
    let outcome = visit(NodeMut::Defense(root), &mut stats);
    log::debug!(
        "annotated tree: {} nodes computed, {} cached; can_offense_win={} num_outcomes={}",
        stats.computed,
        stats.cached,
        outcome.can_offense_win,
        outcome.num_outcomes
    );
    (outcome, stats)
}

/// Remove all annotations below (and including) `root`.
pub fn clear_annotations(root: &mut DefenseNode) {
    clear(NodeMut::Defense(root));
}

fn visit(node: NodeMut<'_>, stats: &mut AnnotateStats) -> Outcome {
    let stored = node.view().outcome();

    match node {
        NodeMut::Defense(n) => {
            let outcome = if n.is_defense_win() {
                Outcome::DEFENSE_WIN
            } else {
                n.draws
                    .iter_mut()
                    .map(|d| visit(NodeMut::Draw(d), stats))
                    .sum()
            };
            resolve(n, stored, outcome, stats)
        }
        NodeMut::Draw(n) => {
            let outcome = n
                .placements
                .iter_mut()
                .map(|p| visit(NodeMut::Placement(p), stats))
                .sum();
            resolve(n, stored, outcome, stats)
        }
        NodeMut::Placement(n) => {
            let outcome = visit(NodeMut::OffenseTurn(&mut n.offense_turn), stats);
            resolve(n, stored, outcome, stats)
        }
        NodeMut::OffenseTurn(n) => {
            let outcome = n
                .actions
                .iter_mut()
                .map(|a| visit(NodeMut::Action(a), stats))
                .sum();
            resolve(n, stored, outcome, stats)
        }
        NodeMut::Action(n) => {
            let outcome = if n.is_offense_win() {
                Outcome::OFFENSE_WIN
            } else {
                match n.next_round.as_deref_mut() {
                    Some(next) => visit(NodeMut::Defense(next), stats),
                    None => Outcome::UNRESOLVED,
                }
            };
            resolve(n, stored, outcome, stats)
        }
    }
}

// A stored outcome wins over the one derived from the children.
fn resolve<N: Annotated>(
    node: &mut N,
    stored: Option<Outcome>,
    derived: Outcome,
    stats: &mut AnnotateStats,
) -> Outcome {
    match stored {
        Some(outcome) => {
            stats.cached += 1;
            outcome
        }
        None => {
            node.set_outcome(derived);
            stats.computed += 1;
            derived
        }
    }
}

fn clear(node: NodeMut<'_>) {
    match node {
        NodeMut::Defense(n) => {
            n.clear_outcome();
            n.draws.iter_mut().for_each(|d| clear(NodeMut::Draw(d)));
        }
        NodeMut::Draw(n) => {
            n.clear_outcome();
            n.placements
                .iter_mut()
                .for_each(|p| clear(NodeMut::Placement(p)));
        }
        NodeMut::Placement(n) => {
            n.clear_outcome();
            clear(NodeMut::OffenseTurn(&mut n.offense_turn));
        }
        NodeMut::OffenseTurn(n) => {
            n.clear_outcome();
            n.actions.iter_mut().for_each(|a| clear(NodeMut::Action(a)));
        }
        NodeMut::Action(n) => {
            n.clear_outcome();
            if let Some(next) = n.next_round.as_deref_mut() {
                clear(NodeMut::Defense(next));
            }
        }
    }
}
