//! Game-tree node types.
//!
//! One round of play is a fixed chain of node kinds:
//!
//! ```text
//! DefenseNode ─┬─ DrawNode ─┬─ PlacementNode ── OffenseTurnNode ─┬─ ActionNode ── DefenseNode (next round)
//!              │            └─ ...                               └─ ...
//!              └─ ...
//! ```
//!
//! Every node owns its children; there are no parent links. Callers that need
//! the route to a node carry a [`NodePath`](super::NodePath) instead.
//!
//! Each struct serializes with a `"t"` kind tag and the camelCase field names
//! the tree viewer reads. The two annotation fields stay `None` until the
//! [annotator](super::annotate) has run.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Action, DrawCombination, Player, SpawnSourceCounts, TileBag, Units};
use crate::offense::OffenseState;

/// Start of a round: the defense draws from the bag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub struct DefenseNode {
    pub round: u32,

    /// Side to act; always `D`.
    #[serde(default = "defense_turn")]
    pub turn: Player,

    /// Bag contents before this round's draw.
    pub tile_bag: TileBag,

    /// One child per feasible draw.
    #[serde(rename = "potentialDraws")]
    pub draws: Vec<DrawNode>,

    /// `Some(Defense)` when the bag cannot supply this round's draw.
    #[serde(rename = "win", default)]
    pub terminal_win: Option<Player>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_offense_win: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outcomes: Option<u64>,
}

/// One feasible draw combination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub struct DrawNode {
    pub draw_key: DrawCombination,

    pub draw_probability: f64,

    /// Probability of each individual placement given this draw.
    pub random_placement_probability: f64,

    #[serde(rename = "placementPermutations")]
    pub placements: Vec<PlacementNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_offense_win: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outcomes: Option<u64>,
}

/// One arrangement of the draw on the new board row(s).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub struct PlacementNode {
    /// Tile symbols, one per slot.
    pub placement: String,

    #[serde(rename = "nextRound")]
    pub offense_turn: OffenseTurnNode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_offense_win: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outcomes: Option<u64>,
}

/// The offense's turn after a placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub struct OffenseTurnNode {
    pub round: u32,

    /// Side to act; always `O`.
    #[serde(default = "offense_turn")]
    pub turn: Player,

    /// Gold at the start of the turn.
    pub gold: u32,

    /// Units at the start of the turn.
    pub units: Units,

    /// Spawn budget at the start of the turn.
    #[serde(rename = "unitSourceCounts")]
    pub spawn_sources: SpawnSourceCounts,

    /// One child per distinct end-of-turn state.
    #[serde(rename = "turnActions")]
    pub actions: Vec<ActionNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_offense_win: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outcomes: Option<u64>,
}

fn defense_turn() -> Player {
    Player::Defense
}

fn offense_turn() -> Player {
    Player::Offense
}

impl OffenseTurnNode {
    /// Resources at the start of the turn.
    #[must_use]
    pub fn start_state(&self) -> OffenseState {
        OffenseState::new(self.gold, self.units.clone(), self.spawn_sources)
    }
}

/// One end-of-turn state of the offense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub struct ActionNode {
    /// Actions taken this turn, in order.
    pub actions: Vector<Action>,

    pub final_gold: u32,

    #[serde(rename = "units")]
    pub final_units: Units,

    #[serde(rename = "finalUnitSourceCounts")]
    pub final_spawn_sources: SpawnSourceCounts,

    /// `Some(Offense)` when a unit reached the winning row.
    #[serde(rename = "win", default)]
    pub terminal_win: Option<Player>,

    /// Next round, or `None` for a win or when the round horizon was reached.
    pub next_round: Option<Box<DefenseNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_offense_win: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outcomes: Option<u64>,
}

impl ActionNode {
    /// Check if this node ends the game with an offense win.
    #[must_use]
    pub fn is_offense_win(&self) -> bool {
        self.terminal_win == Some(Player::Offense)
    }

    /// Resources after the turn.
    #[must_use]
    pub fn end_state(&self) -> OffenseState {
        OffenseState::new(self.final_gold, self.final_units.clone(), self.final_spawn_sources)
    }
}

impl DefenseNode {
    /// Check if the defense won by exhausting the bag.
    #[must_use]
    pub fn is_defense_win(&self) -> bool {
        self.terminal_win == Some(Player::Defense)
    }
}

/// Backward-induction summary of a subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Some offense-win terminal is reachable below.
    pub can_offense_win: bool,

    /// Resolved terminals (offense or defense wins) below.
    pub num_outcomes: u64,
}

impl Outcome {
    /// Identity for [`Outcome::merge`]; also the value of a horizon leaf.
    pub const UNRESOLVED: Outcome = Outcome {
        can_offense_win: false,
        num_outcomes: 0,
    };

    /// Value of an offense-win terminal.
    pub const OFFENSE_WIN: Outcome = Outcome {
        can_offense_win: true,
        num_outcomes: 1,
    };

    /// Value of a bag-exhaustion terminal.
    pub const DEFENSE_WIN: Outcome = Outcome {
        can_offense_win: false,
        num_outcomes: 1,
    };

    /// OR the win flags, sum the counts.
    #[must_use]
    pub fn merge(self, other: Outcome) -> Outcome {
        Outcome {
            can_offense_win: self.can_offense_win || other.can_offense_win,
            num_outcomes: self.num_outcomes + other.num_outcomes,
        }
    }
}

impl std::iter::Sum for Outcome {
    fn sum<I: Iterator<Item = Outcome>>(iter: I) -> Outcome {
        iter.fold(Outcome::UNRESOLVED, Outcome::merge)
    }
}

/// Read and write the annotation fields shared by every node kind.
pub trait Annotated {
    /// Stored outcome, if both fields are populated.
    fn outcome(&self) -> Option<Outcome>;

    /// Store an outcome.
    fn set_outcome(&mut self, outcome: Outcome);

    /// Clear both fields.
    fn clear_outcome(&mut self);
}

macro_rules! impl_annotated {
    ($($node:ty),* $(,)?) => {
        $(
            impl Annotated for $node {
                fn outcome(&self) -> Option<Outcome> {
                    Some(Outcome {
                        can_offense_win: self.can_offense_win?,
                        num_outcomes: self.num_outcomes?,
                    })
                }

                fn set_outcome(&mut self, outcome: Outcome) {
                    self.can_offense_win = Some(outcome.can_offense_win);
                    self.num_outcomes = Some(outcome.num_outcomes);
                }

                fn clear_outcome(&mut self) {
                    self.can_offense_win = None;
                    self.num_outcomes = None;
                }
            }
        )*
    };
}

impl_annotated!(DefenseNode, DrawNode, PlacementNode, OffenseTurnNode, ActionNode);

/// The five node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Defense,
    Draw,
    Placement,
    OffenseTurn,
    Action,
}

impl NodeKind {
    /// Serialized kind tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            NodeKind::Defense => "DefenseNode",
            NodeKind::Draw => "DrawNode",
            NodeKind::Placement => "PlacementNode",
            NodeKind::OffenseTurn => "OffenseTurnNode",
            NodeKind::Action => "ActionNode",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// How a leaf ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// A unit reached the winning row.
    OffenseWin,
    /// The bag could not supply a round's draw.
    DefenseWin,
    /// The round horizon was reached without a result.
    Horizon,
}

/// Borrowed view of any node.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Defense(&'a DefenseNode),
    Draw(&'a DrawNode),
    Placement(&'a PlacementNode),
    OffenseTurn(&'a OffenseTurnNode),
    Action(&'a ActionNode),
}

impl<'a> NodeRef<'a> {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Defense(_) => NodeKind::Defense,
            NodeRef::Draw(_) => NodeKind::Draw,
            NodeRef::Placement(_) => NodeKind::Placement,
            NodeRef::OffenseTurn(_) => NodeKind::OffenseTurn,
            NodeRef::Action(_) => NodeKind::Action,
        }
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        match self {
            NodeRef::Defense(n) => n.draws.len(),
            NodeRef::Draw(n) => n.placements.len(),
            NodeRef::Placement(_) => 1,
            NodeRef::OffenseTurn(n) => n.actions.len(),
            NodeRef::Action(n) => usize::from(n.next_round.is_some()),
        }
    }

    /// Child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        match *self {
            NodeRef::Defense(n) => n.draws.get(index).map(NodeRef::Draw),
            NodeRef::Draw(n) => n.placements.get(index).map(NodeRef::Placement),
            NodeRef::Placement(n) => (index == 0).then_some(NodeRef::OffenseTurn(&n.offense_turn)),
            NodeRef::OffenseTurn(n) => n.actions.get(index).map(NodeRef::Action),
            NodeRef::Action(n) => match (index, n.next_round.as_deref()) {
                (0, Some(next)) => Some(NodeRef::Defense(next)),
                _ => None,
            },
        }
    }

    /// Children in order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let node = *self;
        (0..node.child_count()).filter_map(move |i| node.child(i))
    }

    /// Leaf classification, `None` for inner nodes.
    #[must_use]
    pub fn terminal(&self) -> Option<Terminal> {
        match self {
            NodeRef::Defense(n) if n.is_defense_win() => Some(Terminal::DefenseWin),
            NodeRef::Action(n) if n.is_offense_win() => Some(Terminal::OffenseWin),
            NodeRef::Action(n) if n.next_round.is_none() => Some(Terminal::Horizon),
            _ => None,
        }
    }

    /// Stored annotation.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            NodeRef::Defense(n) => n.outcome(),
            NodeRef::Draw(n) => n.outcome(),
            NodeRef::Placement(n) => n.outcome(),
            NodeRef::OffenseTurn(n) => n.outcome(),
            NodeRef::Action(n) => n.outcome(),
        }
    }

    /// Short human-readable description, as shown in breadcrumbs.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            NodeRef::Defense(n) => match n.terminal_win {
                Some(_) => format!("Round {} (bag {}): defense wins", n.round, n.tile_bag),
                None => format!("Round {} (bag {})", n.round, n.tile_bag),
            },
            NodeRef::Draw(n) => format!(
                "Draw {} (p={:.4})",
                n.draw_key.describe(),
                n.draw_probability
            ),
            NodeRef::Placement(n) => format!("Placement: {}", n.placement),
            NodeRef::OffenseTurn(n) => format!(
                "Offense turn {} (gold {}, {} units)",
                n.round,
                n.gold,
                n.units.len()
            ),
            NodeRef::Action(n) => {
                let actions: Vec<String> = n.actions.iter().map(ToString::to_string).collect();
                let actions = if actions.is_empty() {
                    "pass".to_string()
                } else {
                    actions.join(", ")
                };
                if n.is_offense_win() {
                    format!("Actions: {} -> offense wins", actions)
                } else {
                    format!("Actions: {} (gold left {})", actions, n.final_gold)
                }
            }
        }
    }
}

/// Mutable view of any node.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Defense(&'a mut DefenseNode),
    Draw(&'a mut DrawNode),
    Placement(&'a mut PlacementNode),
    OffenseTurn(&'a mut OffenseTurnNode),
    Action(&'a mut ActionNode),
}

impl NodeMut<'_> {
    /// Shared view of the same node.
    #[must_use]
    pub fn view(&self) -> NodeRef<'_> {
        match self {
            NodeMut::Defense(n) => NodeRef::Defense(n),
            NodeMut::Draw(n) => NodeRef::Draw(n),
            NodeMut::Placement(n) => NodeRef::Placement(n),
            NodeMut::OffenseTurn(n) => NodeRef::OffenseTurn(n),
            NodeMut::Action(n) => NodeRef::Action(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TileType, Unit, UnitType};
    use smallvec::smallvec;

    fn action_leaf(win: bool) -> ActionNode {
        ActionNode {
            actions: Vector::unit(Action::Spawn {
                unit_type: UnitType::Basic,
                location: 0,
            }),
            final_gold: 2,
            final_units: smallvec![Unit::new(UnitType::Basic, 0)],
            final_spawn_sources: SpawnSourceCounts::new([0, 1]),
            terminal_win: win.then_some(Player::Offense),
            next_round: None,
            can_offense_win: None,
            num_outcomes: None,
        }
    }

    #[test]
    fn test_outcome_merge() {
        let total: Outcome = [Outcome::DEFENSE_WIN, Outcome::UNRESOLVED, Outcome::OFFENSE_WIN]
            .into_iter()
            .sum();
        assert!(total.can_offense_win);
        assert_eq!(total.num_outcomes, 2);

        let none: Outcome = std::iter::empty::<Outcome>().sum();
        assert_eq!(none, Outcome::UNRESOLVED);
    }

    #[test]
    fn test_annotated_fields() {
        let mut node = action_leaf(true);
        assert_eq!(node.outcome(), None);

        node.set_outcome(Outcome::OFFENSE_WIN);
        assert_eq!(node.can_offense_win, Some(true));
        assert_eq!(node.num_outcomes, Some(1));
        assert_eq!(node.outcome(), Some(Outcome::OFFENSE_WIN));

        // Half-populated fields are not an outcome.
        node.num_outcomes = None;
        assert_eq!(node.outcome(), None);

        node.clear_outcome();
        assert_eq!(node.can_offense_win, None);
    }

    #[test]
    fn test_terminal_classification() {
        let win = action_leaf(true);
        let open = action_leaf(false);
        assert_eq!(NodeRef::Action(&win).terminal(), Some(Terminal::OffenseWin));
        assert_eq!(NodeRef::Action(&open).terminal(), Some(Terminal::Horizon));

        let exhausted = DefenseNode {
            round: 3,
            turn: Player::Defense,
            tile_bag: TileBag::empty().with(TileType::Blank, 1),
            draws: Vec::new(),
            terminal_win: Some(Player::Defense),
            can_offense_win: None,
            num_outcomes: None,
        };
        assert_eq!(NodeRef::Defense(&exhausted).terminal(), Some(Terminal::DefenseWin));
        assert_eq!(NodeRef::Defense(&exhausted).child_count(), 0);
    }

    #[test]
    fn test_action_node_json_shape() {
        let mut node = action_leaf(true);
        node.set_outcome(Outcome::OFFENSE_WIN);

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["t"], "ActionNode");
        assert_eq!(json["finalGold"], 2);
        assert_eq!(json["win"], "O");
        assert_eq!(json["units"], serde_json::json!(["0::0"]));
        assert_eq!(json["finalUnitSourceCounts"], serde_json::json!([0, 1]));
        assert_eq!(json["actions"][0]["type"], "spawn");
        assert_eq!(json["nextRound"], serde_json::Value::Null);
        assert_eq!(json["canOffenseWin"], true);
        assert_eq!(json["numOutcomes"], 1);

        let back: ActionNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_unannotated_fields_omitted() {
        let node = action_leaf(false);
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("canOffenseWin").is_none());
        assert!(json.get("numOutcomes").is_none());
        assert_eq!(json["win"], serde_json::Value::Null);
    }

    #[test]
    fn test_labels() {
        let node = action_leaf(true);
        assert_eq!(
            NodeRef::Action(&node).label(),
            "Actions: spawn Basic@0 -> offense wins"
        );
        assert_eq!(NodeKind::OffenseTurn.to_string(), "OffenseTurnNode");
    }
}
