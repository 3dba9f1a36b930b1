//! Offense actions and the two sides of the game.
//!
//! An offense turn is a sequence of atomic actions, each paid for in gold:
//! - `Spawn` places a new unit of some type on an empty spawn-row cell
//! - `Move` shifts one existing unit to an orthogonally adjacent empty cell

use serde::{Deserialize, Serialize};

use super::unit::UnitType;

/// A side of the game.
///
/// Serialized as the single letters the tree viewer understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "O")]
    Offense,
    #[serde(rename = "D")]
    Defense,
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Offense => write!(f, "Offense"),
            Player::Defense => write!(f, "Defense"),
        }
    }
}

/// A single offense action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Spawn a unit of `unit_type` at a spawn-row `location`.
    #[serde(rename_all = "camelCase")]
    Spawn { unit_type: UnitType, location: u32 },

    /// Move the unit at `unit_index` from `from` to `to`.
    #[serde(rename_all = "camelCase")]
    Move { unit_index: usize, from: u32, to: u32 },
}

impl Action {
    /// Check if this is a spawn.
    #[must_use]
    pub fn is_spawn(&self) -> bool {
        matches!(self, Action::Spawn { .. })
    }

    /// Check if this is a move.
    #[must_use]
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Spawn {
                unit_type,
                location,
            } => write!(f, "spawn {:?}@{}", unit_type, location),
            Action::Move {
                unit_index,
                from,
                to,
            } => write!(f, "move #{} {}->{}", unit_index, from, to),
        }
    }
}
