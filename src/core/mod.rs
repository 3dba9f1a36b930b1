//! Core types: tiles, units, actions, configuration, errors.
//!
//! Everything here is plain data shared by the enumerators, the offense
//! explorer and the game tree.

pub mod action;
pub mod config;
pub mod error;
pub mod tile;
pub mod unit;

pub use action::{Action, Player};
pub use config::{AnalyzerConfig, GOLD_INCOME_PER_ROUND, MAX_DRAW_SIZE};
pub use error::{Error, Result};
pub use tile::{placement_string, DrawCombination, TileBag, TileCounts, TileType};
pub use unit::{Position, SpawnSourceCounts, Unit, UnitCosts, UnitTable, UnitType, Units};
