//! Analyzer configuration.
//!
//! All game constants live in one immutable [`AnalyzerConfig`] that is
//! threaded into the builder. Configs are plain serde values so they can be
//! loaded from JSON; call [`AnalyzerConfig::validate`] before building.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::tile::{TileBag, TileType};
use super::unit::{SpawnSourceCounts, UnitCosts, UnitType};

/// Largest draw whose factorial fits in `u128` (34! < 2^128 < 35!).
pub const MAX_DRAW_SIZE: u32 = 34;

/// Gold the offense gains between rounds.
pub const GOLD_INCOME_PER_ROUND: u32 = 1;

/// Game and search-horizon constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Board width (number of paths).
    pub num_paths: u32,

    /// Rows filled by the first defense placement.
    pub starting_depth: u32,

    /// Last round expanded. Offense turns in this round end the branch.
    pub max_rounds: u32,

    /// Bag contents before round 1, serialized as a `"B-C-O-P-S"` key.
    pub initial_tile_bag: TileBag,

    /// Offense gold at the start of round 1.
    pub starting_gold: u32,

    /// Spawns available per unit type for the whole game.
    pub spawn_sources: SpawnSourceCounts,

    /// Gold cost to spawn each unit type.
    pub unit_costs: UnitCosts,

    /// Gold cost of one orthogonal move. Must be positive.
    pub move_cost: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_paths: 2,
            starting_depth: 2,
            max_rounds: 4,
            initial_tile_bag: TileBag::empty()
                .with(TileType::Blank, 4)
                .with(TileType::SpikeTrap, 2),
            starting_gold: 4,
            spawn_sources: SpawnSourceCounts::new([1, 1]),
            unit_costs: UnitCosts::new([2, 3]),
            move_cost: 2,
        }
    }
}

impl AnalyzerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board width.
    #[must_use]
    pub fn with_num_paths(mut self, num_paths: u32) -> Self {
        self.num_paths = num_paths;
        self
    }

    /// Set the number of rows filled in round 1.
    #[must_use]
    pub fn with_starting_depth(mut self, depth: u32) -> Self {
        self.starting_depth = depth;
        self
    }

    /// Set the round horizon.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the initial tile bag.
    #[must_use]
    pub fn with_tile_bag(mut self, bag: TileBag) -> Self {
        self.initial_tile_bag = bag;
        self
    }

    /// Set the offense's starting gold.
    #[must_use]
    pub fn with_starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    /// Set the per-type spawn budget.
    #[must_use]
    pub fn with_spawn_sources(mut self, sources: SpawnSourceCounts) -> Self {
        self.spawn_sources = sources;
        self
    }

    /// Set the per-type spawn costs.
    #[must_use]
    pub fn with_unit_costs(mut self, costs: UnitCosts) -> Self {
        self.unit_costs = costs;
        self
    }

    /// Set the per-move cost.
    #[must_use]
    pub fn with_move_cost(mut self, cost: u32) -> Self {
        self.move_cost = cost;
        self
    }

    /// Tiles drawn in `round` (1-based): the whole starting block in round 1,
    /// one row afterwards.
    #[must_use]
    pub fn draw_size(&self, round: u32) -> u32 {
        if round == 1 {
            self.first_draw_size()
        } else {
            self.num_paths
        }
    }

    /// Tiles drawn in round 1.
    #[must_use]
    pub fn first_draw_size(&self) -> u32 {
        self.num_paths.saturating_mul(self.starting_depth)
    }

    /// Top row index after the defense placement of `round`. A unit standing
    /// on this row wins for the offense.
    ///
    /// Rounds are 1-based; round 0 and a zero `starting_depth` are rejected.
    pub fn max_y(&self, round: u32) -> Result<u32> {
        let base = self
            .starting_depth
            .checked_sub(1)
            .ok_or_else(|| Error::config("starting_depth must be positive"))?;
        let grown = round
            .checked_sub(1)
            .ok_or_else(|| Error::config("rounds are numbered from 1"))?;
        base.checked_add(grown)
            .ok_or_else(|| Error::overflow(format!("winning row of round {}", round)))
    }

    /// Check every constant. Called once before building.
    pub fn validate(&self) -> Result<()> {
        if self.num_paths == 0 {
            return Err(Error::config("num_paths must be positive"));
        }
        if self.starting_depth == 0 {
            return Err(Error::config("starting_depth must be positive"));
        }
        if self.max_rounds == 0 {
            return Err(Error::config("max_rounds must be positive"));
        }
        if self.starting_gold == 0 {
            return Err(Error::config("starting_gold must be positive"));
        }
        if self.move_cost == 0 {
            return Err(Error::config("move_cost must be positive"));
        }
        for (unit_type, cost) in self.unit_costs.iter() {
            if cost == 0 {
                return Err(Error::config(format!(
                    "spawn cost of {:?} must be positive",
                    unit_type
                )));
            }
        }
        let first = self.num_paths.checked_mul(self.starting_depth);
        match first {
            Some(n) if n <= MAX_DRAW_SIZE => {}
            _ => {
                return Err(Error::config(format!(
                    "first-round draw of {} x {} tiles exceeds the maximum of {}",
                    self.num_paths, self.starting_depth, MAX_DRAW_SIZE
                )))
            }
        }
        Ok(())
    }

    /// Spawn cost of a unit type.
    #[must_use]
    pub fn unit_cost(&self, unit_type: UnitType) -> u32 {
        self.unit_costs[unit_type]
    }
}
