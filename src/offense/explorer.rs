//! Exhaustive search over one offense turn.
//!
//! Starting from the offense's resources, every sequence of affordable spawns
//! and moves is walked depth-first. Every intermediate state is itself a
//! possible end of turn, so each search node is recorded. A state with a unit
//! on the winning row ends its branch.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{
    Action, AnalyzerConfig, Error, Position, Result, SpawnSourceCounts, Unit, UnitCosts,
    UnitType, Units,
};

/// Orthogonal steps: right, left, up (toward the goal), down.
const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Offense resources at some point of a turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenseState {
    pub gold: u32,
    pub units: Units,
    pub spawn_sources: SpawnSourceCounts,
}

impl OffenseState {
    #[must_use]
    pub fn new(gold: u32, units: Units, spawn_sources: SpawnSourceCounts) -> Self {
        Self {
            gold,
            units,
            spawn_sources,
        }
    }

    fn is_occupied(&self, location: u32) -> bool {
        self.units.iter().any(|u| u.location == location)
    }
}

/// One distinct way the turn can end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    /// Actions taken, in order. Shared structurally between outcomes.
    pub actions: Vector<Action>,

    /// Gold, units and spawn budget after the last action.
    pub end: OffenseState,

    /// A unit reached the winning row.
    pub offense_win: bool,
}

// Identity of an outcome: the action sequence (order-sensitive), the unit
// multiset, remaining gold and the win flag.
type OutcomeKey = (Vector<Action>, Vec<Unit>, u32, bool);

/// Enumerates every reachable end-of-turn state for one round.
#[derive(Clone, Debug)]
pub struct ActionSpaceExplorer {
    num_paths: u32,
    max_y: u32,
    unit_costs: UnitCosts,
    move_cost: u32,
}

impl ActionSpaceExplorer {
    /// Create an explorer for a board `num_paths` wide whose winning row is
    /// `max_y`.
    ///
    /// A zero `move_cost` would allow endless back-and-forth moves and is
    /// rejected, as is a zero-width board.
    pub fn new(num_paths: u32, max_y: u32, unit_costs: UnitCosts, move_cost: u32) -> Result<Self> {
        if move_cost == 0 {
            return Err(Error::config("move_cost must be positive"));
        }
        if num_paths == 0 {
            return Err(Error::config("num_paths must be positive"));
        }
        Ok(Self {
            num_paths,
            max_y,
            unit_costs,
            move_cost,
        })
    }

    /// Explorer for the offense turn of `round` under `config`.
    pub fn for_round(config: &AnalyzerConfig, round: u32) -> Result<Self> {
        Self::new(
            config.num_paths,
            config.max_y(round)?,
            config.unit_costs,
            config.move_cost,
        )
    }

    /// Row that wins for the offense.
    #[must_use]
    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    /// Check whether any unit stands on the winning row.
    #[must_use]
    pub fn is_offense_win(&self, units: &[Unit]) -> bool {
        units.iter().any(|u| u.row(self.num_paths) == self.max_y)
    }

    /// Every distinct outcome reachable from `start`, in depth-first order.
    ///
    /// The first outcome is always the empty sequence (do nothing).
    #[must_use]
    pub fn explore(&self, start: &OffenseState) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::new();
        let mut seen: FxHashSet<OutcomeKey> = FxHashSet::default();
        self.dfs(start.clone(), Vector::new(), &mut outcomes, &mut seen);

        log::trace!(
            "explored offense turn: gold={} units={} max_y={} -> {} outcomes",
            start.gold,
            start.units.len(),
            self.max_y,
            outcomes.len()
        );
        outcomes
    }

    fn dfs(
        &self,
        state: OffenseState,
        actions: Vector<Action>,
        out: &mut Vec<ActionOutcome>,
        seen: &mut FxHashSet<OutcomeKey>,
    ) {
        let offense_win = self.is_offense_win(&state.units);
        self.record(&state, &actions, offense_win, out, seen);
        if offense_win {
            return;
        }

        // Spawns
        for unit_type in UnitType::ALL {
            let cost = self.unit_costs[unit_type];
            if cost > state.gold {
                continue;
            }
            let Some(spawn_sources) = state.spawn_sources.decremented(unit_type) else {
                continue;
            };
            for location in 0..self.num_paths {
                if state.is_occupied(location) {
                    continue;
                }
                let mut units = state.units.clone();
                units.push(Unit::new(unit_type, location));

                let mut next_actions = actions.clone();
                next_actions.push_back(Action::Spawn {
                    unit_type,
                    location,
                });
                self.dfs(
                    OffenseState::new(state.gold - cost, units, spawn_sources),
                    next_actions,
                    out,
                    seen,
                );
            }
        }

        // Moves
        if state.gold < self.move_cost || state.units.is_empty() {
            return;
        }
        for (unit_index, unit) in state.units.iter().enumerate() {
            let from = Position::from_location(unit.location, self.num_paths);
            for (dx, dy) in DIRECTIONS {
                let Some(to) = from.offset(dx, dy).to_location(self.num_paths) else {
                    continue;
                };
                if state.is_occupied(to) {
                    continue;
                }
                let mut units = state.units.clone();
                units[unit_index].location = to;

                let mut next_actions = actions.clone();
                next_actions.push_back(Action::Move {
                    unit_index,
                    from: unit.location,
                    to,
                });
                self.dfs(
                    OffenseState::new(state.gold - self.move_cost, units, state.spawn_sources),
                    next_actions,
                    out,
                    seen,
                );
            }
        }
    }

    fn record(
        &self,
        state: &OffenseState,
        actions: &Vector<Action>,
        offense_win: bool,
        out: &mut Vec<ActionOutcome>,
        seen: &mut FxHashSet<OutcomeKey>,
    ) {
        let mut unit_key: Vec<Unit> = state.units.to_vec();
        unit_key.sort_unstable();
        if !seen.insert((actions.clone(), unit_key, state.gold, offense_win)) {
            return;
        }
        out.push(ActionOutcome {
            actions: actions.clone(),
            end: state.clone(),
            offense_win,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn explorer(max_y: u32, move_cost: u32) -> ActionSpaceExplorer {
        ActionSpaceExplorer::new(2, max_y, UnitCosts::new([2, 3]), move_cost).unwrap()
    }

    fn empty_start(gold: u32) -> OffenseState {
        OffenseState::new(gold, Units::new(), SpawnSourceCounts::new([1, 1]))
    }

    #[test]
    fn test_zero_move_cost_rejected() {
        let err = ActionSpaceExplorer::new(2, 1, UnitCosts::new([2, 3]), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_for_round_rejects_zero_depth_and_round() {
        let shallow = AnalyzerConfig::default().with_starting_depth(0);
        assert!(matches!(
            ActionSpaceExplorer::for_round(&shallow, 1),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            ActionSpaceExplorer::for_round(&AnalyzerConfig::default(), 0),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_no_gold_only_empty_sequence() {
        let outcomes = explorer(1, 1).explore(&empty_start(0));
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].actions.is_empty());
        assert!(!outcomes[0].offense_win);
    }

    #[test]
    fn test_spawn_only_budget() {
        // Gold 2 buys one BASIC spawn and nothing else (move cost 2, no gold left).
        let outcomes = explorer(1, 2).explore(&empty_start(2));
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[1..].iter().all(|o| o.end.gold == 0));
        assert!(outcomes[1..]
            .iter()
            .all(|o| o.end.spawn_sources == SpawnSourceCounts::new([0, 1])));
    }

    #[test]
    fn test_spawn_then_advance_wins() {
        let outcomes = explorer(1, 1).explore(&empty_start(4));
        let winning = outcomes.iter().find(|o| {
            o.actions.len() == 2
                && o.actions[0]
                    == Action::Spawn {
                        unit_type: UnitType::Sprinter,
                        location: 0,
                    }
                && o.actions[1]
                    == Action::Move {
                        unit_index: 0,
                        from: 0,
                        to: 2,
                    }
        });

        let winning = winning.expect("spawn + advance should be reachable");
        assert!(winning.offense_win);
        assert_eq!(winning.end.gold, 0);
    }

    #[test]
    fn test_win_stops_branch() {
        // A unit already on the winning row: nothing else is explored.
        let start = OffenseState::new(
            10,
            smallvec![Unit::new(UnitType::Basic, 2)],
            SpawnSourceCounts::new([1, 1]),
        );
        let outcomes = explorer(1, 1).explore(&start);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].offense_win);
    }

    #[test]
    fn test_moves_respect_bounds_and_occupancy() {
        let start = OffenseState::new(
            1,
            smallvec![Unit::new(UnitType::Basic, 0), Unit::new(UnitType::Basic, 1)],
            SpawnSourceCounts::new([0, 0]),
        );
        let outcomes = explorer(5, 1).explore(&start);

        // Only moves up are legal: unit 0 to 2, unit 1 to 3.
        let targets: Vec<u32> = outcomes
            .iter()
            .filter_map(|o| match o.actions.last() {
                Some(Action::Move { to, .. }) => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec![2, 3]);
    }

    #[test]
    fn test_no_duplicate_sequences() {
        let outcomes = explorer(3, 1).explore(&empty_start(6));
        let mut seen = FxHashSet::default();
        for outcome in &outcomes {
            assert!(seen.insert(outcome.actions.clone()));
        }
    }

    #[test]
    fn test_win_flag_matches_units() {
        let explorer = explorer(2, 1);
        for outcome in explorer.explore(&empty_start(6)) {
            assert_eq!(outcome.offense_win, explorer.is_offense_win(&outcome.end.units));
        }
    }
}
