//! Recursive construction of the full game tree.
//!
//! Each round alternates a defense draw and an offense turn:
//! - the bag is checked against the round's draw size (too few tiles: the
//!   defense wins and the branch ends)
//! - every draw combination is enumerated with its probability
//! - every arrangement of a draw becomes a placement node
//! - each placement is followed by the offense turn, one action node per
//!   distinct end-of-turn state
//! - non-winning action nodes recurse into the next round with the realized
//!   draw removed from the bag and one gold of income, until `max_rounds`
//!
//! The offense turn depends only on the offense's resources, never on which
//! tiles were drawn or where they were placed, so it is explored once per
//! defense node and each placement receives an identical copy of the subtree.

use crate::combinatorics::{enumerate_arrangements, enumerate_draws, DrawOutcome};
use crate::core::{AnalyzerConfig, Error, Player, Result, TileBag, GOLD_INCOME_PER_ROUND};
use crate::offense::{ActionOutcome, ActionSpaceExplorer, OffenseState};

use super::node::{ActionNode, DefenseNode, DrawNode, OffenseTurnNode, PlacementNode};
use super::observer::{BuildObserver, LogObserver};
use super::GameTree;

/// Builds a [`GameTree`] from an [`AnalyzerConfig`].
pub struct GameTreeBuilder {
    config: AnalyzerConfig,
    observer: Box<dyn BuildObserver>,
}

impl GameTreeBuilder {
    /// Create a builder. The configuration is validated here.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: Box::new(LogObserver),
        })
    }

    /// Replace the progress observer (defaults to [`LogObserver`]).
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn BuildObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Offense resources before round 1.
    #[must_use]
    pub fn initial_offense(&self) -> OffenseState {
        OffenseState::new(
            self.config.starting_gold,
            Default::default(),
            self.config.spawn_sources,
        )
    }

    /// Build the whole tree from the configured starting position.
    pub fn build(&mut self) -> Result<GameTree> {
        log::info!(
            "building game tree: paths={} starting_depth={} max_rounds={} bag={}",
            self.config.num_paths,
            self.config.starting_depth,
            self.config.max_rounds,
            self.config.initial_tile_bag
        );

        let bag = self.config.initial_tile_bag;
        let offense = self.initial_offense();
        let root = self.build_round(&bag, 1, &offense)?;
        let tree = GameTree::new(root);

        if log::log_enabled!(log::Level::Info) {
            let stats = tree.stats();
            log::info!(
                "game tree built: {} nodes ({} offense wins, {} defense wins, {} open leaves)",
                stats.node_count(),
                stats.offense_wins,
                stats.defense_wins,
                stats.horizon_leaves
            );
        }
        Ok(tree)
    }

    /// Build the subtree rooted at the defense node for `round`, given the bag
    /// and the offense's resources at that point.
    pub fn build_round(
        &mut self,
        bag: &TileBag,
        round: u32,
        offense: &OffenseState,
    ) -> Result<DefenseNode> {
        self.observer.on_round_start(round, bag);

        let draw_size = self.config.draw_size(round);
        if bag.total() < draw_size {
            self.observer.on_defense_win(round, bag, draw_size);
            return Ok(DefenseNode {
                round,
                turn: Player::Defense,
                tile_bag: *bag,
                draws: Vec::new(),
                terminal_win: Some(Player::Defense),
                can_offense_win: None,
                num_outcomes: None,
            });
        }

        let draws = enumerate_draws(bag, draw_size)?;
        self.observer.on_draw_distribution(round, bag, &draws);

        let explorer = ActionSpaceExplorer::for_round(&self.config, round)?;
        let outcomes = explorer.explore(offense);
        self.observer.on_offense_turn(round, outcomes.len());

        let mut draw_nodes = Vec::with_capacity(draws.len());
        for (index, draw) in draws.iter().enumerate() {
            draw_nodes.push(self.build_draw(bag, round, offense, &outcomes, draw, index, draws.len())?);
        }

        Ok(DefenseNode {
            round,
            turn: Player::Defense,
            tile_bag: *bag,
            draws: draw_nodes,
            terminal_win: None,
            can_offense_win: None,
            num_outcomes: None,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_draw(
        &mut self,
        bag: &TileBag,
        round: u32,
        offense: &OffenseState,
        outcomes: &[ActionOutcome],
        draw: &DrawOutcome,
        index: usize,
        total: usize,
    ) -> Result<DrawNode> {
        let draw_size = self.config.draw_size(round);
        let arrangements = enumerate_arrangements(&draw.combination, draw_size)?;
        self.observer.on_draw(
            round,
            index,
            total,
            &draw.combination,
            draw.probability,
            arrangements.len(),
        );

        let remaining = bag.checked_sub(&draw.combination).ok_or(Error::InsufficientTiles {
            requested: draw.combination.total(),
            available: bag.total(),
        })?;
        let turn = self.build_offense_turn(&remaining, round, offense, outcomes)?;

        let last = arrangements.len().saturating_sub(1);
        let mut shared = Some(turn);
        let mut placements = Vec::with_capacity(arrangements.len());
        for (i, arrangement) in arrangements.iter().enumerate() {
            let offense_turn = if i == last { shared.take() } else { shared.clone() };
            let Some(offense_turn) = offense_turn else {
                break;
            };
            placements.push(PlacementNode {
                placement: arrangement.placement(),
                offense_turn,
                can_offense_win: None,
                num_outcomes: None,
            });
        }

        Ok(DrawNode {
            draw_key: draw.combination,
            draw_probability: draw.probability,
            random_placement_probability: 1.0 / arrangements.len() as f64,
            placements,
            can_offense_win: None,
            num_outcomes: None,
        })
    }

    fn build_offense_turn(
        &mut self,
        remaining: &TileBag,
        round: u32,
        offense: &OffenseState,
        outcomes: &[ActionOutcome],
    ) -> Result<OffenseTurnNode> {
        let at_horizon = round >= self.config.max_rounds;

        let mut actions = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let next_round = if outcome.offense_win || at_horizon {
                None
            } else {
                let next = OffenseState::new(
                    outcome.end.gold.saturating_add(GOLD_INCOME_PER_ROUND),
                    outcome.end.units.clone(),
                    outcome.end.spawn_sources,
                );
                Some(Box::new(self.build_round(remaining, round + 1, &next)?))
            };

            actions.push(ActionNode {
                actions: outcome.actions.clone(),
                final_gold: outcome.end.gold,
                final_units: outcome.end.units.clone(),
                final_spawn_sources: outcome.end.spawn_sources,
                terminal_win: outcome.offense_win.then_some(Player::Offense),
                next_round,
                can_offense_win: None,
                num_outcomes: None,
            });
        }

        Ok(OffenseTurnNode {
            round,
            turn: Player::Offense,
            gold: offense.gold,
            units: offense.units.clone(),
            spawn_sources: offense.spawn_sources,
            actions,
            can_offense_win: None,
            num_outcomes: None,
        })
    }
}

/// Build the tree for `config` with the default observer.
pub fn build_game_tree(config: &AnalyzerConfig) -> Result<GameTree> {
    GameTreeBuilder::new(config.clone())?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SpawnSourceCounts, TileType, UnitCosts};
    use crate::tree::observer::NoopObserver;

    fn tiny_config() -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_num_paths(2)
            .with_starting_depth(1)
            .with_max_rounds(2)
            .with_tile_bag(TileBag::empty().with(TileType::Blank, 3).with(TileType::SpikeTrap, 1))
            .with_starting_gold(2)
            .with_spawn_sources(SpawnSourceCounts::new([1, 0]))
            .with_unit_costs(UnitCosts::new([2, 3]))
            .with_move_cost(1)
    }

    fn builder(config: AnalyzerConfig) -> GameTreeBuilder {
        GameTreeBuilder::new(config)
            .unwrap()
            .with_observer(Box::new(NoopObserver))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameTreeBuilder::new(AnalyzerConfig::default().with_move_cost(0));
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_round_zero_rejected() {
        let mut b = builder(tiny_config());
        let offense = b.initial_offense();
        let bag = tiny_config().initial_tile_bag;
        assert!(matches!(
            b.build_round(&bag, 0, &offense),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_exhausted_bag_is_defense_win() {
        let mut b = builder(tiny_config());
        let bag = TileBag::empty().with(TileType::Blank, 1);
        let node = b.build_round(&bag, 2, &b.initial_offense()).unwrap();

        assert!(node.is_defense_win());
        assert!(node.draws.is_empty());
        assert_eq!(node.tile_bag, bag);
    }

    #[test]
    fn test_round_structure() {
        let tree = builder(tiny_config()).build().unwrap();
        let root = tree.root();

        assert_eq!(root.round, 1);
        assert_eq!(root.terminal_win, None);
        // Draw 2 of {B:3, S:1}: {B:1,S:1} and {B:2}.
        assert_eq!(root.draws.len(), 2);

        let mixed = &root.draws[0];
        assert_eq!(mixed.draw_key.describe(), "BLANK:1, SPIKE_TRAP:1");
        assert_eq!(mixed.placements.len(), 2);
        assert!((mixed.random_placement_probability - 0.5).abs() < 1e-12);
        assert_eq!(mixed.placements[0].placement, "BS");
        assert_eq!(mixed.placements[1].placement, "SB");

        // Identical offense turns under every placement.
        assert_eq!(mixed.placements[0].offense_turn, mixed.placements[1].offense_turn);
    }

    #[test]
    fn test_starting_row_spawn_wins_immediately() {
        // starting_depth 1: row 0 is the winning row in round 1.
        let tree = builder(tiny_config()).build().unwrap();
        let turn = &tree.root().draws[0].placements[0].offense_turn;

        assert_eq!(turn.gold, 2);
        assert_eq!(turn.actions.len(), 3);
        assert!(turn.actions[0].actions.is_empty());
        assert!(!turn.actions[0].is_offense_win());
        assert!(turn.actions[1].is_offense_win());
        assert!(turn.actions[1].next_round.is_none());
        assert!(turn.actions[2].is_offense_win());
    }

    #[test]
    fn test_next_round_threads_state() {
        let tree = builder(tiny_config()).build().unwrap();
        let draw = &tree.root().draws[1]; // {B:2}
        let pass = &draw.placements[0].offense_turn.actions[0];

        let next = pass.next_round.as_deref().expect("pass continues to round 2");
        assert_eq!(next.round, 2);
        assert_eq!(next.tile_bag, TileBag::empty().with(TileType::Blank, 1).with(TileType::SpikeTrap, 1));

        let next_turn = &next.draws[0].placements[0].offense_turn;
        assert_eq!(next_turn.gold, 3);
        assert_eq!(next_turn.spawn_sources, SpawnSourceCounts::new([1, 0]));

        // Round 2 is the horizon.
        assert!(next_turn
            .actions
            .iter()
            .all(|a| a.next_round.is_none()));
    }

    #[test]
    fn test_deterministic() {
        let a = builder(tiny_config()).build().unwrap();
        let b = builder(tiny_config()).build().unwrap();
        assert_eq!(a, b);
    }
}
