//! Build progress observation.
//!
//! The builder reports what it is doing through [`BuildObserver`]. Every
//! method has an empty default, so observers implement only what they need.
//! Events arrive in depth-first build order:
//!
//! 1. `on_round_start` when a defense node is entered
//! 2. `on_defense_win` instead of the rest when the bag is exhausted
//! 3. `on_draw_distribution` once per defense node
//! 4. `on_draw` and `on_offense_turn` per draw combination, before recursing

use crate::combinatorics::DrawOutcome;
use crate::core::{DrawCombination, TileBag};

/// Receives build progress events.
pub trait BuildObserver {
    /// A defense node for `round` is being built from `bag`.
    fn on_round_start(&mut self, _round: u32, _bag: &TileBag) {}

    /// The bag holds fewer than `needed` tiles; the defense wins.
    fn on_defense_win(&mut self, _round: u32, _bag: &TileBag, _needed: u32) {}

    /// The full draw distribution for a defense node.
    fn on_draw_distribution(&mut self, _round: u32, _bag: &TileBag, _draws: &[DrawOutcome]) {}

    /// Draw `index` of `total` is being expanded into `arrangements` placements.
    fn on_draw(
        &mut self,
        _round: u32,
        _index: usize,
        _total: usize,
        _combination: &DrawCombination,
        _probability: f64,
        _arrangements: usize,
    ) {
    }

    /// The offense turn for a round has `outcomes` distinct end states.
    fn on_offense_turn(&mut self, _round: u32, _outcomes: usize) {}
}

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

/// Forwards events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl BuildObserver for LogObserver {
    fn on_round_start(&mut self, round: u32, bag: &TileBag) {
        log::debug!("processing round {} (bag {})", round, bag);
    }

    fn on_defense_win(&mut self, round: u32, bag: &TileBag, needed: u32) {
        log::debug!(
            "round {}: bag {} holds {} tiles, {} needed; defense wins",
            round,
            bag,
            bag.total(),
            needed
        );
    }

    fn on_draw(
        &mut self,
        round: u32,
        index: usize,
        total: usize,
        combination: &DrawCombination,
        probability: f64,
        arrangements: usize,
    ) {
        log::debug!(
            "round {} - combination {}/{}: {{{}}} (probability: {}), {} unique arrangements",
            round,
            index + 1,
            total,
            combination.describe(),
            probability,
            arrangements
        );
    }

    fn on_offense_turn(&mut self, round: u32, outcomes: usize) {
        log::trace!("round {}: offense turn has {} outcomes", round, outcomes);
    }
}
