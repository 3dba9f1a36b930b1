//! # dungeonquest-analyzer
//!
//! Exhaustive game-tree analysis for a two-player tile-placement skirmish:
//! the defense draws trap tiles from a bag and lays them on the board, the
//! offense spends gold to spawn units and walk them toward the top row.
//!
//! ## Design Principles
//!
//! 1. **Exhaustive**: every draw, every arrangement of a draw and every
//!    distinct offense turn is materialized. Nothing is sampled.
//!
//! 2. **Explicit Configuration**: board geometry, bag, costs and horizon live in
//!    one [`AnalyzerConfig`] value threaded into the builder.
//!
//! 3. **Owned Tree**: nodes own their children; routes are carried as
//!    [`NodePath`]s rather than parent pointers.
//!
//! ## Modules
//!
//! - `core`: tiles, units, actions, configuration, errors
//! - `combinatorics`: draw distributions and arrangements of a bag
//! - `offense`: depth-first search over one offense turn
//! - `tree`: node types, builder, backward-induction annotator, paths, stats
//!
//! ## Example
//!
//! ```no_run
//! use dungeonquest_analyzer::{analyze, AnalyzerConfig};
//!
//! let tree = analyze(&AnalyzerConfig::default())?;
//! let outcome = tree.outcome().expect("annotated");
//! println!("offense can win: {}", outcome.can_offense_win);
//! # Ok::<(), dungeonquest_analyzer::Error>(())
//! ```

pub mod combinatorics;
pub mod core;
pub mod offense;
pub mod tree;

// Re-export commonly used types
pub use crate::core::{
    Action, AnalyzerConfig, DrawCombination, Error, Player, Position, Result, SpawnSourceCounts,
    TileBag, TileCounts, TileType, Unit, UnitCosts, UnitType, Units, GOLD_INCOME_PER_ROUND,
    MAX_DRAW_SIZE,
};

pub use crate::combinatorics::{
    enumerate_arrangements, enumerate_draws, factorial, multinomial_coefficient, Arrangement,
    DrawOutcome,
};

pub use crate::offense::{ActionOutcome, ActionSpaceExplorer, OffenseState};

pub use crate::tree::{
    build_game_tree, ActionNode, AnnotateStats, BuildObserver, DefenseNode, DrawNode, GameTree,
    GameTreeBuilder, LogObserver, NodeKind, NodePath, NodeRef, NoopObserver, OffenseTurnNode,
    Outcome, PlacementNode, Terminal, TreeStats,
};

/// Build and annotate the full tree for `config`.
pub fn analyze(config: &AnalyzerConfig) -> Result<GameTree> {
    let mut tree = build_game_tree(config)?;
    tree.annotate();
    Ok(tree)
}
