//! Offense turn search.

pub mod explorer;

pub use explorer::{ActionOutcome, ActionSpaceExplorer, OffenseState};
