//! The game tree: node types, construction, annotation and navigation.
//!
//! [`GameTree`] owns the root [`DefenseNode`] of a full analysis. It is built
//! by [`GameTreeBuilder`], annotated in place by [`GameTree::annotate`], and
//! persisted as the JSON document the tree viewer loads.

pub mod annotate;
pub mod builder;
pub mod node;
pub mod observer;
pub mod path;
pub mod stats;

pub use annotate::{annotate, clear_annotations, AnnotateStats};
pub use builder::{build_game_tree, GameTreeBuilder};
pub use node::{
    ActionNode, Annotated, DefenseNode, DrawNode, NodeKind, NodeMut, NodeRef, OffenseTurnNode,
    Outcome, PlacementNode, Terminal,
};
pub use observer::{BuildObserver, LogObserver, NoopObserver};
pub use path::NodePath;
pub use stats::TreeStats;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// A complete game tree, serialized as its root node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameTree {
    root: DefenseNode,
}

impl GameTree {
    /// Wrap a root node.
    #[must_use]
    pub fn new(root: DefenseNode) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &DefenseNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut DefenseNode {
        &mut self.root
    }

    #[must_use]
    pub fn into_root(self) -> DefenseNode {
        self.root
    }

    /// Fill `can_offense_win` / `num_outcomes` on every node that lacks them.
    pub fn annotate(&mut self) -> (Outcome, AnnotateStats) {
        annotate::annotate(&mut self.root)
    }

    /// Drop every annotation.
    pub fn clear_annotations(&mut self) {
        annotate::clear_annotations(&mut self.root);
    }

    /// The root's outcome, if annotated.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.root.outcome()
    }

    /// Count nodes and leaves.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats::collect(&self.root)
    }

    /// Node at the end of `path`.
    #[must_use]
    pub fn node_at(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        path::node_at(&self.root, path)
    }

    /// Labels from the root down to the node at `path`.
    #[must_use]
    pub fn breadcrumbs(&self, path: &NodePath) -> Option<Vec<String>> {
        path::breadcrumbs(&self.root, path)
    }

    /// Placement strings along `path`, concatenated in round order.
    #[must_use]
    pub fn board_at(&self, path: &NodePath) -> Option<String> {
        path::board_at(&self.root, path)
    }

    /// Path to the first offense-win leaf in depth-first order.
    #[must_use]
    pub fn first_offense_win_path(&self) -> Option<NodePath> {
        path::first_terminal(&self.root, Terminal::OffenseWin)
    }

    /// Path to the first bag-exhaustion leaf in depth-first order.
    #[must_use]
    pub fn first_defense_win_path(&self) -> Option<NodePath> {
        path::first_terminal(&self.root, Terminal::DefenseWin)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a tree, annotated or not.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write pretty JSON to `path`, creating parent directories.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {}", parent.display()),
                source,
            })?;
        }
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| Error::Io {
            operation: format!("write {}", path.display()),
            source,
        })
    }

    /// Read a tree written by [`GameTree::save_json`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read {}", path.display()),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl From<DefenseNode> for GameTree {
    fn from(root: DefenseNode) -> Self {
        Self::new(root)
    }
}
