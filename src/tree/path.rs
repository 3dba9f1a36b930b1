//! Explicit routes through the tree.
//!
//! A [`NodePath`] is the list of child indices taken from the root. It stands
//! in for parent pointers: breadcrumbs, the board built so far and the
//! resources at any node are all recovered by walking a path top-down.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::node::{DefenseNode, NodeRef, Terminal};

/// Child indices from the root to a node. The empty path is the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of steps from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path to this node's `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path to the parent, `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(usize::to_string).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

impl FromStr for NodePath {
    type Err = std::num::ParseIntError;

    /// Parse `"/0/2/0"`; `"/"` and `""` are the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('/')
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<usize>, _>>()
            .map(Self)
    }
}

/// Every node along `path`, root first. `None` if the path leaves the tree.
pub fn nodes_along<'a>(root: &'a DefenseNode, path: &NodePath) -> Option<Vec<NodeRef<'a>>> {
    let mut current = NodeRef::Defense(root);
    let mut nodes = Vec::with_capacity(path.depth() + 1);
    nodes.push(current);
    for &index in path.indices() {
        current = current.child(index)?;
        nodes.push(current);
    }
    Some(nodes)
}

/// Node at the end of `path`.
pub fn node_at<'a>(root: &'a DefenseNode, path: &NodePath) -> Option<NodeRef<'a>> {
    path.indices()
        .iter()
        .try_fold(NodeRef::Defense(root), |node, &index| node.child(index))
}

/// One label per node along `path`.
pub fn breadcrumbs(root: &DefenseNode, path: &NodePath) -> Option<Vec<String>> {
    Some(nodes_along(root, path)?.iter().map(NodeRef::label).collect())
}

/// Board rows laid so far: the placement strings along `path`, concatenated.
pub fn board_at(root: &DefenseNode, path: &NodePath) -> Option<String> {
    let board = nodes_along(root, path)?
        .into_iter()
        .filter_map(|node| match node {
            NodeRef::Placement(p) => Some(p.placement.as_str()),
            _ => None,
        })
        .collect();
    Some(board)
}

/// First leaf of kind `wanted` in depth-first order.
pub fn first_terminal(root: &DefenseNode, wanted: Terminal) -> Option<NodePath> {
    let mut path = NodePath::root();
    if search(NodeRef::Defense(root), wanted, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn search(node: NodeRef<'_>, wanted: Terminal, path: &mut NodePath) -> bool {
    if node.terminal() == Some(wanted) {
        return true;
    }
    // Annotated subtrees that cannot reach an offense win are skipped.
    if wanted == Terminal::OffenseWin {
        if let Some(outcome) = node.outcome() {
            if !outcome.can_offense_win {
                return false;
            }
        }
    }
    for (index, child) in node.children().enumerate() {
        path.push(index);
        if search(child, wanted, path) {
            return true;
        }
        path.pop();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_navigation() {
        let path = NodePath::root().child(1).child(0);
        assert_eq!(path.indices(), &[1, 0]);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.parent(), Some(NodePath::from_indices(vec![1])));
        assert_eq!(NodePath::root().parent(), None);
        assert!(NodePath::root().is_root());
    }

    #[test]
    fn test_path_display_and_parse() {
        let path = NodePath::from_indices(vec![0, 2, 0, 0, 5]);
        assert_eq!(path.to_string(), "/0/2/0/0/5");
        assert_eq!("/0/2/0/0/5".parse::<NodePath>().unwrap(), path);
        assert_eq!("/".parse::<NodePath>().unwrap(), NodePath::root());
        assert_eq!("".parse::<NodePath>().unwrap(), NodePath::root());
        assert!("/0/x".parse::<NodePath>().is_err());
    }

    #[test]
    fn test_path_serializes_as_array() {
        let path = NodePath::from_indices(vec![3, 1]);
        assert_eq!(serde_json::to_string(&path).unwrap(), "[3,1]");
    }
}
