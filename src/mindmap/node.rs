//! Mind-map tree model.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One node of a mind map. The parent uniquely owns its children, so the
/// tree can never contain cycles or shared subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapNode {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MindMapNode>,
}

// Trees arrive through serde; builders are for tests only.
#[cfg(test)]
impl MindMapNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<MindMapNode>) -> Self {
        self.children = children;
        self
    }
}

impl MindMapNode {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of edges on the longest root-to-leaf path. A lone root is 0.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(MindMapNode::node_count).sum::<usize>()
    }
}

/// A generated mind map: the tree plus the model's optional prose summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMap {
    pub data: MindMapNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Re-key nodes whose id is blank or already used earlier in pre-order.
///
/// Replacement ids are derived from the parent (`"<parent>-<n>"`, 1-based
/// sibling position) with a `-k` suffix on further collisions, so the result
/// is deterministic. Returns the number of nodes re-keyed; a well-formed tree
/// is left untouched.
pub fn ensure_unique_ids(root: &mut MindMapNode) -> usize {
    let mut seen = HashSet::new();
    rekey(root, "root".to_string(), &mut seen)
}

fn rekey(node: &mut MindMapNode, fallback: String, seen: &mut HashSet<String>) -> usize {
    let mut rekeyed = 0;
    if node.id.trim().is_empty() || seen.contains(&node.id) {
        node.id = first_free(fallback, seen);
        rekeyed += 1;
    }
    seen.insert(node.id.clone());

    let parent = node.id.clone();
    for (i, child) in node.children.iter_mut().enumerate() {
        rekeyed += rekey(child, format!("{parent}-{}", i + 1), seen);
    }
    rekeyed
}

fn first_free(base: String, seen: &HashSet<String>) -> String {
    if !seen.contains(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !seen.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
