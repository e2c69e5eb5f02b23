use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::{InternalNode, NodeShape};

/// Reserved mapping key holding a mixed node's direct leaves.
pub const DEFAULT_MIXED_LEAF_KEY: &str = "misc";

/// The wildcard-format document: either a list of item strings or a mapping
/// from category label to nested document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalDocument {
    Leaves(Vec<String>),
    Branch(BTreeMap<String, CanonicalDocument>),
}

impl CanonicalDocument {
    /// The degenerate result of a run where everything was filtered out.
    pub fn empty() -> Self {
        CanonicalDocument::Branch(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CanonicalDocument::Leaves(leaves) => leaves.is_empty(),
            CanonicalDocument::Branch(map) => map.is_empty(),
        }
    }

    /// All item strings in document order.
    pub fn all_leaves(&self) -> Vec<&str> {
        let mut out = vec![];
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            CanonicalDocument::Leaves(leaves) => out.extend(leaves.iter().map(String::as_str)),
            CanonicalDocument::Branch(map) => {
                for child in map.values() {
                    child.collect_leaves(out);
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            CanonicalDocument::Leaves(leaves) => leaves.len(),
            CanonicalDocument::Branch(map) => map.values().map(|c| c.leaf_count()).sum(),
        }
    }

    /// Longest chain of mapping keys from the top of the document.
    pub fn nesting_depth(&self) -> usize {
        match self {
            CanonicalDocument::Leaves(_) => 0,
            CanonicalDocument::Branch(map) => map
                .values()
                .map(|c| c.nesting_depth() + 1)
                .max()
                .unwrap_or(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CanonicalDocument> {
        match self {
            CanonicalDocument::Branch(map) => map.get(key),
            CanonicalDocument::Leaves(_) => None,
        }
    }
}

/// Converts finished `InternalNode` trees into `CanonicalDocument`s.
///
/// - Leaves-only nodes become sorted lists.
/// - Empty nodes are omitted from their parent.  So are branches all of whose
///   children ended up omitted.
/// - Branch-only nodes become mappings.
/// - Mixed nodes become mappings with one extra entry under the reserved
///   `mixed_leaf_key` listing the direct leaves.  If a real child already has
///   that label, the direct leaves are folded into that child instead, so the
///   reserved key never shadows a category.
///
/// This never consults the taxonomy or the filter policy.
#[derive(Debug, Clone)]
pub struct Normalizer {
    mixed_leaf_key: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(DEFAULT_MIXED_LEAF_KEY)
    }
}

impl Normalizer {
    pub fn new(mixed_leaf_key: impl Into<String>) -> Self {
        Normalizer {
            mixed_leaf_key: mixed_leaf_key.into(),
        }
    }

    pub fn mixed_leaf_key(&self) -> &str {
        &self.mixed_leaf_key
    }

    fn leaves_of(node: &InternalNode) -> CanonicalDocument {
        CanonicalDocument::Leaves(node.direct_leaves.iter().cloned().collect())
    }

    fn branch_of(&self, children: &BTreeMap<String, InternalNode>) -> Option<CanonicalDocument> {
        let map: BTreeMap<String, CanonicalDocument> = children
            .iter()
            .filter_map(|(label, child)| Some((label.clone(), self.normalize_node(child)?)))
            .collect();
        if map.is_empty() {
            None
        } else {
            Some(CanonicalDocument::Branch(map))
        }
    }

    /// Normalize one node's content; None means the node contributes nothing.
    pub fn normalize_node(&self, node: &InternalNode) -> Option<CanonicalDocument> {
        match node.shape() {
            NodeShape::Empty => None,
            NodeShape::Leaves => Some(Self::leaves_of(node)),
            NodeShape::Branch => self.branch_of(&node.children),
            NodeShape::Mixed => {
                if node.children.contains_key(&self.mixed_leaf_key) {
                    let mut children = node.children.clone();
                    if let Some(clash) = children.get_mut(&self.mixed_leaf_key) {
                        clash.direct_leaves.extend(node.direct_leaves.iter().cloned());
                    }
                    return self.branch_of(&children);
                }
                match self.branch_of(&node.children) {
                    Some(CanonicalDocument::Branch(mut map)) => {
                        map.insert(self.mixed_leaf_key.clone(), Self::leaves_of(node));
                        Some(CanonicalDocument::Branch(map))
                    }
                    // Every branch child was hollow; what's left is a list.
                    _ => Some(Self::leaves_of(node)),
                }
            }
        }
    }

    /// Normalize a nameless forest root: its children become the top-level
    /// keys.  An empty forest is an empty mapping.
    pub fn normalize_forest(&self, forest: &InternalNode) -> CanonicalDocument {
        self.normalize_node(forest)
            .unwrap_or_else(CanonicalDocument::empty)
    }

    /// Normalize a named root, keeping its label as the single top-level key.
    pub fn normalize_rooted(&self, root: &InternalNode) -> CanonicalDocument {
        match self.normalize_node(root) {
            Some(content) => {
                let mut map = BTreeMap::new();
                map.insert(root.label.clone(), content);
                CanonicalDocument::Branch(map)
            }
            None => CanonicalDocument::empty(),
        }
    }
}
