use std::collections::{BTreeMap, BTreeSet};

/// The structural case a node falls into.  The normalizer is a total function
/// over these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// No children and no leaves; contributes nothing.
    Empty,
    /// Only direct leaves.
    Leaves,
    /// Only child branches.
    Branch,
    /// Both child branches and direct leaves.
    Mixed,
}

/// The builders' working representation of one category.
///
/// Children and direct leaves are kept in sorted containers.  That is our
/// ordering policy for all output: lexical, so that identical inputs always
/// produce byte-identical documents regardless of taxonomy enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalNode {
    pub label: String,
    pub children: BTreeMap<String, InternalNode>,
    pub direct_leaves: BTreeSet<String>,
}

impl InternalNode {
    pub fn new(label: impl Into<String>) -> Self {
        InternalNode {
            label: label.into(),
            children: BTreeMap::new(),
            direct_leaves: BTreeSet::new(),
        }
    }

    /// A nameless node used to hold a forest of independent roots.
    pub fn forest() -> Self {
        InternalNode::new("")
    }

    pub fn shape(&self) -> NodeShape {
        match (self.children.is_empty(), self.direct_leaves.is_empty()) {
            (true, true) => NodeShape::Empty,
            (true, false) => NodeShape::Leaves,
            (false, true) => NodeShape::Branch,
            (false, false) => NodeShape::Mixed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shape() == NodeShape::Empty
    }

    pub fn add_leaf(&mut self, leaf: impl Into<String>) {
        self.direct_leaves.insert(leaf.into());
    }

    /// Get the child with the given label, creating it if needed.  This is how
    /// chains sharing a prefix of ancestors end up sharing nodes.
    pub fn child_mut(&mut self, label: &str) -> &mut InternalNode {
        self.children
            .entry(label.to_string())
            .or_insert_with(|| InternalNode::new(label))
    }

    /// Attach `child`, merging it into an existing child with the same label.
    pub fn merge_child(&mut self, child: InternalNode) {
        match self.children.get_mut(&child.label) {
            Some(existing) => existing.merge(child),
            None => {
                self.children.insert(child.label.clone(), child);
            }
        }
    }

    /// Fold another node's children and leaves into this one.
    pub fn merge(&mut self, other: InternalNode) {
        self.direct_leaves.extend(other.direct_leaves);
        for (_, child) in other.children {
            self.merge_child(child);
        }
    }

    /// Every leaf label at or below this node.
    pub fn all_leaves(&self) -> BTreeSet<String> {
        let mut leaves = BTreeSet::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, into: &mut BTreeSet<String>) {
        into.extend(self.direct_leaves.iter().cloned());
        for child in self.children.values() {
            child.collect_leaves(into);
        }
    }

    /// Number of branch edges on the longest path below this node.  A node
    /// holding only leaves has depth 0.
    pub fn branch_depth(&self) -> usize {
        self.children
            .values()
            .map(|child| child.branch_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Collapse every branch `max_depth` edges below this node into a flat
    /// list of all of the leaves beneath it.  This is the structural version
    /// of depth-limit flattening for sources that are already hierarchical.
    pub fn flatten_below(&mut self, max_depth: usize) {
        if max_depth == 0 {
            let leaves = self.all_leaves();
            self.children.clear();
            self.direct_leaves = leaves;
            return;
        }
        for child in self.children.values_mut() {
            child.flatten_below(max_depth - 1);
        }
    }

    /// Drop children that have nothing in them, bottom-up.
    pub fn prune_empty(&mut self) {
        for child in self.children.values_mut() {
            child.prune_empty();
        }
        self.children.retain(|_, child| !child.is_empty());
    }
}
