use ustr::UstrSet;

use crate::error::{HierarchyError, Result};
use crate::filter::{FilterPolicy, Verdict};
use crate::taxonomy::{SynsetId, Taxonomy};
use crate::tree::InternalNode;

/// Result of a top-down build.
#[derive(Debug)]
pub struct TopDownBuild {
    /// The root category.  Empty if the root was pruned or nothing beneath it
    /// survived.
    pub root: InternalNode,
    /// Hyponyms excluded by the primary-sense or blacklist checks.
    pub pruned: usize,
    /// Nodes whose subtrees were collapsed into leaf lists at the depth bound.
    pub flattened: usize,
}

/// What a node turned into from its parent's point of view.
enum Expansion {
    /// Nothing beneath it is wanted and it isn't wanted as a leaf either.
    Dropped,
    Leaf(String),
    Branch(InternalNode),
}

/// Recursive descent over hyponyms from a root, bounded by `max_depth`.
///
/// ### Depth-limit flattening
///
/// A node reached at `max_depth` doesn't get branch children.  Instead we run
/// the same expansion with no depth bound (still honoring the filter policy)
/// and keep only the leaves of the resulting subtree as the node's direct
/// leaves.  Running the identical expansion is what guarantees the flattened
/// list holds exactly the leaves the unbounded tree would have had.
///
/// ### Valid ids
///
/// With a valid-id set, whether a node is kept depends on what survives
/// beneath it, so it's decided after recursing:
/// - nothing survived and the node is valid: it becomes a leaf.
/// - nothing survived and the node isn't valid: it's dropped.
/// - something survived: it's a branch, and if it's valid itself its own
///   label is also listed among its direct leaves.
///
/// ### Cycles
///
/// The identifiers on the current path are threaded through the recursion;
/// a hyponym already on the path is skipped.
pub struct TopDownBuilder<'a, T: ?Sized> {
    taxonomy: &'a T,
    policy: &'a FilterPolicy,
    max_depth: usize,
    pruned: usize,
    flattened: usize,
}

impl<'a, T: Taxonomy + ?Sized> TopDownBuilder<'a, T> {
    pub fn new(taxonomy: &'a T, policy: &'a FilterPolicy, max_depth: usize) -> Self {
        TopDownBuilder {
            taxonomy,
            policy,
            max_depth,
            pruned: 0,
            flattened: 0,
        }
    }

    pub fn build(mut self, root: SynsetId) -> Result<TopDownBuild> {
        if self.max_depth == 0 {
            return Err(HierarchyError::invalid_config("max_depth must be at least 1"));
        }
        if !self.taxonomy.contains(root) {
            return Err(HierarchyError::not_found(root.as_str()));
        }

        let label = self.taxonomy.label(root)?;
        info!(root = %root, label = label.as_str(), max_depth = self.max_depth, "building top-down");

        if let Verdict::Prune(reason) = self.policy.evaluate(self.taxonomy, root, &label, None)? {
            warn!(root = %root, ?reason, "root itself is pruned by the filter policy");
            return Ok(TopDownBuild {
                root: InternalNode::new(label),
                pruned: 1,
                flattened: 0,
            });
        }

        let mut path = UstrSet::default();
        path.insert(root);
        let root_node = match self.expand(root, label.clone(), 0, Some(self.max_depth), &mut path)? {
            Expansion::Dropped => InternalNode::new(label),
            // The root is the only node with no parent to list it, so a root
            // that is just a leaf lists itself.
            Expansion::Leaf(leaf) => {
                let mut node = InternalNode::new(label);
                node.add_leaf(leaf);
                node
            }
            Expansion::Branch(node) => node,
        };

        debug!(pruned = self.pruned, flattened = self.flattened, "top-down build complete");
        Ok(TopDownBuild {
            root: root_node,
            pruned: self.pruned,
            flattened: self.flattened,
        })
    }

    /// Expand a node that has already passed the policy checks.
    fn expand(
        &mut self,
        id: SynsetId,
        label: String,
        depth: usize,
        limit: Option<usize>,
        path: &mut UstrSet,
    ) -> Result<Expansion> {
        if limit.map_or(false, |limit| depth >= limit) {
            trace!(id = %id, depth, "flattening at depth bound");
            return Ok(match self.expand(id, label, depth, None, path)? {
                Expansion::Branch(full) => {
                    self.flattened += 1;
                    let mut flat = InternalNode::new(full.label.clone());
                    flat.direct_leaves = full.all_leaves();
                    Expansion::Branch(flat)
                }
                other => other,
            });
        }

        let mut node = InternalNode::new(label);
        for hypo in self.taxonomy.hyponyms(id)? {
            if path.contains(&hypo) {
                debug!(id = %id, hyponym = %hypo, "skipping hyponym already on the path");
                continue;
            }
            let hypo_label = self.taxonomy.label(hypo)?;
            if let Verdict::Prune(reason) =
                self.policy.evaluate(self.taxonomy, hypo, &hypo_label, None)?
            {
                trace!(hyponym = %hypo, ?reason, "pruned");
                self.pruned += 1;
                continue;
            }

            path.insert(hypo);
            let expanded = self.expand(hypo, hypo_label, depth + 1, limit, path);
            path.remove(&hypo);

            match expanded? {
                Expansion::Dropped => {}
                Expansion::Leaf(leaf) => node.add_leaf(leaf),
                Expansion::Branch(child) => node.merge_child(child),
            }
        }

        let valid = self.policy.accepts_leaf(id);
        if node.is_empty() {
            return Ok(if valid {
                Expansion::Leaf(node.label)
            } else {
                Expansion::Dropped
            });
        }
        if valid && self.policy.valid_ids().is_some() {
            let own = node.label.clone();
            node.add_leaf(own);
        }
        Ok(Expansion::Branch(node))
    }
}

/// Convenience wrapper around `TopDownBuilder`.
pub fn build_top_down<T: Taxonomy + ?Sized>(
    taxonomy: &T,
    root: SynsetId,
    max_depth: usize,
    policy: &FilterPolicy,
) -> Result<TopDownBuild> {
    TopDownBuilder::new(taxonomy, policy, max_depth).build(root)
}
