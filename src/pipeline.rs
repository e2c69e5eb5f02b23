/*!
One function per kind of source, each going options -> build -> normalize.

All of them validate before doing any work, so an `InvalidConfiguration`
error always means nothing was traversed.  A run that legitimately filters
everything away returns an empty document along with a warning in the log.
*/

use std::collections::HashMap;

use serde_json::Value;

use crate::build::{
    build_bottom_up, build_top_down, tree_from_category_pairs, tree_from_openimages,
    tree_from_value,
};
use crate::config::HierarchyOptions;
use crate::error::{HierarchyError, Result};
use crate::file_format::openimages::OpenImagesNode;
use crate::normalize::{CanonicalDocument, Normalizer};
use crate::taxonomy::{CachedTaxonomy, Taxonomy};
use crate::tree::InternalNode;

/// The canonical document plus what the caller should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyReport {
    pub document: CanonicalDocument,
    /// Input identifiers that couldn't be resolved and were skipped: leaf
    /// ids bottom-up, `valid_ids` entries top-down.
    pub unresolved: Vec<String>,
    /// Leaves (bottom-up) or hyponyms (top-down) excluded by the filter policy.
    pub dropped: usize,
    /// Nodes collapsed into leaf lists at the depth bound.
    pub flattened: usize,
}

impl HierarchyReport {
    fn new(document: CanonicalDocument) -> Self {
        if document.is_empty() {
            warn!("every branch was filtered out; the hierarchy is empty");
        }
        HierarchyReport {
            document,
            unresolved: vec![],
            dropped: 0,
            flattened: 0,
        }
    }

    /// Turn skipped leaves into a hard failure for callers that want one.
    pub fn require_all_resolved(&self) -> Result<()> {
        match self.unresolved.first() {
            Some(first) => Err(HierarchyError::unresolved_leaf(first)),
            None => Ok(()),
        }
    }
}

fn check_max_depth(max_depth: usize) -> Result<()> {
    if max_depth == 0 {
        return Err(HierarchyError::invalid_config("max_depth must be at least 1"));
    }
    Ok(())
}

/// Count the nodes `flatten_below` is about to collapse.
fn count_flattenable(node: &InternalNode, max_depth: usize) -> usize {
    if max_depth == 0 {
        return usize::from(!node.children.is_empty());
    }
    node.children
        .values()
        .map(|child| count_flattenable(child, max_depth - 1))
        .sum()
}

/// Normalize an already-built forest after bounding its nesting at
/// `max_depth` mapping levels.
fn finish_forest(mut forest: InternalNode, max_depth: usize, normalizer: &Normalizer) -> HierarchyReport {
    let flattened = count_flattenable(&forest, max_depth);
    forest.flatten_below(max_depth);
    forest.prune_empty();
    let mut report = HierarchyReport::new(normalizer.normalize_forest(&forest));
    report.flattened = flattened;
    report
}

/// Bottom-up: place each WNID (or synset name) under its surviving ancestors.
pub fn generate_wnid_hierarchy<T: Taxonomy + ?Sized>(
    taxonomy: &T,
    ids: &[String],
    options: &HierarchyOptions,
) -> Result<HierarchyReport> {
    options.validate()?;
    let policy = options.filter_policy();
    let cached = CachedTaxonomy::new(taxonomy);

    info!(leaves = ids.len(), "generating hierarchy from leaf ids");
    let build = build_bottom_up(&cached, ids, &policy)?;

    let mut report = finish_forest(build.forest, options.max_depth, &options.normalizer());
    report.unresolved = build.unresolved;
    report.dropped = build.dropped;
    Ok(report)
}

/// Top-down from `options.root_id`.
pub fn generate_tree_hierarchy<T: Taxonomy + ?Sized>(
    taxonomy: &T,
    options: &HierarchyOptions,
) -> Result<HierarchyReport> {
    options.validate()?;
    let cached = CachedTaxonomy::new(taxonomy);
    let root = options.validate_root(&cached)?;
    let resolved = options.resolve_policy(&cached)?;

    let build = build_top_down(&cached, root, options.max_depth, &resolved.policy)?;
    debug!(
        cached_hyponym_lists = cached.cached_hyponym_count(),
        "taxonomy cache after traversal"
    );

    let mut report = HierarchyReport::new(options.normalizer().normalize_rooted(&build.root));
    report.unresolved = resolved.unresolved_valid_ids;
    report.dropped = build.pruned;
    report.flattened = build.flattened;
    Ok(report)
}

/// Flat `(category, supercategory)` pairs, e.g. from COCO annotations.
pub fn generate_coco_hierarchy(pairs: &[(String, String)], max_depth: usize) -> Result<HierarchyReport> {
    check_max_depth(max_depth)?;
    info!(categories = pairs.len(), "generating hierarchy from category pairs");
    Ok(finish_forest(
        tree_from_category_pairs(pairs),
        max_depth,
        &Normalizer::default(),
    ))
}

pub fn generate_openimages_hierarchy(
    root: &OpenImagesNode,
    names: &HashMap<String, String>,
    max_depth: usize,
) -> Result<HierarchyReport> {
    check_max_depth(max_depth)?;
    Ok(finish_forest(
        tree_from_openimages(root, names),
        max_depth,
        &Normalizer::default(),
    ))
}

/// An already-curated hierarchy; only the depth bound is applied.
pub fn generate_prebuilt_hierarchy(tree: &Value, max_depth: usize) -> Result<HierarchyReport> {
    check_max_depth(max_depth)?;
    Ok(finish_forest(
        tree_from_value(tree),
        max_depth,
        &Normalizer::default(),
    ))
}
