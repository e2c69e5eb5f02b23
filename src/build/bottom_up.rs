use itertools::Itertools;
use ustr::UstrSet;

use crate::error::Result;
use crate::filter::{FilterPolicy, Verdict};
use crate::taxonomy::{SynsetId, Taxonomy};
use crate::tree::InternalNode;

/// Result of a bottom-up build.  Partial coverage is normal, so the leaves we
/// couldn't place are reported here rather than as errors.
#[derive(Debug)]
pub struct BottomUpBuild {
    /// Nameless root whose children are the topmost surviving ancestors.
    pub forest: InternalNode,
    /// Input identifiers the taxonomy doesn't know about.
    pub unresolved: Vec<String>,
    /// Leaves whose every ancestor was excluded by the policy.
    pub dropped: usize,
    /// Leaves that were placed in the forest.
    pub placed: usize,
}

/// Walk up from `leaf`, following the first not-yet-visited hypernym at each
/// step, and return the labels of the ancestors that survive the policy,
/// nearest first.
///
/// The walk ends at the taxonomy root, at the first pruned ancestor (a pruned
/// node can't carry anything above it into the tree), or once the path would
/// exceed the hypernym depth bound.  The path counts the leaf itself, so a
/// bound of 2 keeps only the immediate hypernym.
fn surviving_ancestors<T: Taxonomy + ?Sized>(
    taxonomy: &T,
    leaf: SynsetId,
    policy: &FilterPolicy,
) -> Result<Vec<String>> {
    let mut chain = vec![];
    let mut visited = UstrSet::default();
    visited.insert(leaf);

    let mut current = leaf;
    // Path length so far, leaf included.
    let mut distance = 1;
    loop {
        let next = match taxonomy
            .hypernyms(current)?
            .into_iter()
            .find(|hyper| !visited.contains(hyper))
        {
            Some(next) => next,
            None => break,
        };
        distance += 1;

        let label = taxonomy.label(next)?;
        match policy.evaluate(taxonomy, next, &label, Some(distance))? {
            Verdict::Keep => {
                trace!(leaf = %leaf, ancestor = %next, distance, "ascending");
                chain.push(label);
                visited.insert(next);
                current = next;
            }
            Verdict::Prune(reason) => {
                trace!(leaf = %leaf, ancestor = %next, ?reason, "ancestor pruned, cutting chain");
                break;
            }
            Verdict::StopAscending => {
                trace!(leaf = %leaf, distance, "hypernym depth reached");
                break;
            }
        }
    }

    Ok(chain)
}

/// Build a forest from a flat set of leaf identifiers by walking each leaf's
/// hypernym chain and inserting it from the topmost surviving ancestor down.
/// Chains that share ancestors share nodes.
pub fn build_bottom_up<T: Taxonomy + ?Sized>(
    taxonomy: &T,
    leaves: &[String],
    policy: &FilterPolicy,
) -> Result<BottomUpBuild> {
    let mut build = BottomUpBuild {
        forest: InternalNode::forest(),
        unresolved: vec![],
        dropped: 0,
        placed: 0,
    };

    for input in leaves.iter().unique() {
        let leaf = match taxonomy.resolve(input) {
            Some(id) => id,
            None => {
                warn!(leaf = input.as_str(), "skipping unresolved leaf");
                build.unresolved.push(input.clone());
                continue;
            }
        };

        let leaf_label = taxonomy.label(leaf)?;
        let chain = surviving_ancestors(taxonomy, leaf, policy)?;
        if chain.is_empty() {
            debug!(leaf = %leaf, label = leaf_label.as_str(), "no surviving ancestors, dropping");
            build.dropped += 1;
            continue;
        }

        let mut node = &mut build.forest;
        for ancestor in chain.iter().rev() {
            node = node.child_mut(ancestor);
        }
        node.add_leaf(leaf_label);
        build.placed += 1;
    }

    info!(
        placed = build.placed,
        dropped = build.dropped,
        unresolved = build.unresolved.len(),
        "bottom-up build complete"
    );
    Ok(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_format::taxonomy_json::SynsetRecord;
    use crate::taxonomy::MemoryTaxonomy;
    use ustr::ustr;

    /// a -> b -> c -> d, plus a cycle back-reference from c to d.
    fn chain_taxonomy() -> MemoryTaxonomy {
        let rec = |id: &str, hypernyms: &[&str]| SynsetRecord {
            id: ustr(id),
            name: Some(format!("{}.n.01", id)),
            lemmas: vec![id.to_string()],
            hypernyms: hypernyms.iter().map(|s| ustr(s)).collect(),
        };
        MemoryTaxonomy::from_records(vec![
            rec("a", &[]),
            rec("b", &["a"]),
            rec("c", &["b", "d"]),
            rec("d", &["c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_full_chain() {
        let tax = chain_taxonomy();
        let build =
            build_bottom_up(&tax, &["d".to_string()], &FilterPolicy::permissive()).unwrap();
        let c = &build.forest.children["a"].children["b"].children["c"];
        assert_eq!(c.direct_leaves.iter().collect::<Vec<_>>(), vec!["d"]);
        assert_eq!(build.placed, 1);
    }

    #[test]
    fn test_hypernym_depth_cuts_chain() {
        let tax = chain_taxonomy();
        let policy = FilterPolicy::permissive().with_max_hypernym_depth(Some(2));
        let build = build_bottom_up(&tax, &["d".to_string()], &policy).unwrap();
        assert_eq!(build.forest.children.keys().collect::<Vec<_>>(), vec!["c"]);
        let c = &build.forest.children["c"];
        assert!(c.children.is_empty());
        assert_eq!(c.direct_leaves.iter().collect::<Vec<_>>(), vec!["d"]);

        // One more level brings in "b" above "c", and nothing else.
        let policy = FilterPolicy::permissive().with_max_hypernym_depth(Some(3));
        let build = build_bottom_up(&tax, &["d".to_string()], &policy).unwrap();
        assert_eq!(build.forest.children.keys().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(
            build.forest.children["b"].children.keys().collect::<Vec<_>>(),
            vec!["c"]
        );

        // A bound of 1 is the leaf alone, so the leaf has nowhere to go.
        let policy = FilterPolicy::permissive().with_max_hypernym_depth(Some(1));
        let build = build_bottom_up(&tax, &["d".to_string()], &policy).unwrap();
        assert!(build.forest.is_empty());
        assert_eq!(build.dropped, 1);
    }

    #[test]
    fn test_blacklisted_ancestor_cuts_chain() {
        let tax = chain_taxonomy();
        let policy = FilterPolicy::permissive().with_blacklist(["b"]);
        let build = build_bottom_up(&tax, &["d".to_string()], &policy).unwrap();
        assert_eq!(build.forest.children.keys().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_unresolved_and_dropped() {
        let tax = chain_taxonomy();
        let policy = FilterPolicy::permissive().with_blacklist(["c"]);
        let leaves = vec!["d".to_string(), "zzz".to_string(), "d".to_string()];
        let build = build_bottom_up(&tax, &leaves, &policy).unwrap();
        assert_eq!(build.unresolved, vec!["zzz".to_string()]);
        assert_eq!(build.dropped, 1);
        assert_eq!(build.placed, 0);
        assert!(build.forest.is_empty());
    }
}
