use std::collections::BTreeSet;

use ustr::UstrSet;

use crate::error::Result;
use crate::taxonomy::{lemma_to_label, SynsetId, Taxonomy};

/// High-level categories that rarely make useful wildcard groups.
pub const DEFAULT_BLACKLIST: &[&str] = &["abstraction", "communication"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    /// Not the first-listed sense of its lemma; slang and rare meanings.
    SecondarySense,
    Blacklisted,
}

/// Outcome of checking one node against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    /// The node and everything that would hang off of it is excluded.
    Prune(PruneReason),
    /// Bottom-up only: the hypernym walk has gone as far as it may.
    StopAscending,
}

fn normalize_label(label: &str) -> String {
    lemma_to_label(label.trim()).to_lowercase()
}

/// Per-run filter criteria.  Built once from the run options and only ever
/// read during traversal.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    valid_ids: Option<UstrSet>,
    blacklist: BTreeSet<String>,
    max_hypernym_depth: Option<u32>,
    primary_sense_only: bool,
}

impl FilterPolicy {
    /// A policy that keeps everything.
    pub fn permissive() -> Self {
        FilterPolicy::default()
    }

    pub fn with_valid_ids(mut self, valid_ids: UstrSet) -> Self {
        self.valid_ids = Some(valid_ids);
        self
    }

    pub fn with_blacklist<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blacklist = labels
            .into_iter()
            .map(|label| normalize_label(label.as_ref()))
            .collect();
        self
    }

    pub fn with_max_hypernym_depth(mut self, depth: Option<u32>) -> Self {
        self.max_hypernym_depth = depth;
        self
    }

    pub fn with_primary_sense_only(mut self, primary_sense_only: bool) -> Self {
        self.primary_sense_only = primary_sense_only;
        self
    }

    pub fn valid_ids(&self) -> Option<&UstrSet> {
        self.valid_ids.as_ref()
    }

    pub fn max_hypernym_depth(&self) -> Option<u32> {
        self.max_hypernym_depth
    }

    pub fn primary_sense_only(&self) -> bool {
        self.primary_sense_only
    }

    /// Blacklist matching ignores case and treats underscores as spaces so
    /// that `Communication` and `communication` or `living_thing` and
    /// `living thing` are the same entry.
    pub fn is_blacklisted(&self, label: &str) -> bool {
        !self.blacklist.is_empty() && self.blacklist.contains(&normalize_label(label))
    }

    /// Whether a node may show up as a leaf.  Without a valid-id set anything
    /// may; with one, only its members.  Nodes that fail this can still be
    /// kept as pass-through branches when something beneath them is valid.
    pub fn accepts_leaf(&self, id: SynsetId) -> bool {
        match &self.valid_ids {
            Some(valid) => valid.contains(&id),
            None => true,
        }
    }

    /// Check the per-node criteria in order: primary sense, blacklist, then
    /// (when a hypernym distance is given) the ascent bound.  The distance is
    /// the length of the path from the leaf up to `id`, counting both ends.
    ///
    /// Valid-id membership is not decided here because it depends on the
    /// node's descendants; the top-down builder applies it once it knows what
    /// survived beneath the node.
    pub fn evaluate<T: Taxonomy + ?Sized>(
        &self,
        taxonomy: &T,
        id: SynsetId,
        label: &str,
        hypernym_distance: Option<u32>,
    ) -> Result<Verdict> {
        if self.primary_sense_only && !taxonomy.is_primary_sense(id)? {
            return Ok(Verdict::Prune(PruneReason::SecondarySense));
        }
        if self.is_blacklisted(label) {
            return Ok(Verdict::Prune(PruneReason::Blacklisted));
        }
        if let (Some(max), Some(distance)) = (self.max_hypernym_depth, hypernym_distance) {
            if distance > max {
                return Ok(Verdict::StopAscending);
            }
        }
        Ok(Verdict::Keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_format::taxonomy_json::SynsetRecord;
    use crate::taxonomy::MemoryTaxonomy;
    use ustr::ustr;

    fn taxonomy() -> MemoryTaxonomy {
        let rec = |id: &str, lemmas: &[&str], hypernyms: &[&str]| SynsetRecord {
            id: ustr(id),
            name: None,
            lemmas: lemmas.iter().map(|s| s.to_string()).collect(),
            hypernyms: hypernyms.iter().map(|s| ustr(s)).collect(),
        };
        MemoryTaxonomy::from_records(vec![
            rec("n1", &["communication"], &[]),
            rec("n2", &["old_man"], &["n1"]),
            rec("n3", &["old_man", "boss"], &["n1"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_primary_sense_pruning() {
        let tax = taxonomy();
        let policy = FilterPolicy::permissive().with_primary_sense_only(true);
        assert_eq!(
            policy.evaluate(&tax, ustr("n3"), "old man", None).unwrap(),
            Verdict::Prune(PruneReason::SecondarySense)
        );
        assert_eq!(
            policy.evaluate(&tax, ustr("n2"), "old man", None).unwrap(),
            Verdict::Keep
        );

        let relaxed = FilterPolicy::permissive();
        assert_eq!(
            relaxed.evaluate(&tax, ustr("n3"), "old man", None).unwrap(),
            Verdict::Keep
        );
    }

    #[test]
    fn test_blacklist() {
        let tax = taxonomy();
        let policy = FilterPolicy::permissive().with_blacklist(DEFAULT_BLACKLIST);
        assert!(policy.is_blacklisted("Communication"));
        assert_eq!(
            policy.evaluate(&tax, ustr("n1"), "communication", None).unwrap(),
            Verdict::Prune(PruneReason::Blacklisted)
        );

        let underscored = FilterPolicy::permissive().with_blacklist(["living_thing"]);
        assert!(underscored.is_blacklisted("living thing"));
        assert!(!underscored.is_blacklisted("living"));
    }

    #[test]
    fn test_hypernym_distance() {
        let tax = taxonomy();
        let policy = FilterPolicy::permissive().with_max_hypernym_depth(Some(2));
        assert_eq!(
            policy.evaluate(&tax, ustr("n1"), "communication", Some(2)).unwrap(),
            Verdict::Keep
        );
        assert_eq!(
            policy.evaluate(&tax, ustr("n1"), "communication", Some(3)).unwrap(),
            Verdict::StopAscending
        );
        // Top-down evaluation never passes a distance.
        assert_eq!(
            policy.evaluate(&tax, ustr("n1"), "communication", None).unwrap(),
            Verdict::Keep
        );
    }

    #[test]
    fn test_accepts_leaf() {
        let open = FilterPolicy::permissive();
        assert!(open.accepts_leaf(ustr("n2")));

        let valid: UstrSet = [ustr("n2")].into_iter().collect();
        let restricted = FilterPolicy::permissive().with_valid_ids(valid);
        assert!(restricted.accepts_leaf(ustr("n2")));
        assert!(!restricted.accepts_leaf(ustr("n3")));
    }
}
