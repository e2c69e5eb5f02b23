use std::path::Path;

use serde::{Deserialize, Serialize};
use ustr::{ustr, UstrSet};

use crate::error::{HierarchyError, Result};
use crate::filter::FilterPolicy;
use crate::normalize::{Normalizer, DEFAULT_MIXED_LEAF_KEY};
use crate::taxonomy::{SynsetId, Taxonomy};

fn default_root_id() -> String {
    "entity.n.01".to_string()
}

fn default_max_depth() -> usize {
    3
}

fn default_primary_sense_only() -> bool {
    true
}

fn default_mixed_leaf_key() -> String {
    DEFAULT_MIXED_LEAF_KEY.to_string()
}

/// Options for one generation run, e.g. from a TOML file like:
///
/// ```toml
/// root_id = "animal.n.01"
/// max_depth = 4
/// blacklist = ["abstraction", "communication"]
/// max_hypernym_depth = 6
/// ```
///
/// Everything is optional.  Nothing here is acted on until `validate` has
/// been called, which the pipeline always does before traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyOptions {
    /// Top-down root; a synset name or a WNID.
    #[serde(default = "default_root_id")]
    pub root_id: String,
    /// Levels of branch nesting allowed below the root before flattening.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// When present, only these ids may appear as leaves.
    #[serde(default)]
    pub valid_ids: Option<Vec<String>>,
    #[serde(default)]
    pub blacklist: Vec<String>,
    #[serde(default = "default_primary_sense_only")]
    pub primary_sense_only: bool,
    /// Bottom-up only.  Longest leaf-to-ancestor path kept, counting the
    /// leaf, so 2 keeps just the immediate hypernym.  None walks all the way
    /// to the taxonomy root.
    #[serde(default)]
    pub max_hypernym_depth: Option<u32>,
    #[serde(default = "default_mixed_leaf_key")]
    pub mixed_leaf_key: String,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        HierarchyOptions {
            root_id: default_root_id(),
            max_depth: default_max_depth(),
            valid_ids: None,
            blacklist: vec![],
            primary_sense_only: default_primary_sense_only(),
            max_hypernym_depth: None,
            mixed_leaf_key: default_mixed_leaf_key(),
        }
    }
}

/// A filter policy with `valid_ids` resolved against a taxonomy.
#[derive(Debug, Clone)]
pub struct ResolvedPolicy {
    pub policy: FilterPolicy,
    /// `valid_ids` entries the taxonomy doesn't know, in input order.
    pub unresolved_valid_ids: Vec<String>,
}

impl HierarchyOptions {
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let options: HierarchyOptions = toml::from_str(config_str)?;
        Ok(options)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&config_str)
    }

    /// Reject option combinations that can never produce a meaningful
    /// traversal.  Checks that need the taxonomy live in `validate_root` and
    /// `resolve_policy`.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(HierarchyError::invalid_config("max_depth must be at least 1"));
        }
        if let Some(depth @ (0 | 1)) = self.max_hypernym_depth {
            return Err(HierarchyError::invalid_config(format!(
                "max_hypernym_depth of {} admits no ancestors; leave it unset for no bound",
                depth
            )));
        }
        if let Some(valid_ids) = &self.valid_ids {
            if valid_ids.is_empty() {
                return Err(HierarchyError::invalid_config(
                    "valid_ids is present but empty, so nothing could be kept",
                ));
            }
        }
        if self.mixed_leaf_key.trim().is_empty() {
            return Err(HierarchyError::invalid_config("mixed_leaf_key must not be empty"));
        }
        Ok(())
    }

    /// Resolve `root_id` and make sure the policy doesn't prune it outright.
    pub fn validate_root<T: Taxonomy + ?Sized>(&self, taxonomy: &T) -> Result<SynsetId> {
        let root = taxonomy
            .resolve(&self.root_id)
            .ok_or_else(|| HierarchyError::not_found(&self.root_id))?;
        let label = taxonomy.label(root)?;
        if self.filter_policy().is_blacklisted(&label) {
            return Err(HierarchyError::invalid_config(format!(
                "root {} ({}) is itself blacklisted",
                self.root_id, label
            )));
        }
        Ok(root)
    }

    /// The policy for everything except `valid_ids`, which can only be
    /// turned into synset ids with a taxonomy at hand.
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::permissive()
            .with_blacklist(&self.blacklist)
            .with_max_hypernym_depth(self.max_hypernym_depth)
            .with_primary_sense_only(self.primary_sense_only)
    }

    /// Build the full filter policy, resolving `valid_ids` the same way
    /// `root_id` is resolved (synset names, padded or unpadded WNIDs).
    ///
    /// Entries that don't resolve are skipped with a warning and reported
    /// back.  If none resolve, or every one that does is blacklisted, no
    /// leaf could ever be kept and the options are rejected.
    pub fn resolve_policy<T: Taxonomy + ?Sized>(&self, taxonomy: &T) -> Result<ResolvedPolicy> {
        let policy = self.filter_policy();
        let valid_ids = match &self.valid_ids {
            Some(valid_ids) => valid_ids,
            None => {
                return Ok(ResolvedPolicy {
                    policy,
                    unresolved_valid_ids: vec![],
                })
            }
        };

        let mut resolved = UstrSet::default();
        let mut unresolved = vec![];
        for raw in valid_ids {
            match taxonomy.resolve(raw) {
                Some(id) => {
                    resolved.insert(id);
                }
                None => {
                    warn!(valid_id = raw.as_str(), "valid id is not in the taxonomy");
                    unresolved.push(raw.clone());
                }
            }
        }
        if resolved.is_empty() {
            return Err(HierarchyError::invalid_config(format!(
                "none of the {} valid_ids resolve in the taxonomy",
                valid_ids.len()
            )));
        }

        let mut allowed = 0;
        for id in resolved.iter() {
            if !policy.is_blacklisted(&taxonomy.label(*id)?) {
                allowed += 1;
            }
        }
        if allowed == 0 {
            return Err(HierarchyError::invalid_config(
                "every valid id is blacklisted, so nothing could be kept",
            ));
        }
        debug!(
            resolved = resolved.len(),
            allowed,
            unresolved = unresolved.len(),
            "resolved valid ids"
        );

        Ok(ResolvedPolicy {
            policy: policy.with_valid_ids(resolved),
            unresolved_valid_ids: unresolved,
        })
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.mixed_leaf_key.clone())
    }
}
