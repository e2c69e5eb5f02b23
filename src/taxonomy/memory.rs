use std::collections::HashMap;

use ustr::{UstrMap, UstrSet};

use super::{SynsetId, Taxonomy};
use crate::error::{HierarchyError, Result};
use crate::file_format::taxonomy_json::SynsetRecord;
use crate::file_format::wnid::normalize_wnid;

struct SynsetEntry {
    lemmas: Vec<String>,
    hypernyms: Vec<SynsetId>,
    hyponyms: Vec<SynsetId>,
}

/// A lexical database held entirely in memory.
///
/// Hyponym lists are derived from the hypernym links of the records, in record
/// order.  The sense index maps each lemma to the synsets that list it, again
/// in record order, so the first record mentioning a lemma is that lemma's
/// primary sense.  Exports are expected to list synsets in sense order, which
/// is what a WordNet dump naturally gives you.
pub struct MemoryTaxonomy {
    synsets: UstrMap<SynsetEntry>,
    by_name: HashMap<String, SynsetId>,
    senses: HashMap<String, Vec<SynsetId>>,
}

impl MemoryTaxonomy {
    pub fn from_records(records: impl IntoIterator<Item = SynsetRecord>) -> Result<Self> {
        let mut synsets: UstrMap<SynsetEntry> = UstrMap::default();
        let mut by_name = HashMap::new();
        let mut senses: HashMap<String, Vec<SynsetId>> = HashMap::new();
        let mut order = vec![];

        for record in records {
            if record.lemmas.is_empty() {
                return Err(HierarchyError::bad_data(format!(
                    "synset {} has no lemma names",
                    record.id
                )));
            }
            if synsets.contains_key(&record.id) {
                return Err(HierarchyError::bad_data(format!(
                    "synset {} is listed twice",
                    record.id
                )));
            }
            if let Some(name) = &record.name {
                by_name.insert(name.clone(), record.id);
            }
            for lemma in &record.lemmas {
                senses.entry(lemma.clone()).or_default().push(record.id);
            }
            order.push(record.id);
            synsets.insert(
                record.id,
                SynsetEntry {
                    lemmas: record.lemmas,
                    hypernyms: record.hypernyms,
                    hyponyms: vec![],
                },
            );
        }

        // Derive the downward links now that every record is known.
        let mut links = vec![];
        for id in &order {
            let entry = &synsets[id];
            for hyper in &entry.hypernyms {
                if synsets.contains_key(hyper) {
                    links.push((*hyper, *id));
                } else {
                    warn!(synset = %id, hypernym = %hyper, "ignoring dangling hypernym link");
                }
            }
        }
        for (hyper, hypo) in links {
            if let Some(entry) = synsets.get_mut(&hyper) {
                entry.hyponyms.push(hypo);
            }
        }
        let known: UstrSet = order.iter().copied().collect();
        for entry in synsets.values_mut() {
            entry.hypernyms.retain(|h| known.contains(h));
        }

        Ok(MemoryTaxonomy {
            synsets,
            by_name,
            senses,
        })
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    fn entry(&self, id: SynsetId) -> Result<&SynsetEntry> {
        self.synsets
            .get(&id)
            .ok_or_else(|| HierarchyError::not_found(id.as_str()))
    }
}

impl Taxonomy for MemoryTaxonomy {
    fn hypernyms(&self, id: SynsetId) -> Result<Vec<SynsetId>> {
        Ok(self.entry(id)?.hypernyms.clone())
    }

    fn hyponyms(&self, id: SynsetId) -> Result<Vec<SynsetId>> {
        Ok(self.entry(id)?.hyponyms.clone())
    }

    fn lemma_names(&self, id: SynsetId) -> Result<Vec<String>> {
        Ok(self.entry(id)?.lemmas.clone())
    }

    fn is_primary_sense(&self, id: SynsetId) -> Result<bool> {
        let entry = self.entry(id)?;
        let first_lemma = match entry.lemmas.first() {
            Some(lemma) => lemma,
            None => return Ok(false),
        };
        Ok(self
            .senses
            .get(first_lemma)
            .and_then(|ids| ids.first())
            .map_or(false, |primary| *primary == id))
    }

    fn contains(&self, id: SynsetId) -> bool {
        self.synsets.contains_key(&id)
    }

    fn resolve(&self, name: &str) -> Option<SynsetId> {
        let direct = ustr::ustr(name);
        if self.synsets.contains_key(&direct) {
            return Some(direct);
        }
        if let Some(id) = self.by_name.get(name) {
            return Some(*id);
        }
        let normalized = ustr::ustr(&normalize_wnid(name)?);
        self.synsets.contains_key(&normalized).then_some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ustr::ustr;

    fn rec(id: &str, name: &str, lemmas: &[&str], hypernyms: &[&str]) -> SynsetRecord {
        SynsetRecord {
            id: ustr(id),
            name: Some(name.to_string()),
            lemmas: lemmas.iter().map(|s| s.to_string()).collect(),
            hypernyms: hypernyms.iter().map(|s| ustr(s)).collect(),
        }
    }

    fn old_man_taxonomy() -> MemoryTaxonomy {
        MemoryTaxonomy::from_records(vec![
            rec("n00000001", "person.n.01", &["person"], &[]),
            rec("n00000002", "old_man.n.01", &["old_man", "greybeard"], &["n00000001"]),
            rec("n00000003", "old_man.n.02", &["old_man"], &["n00000001"]),
            rec("n00000004", "old_man.n.03", &["old_man", "boss"], &["n00000001"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_primary_sense_is_first_listed() {
        let tax = old_man_taxonomy();
        assert!(tax.is_primary_sense(ustr("n00000002")).unwrap());
        assert!(!tax.is_primary_sense(ustr("n00000003")).unwrap());
        assert!(!tax.is_primary_sense(ustr("n00000004")).unwrap());
        assert!(tax.is_primary_sense(ustr("n00000001")).unwrap());
    }

    #[test]
    fn test_hyponyms_are_derived_in_record_order() {
        let tax = old_man_taxonomy();
        assert_eq!(
            tax.hyponyms(ustr("n00000001")).unwrap(),
            vec![ustr("n00000002"), ustr("n00000003"), ustr("n00000004")]
        );
        assert!(tax.hypernyms(ustr("n00000001")).unwrap().is_empty());
        assert_eq!(tax.label(ustr("n00000002")).unwrap(), "old man");
    }

    #[test]
    fn test_lookup_failures() {
        let tax = old_man_taxonomy();
        assert!(matches!(
            tax.hyponyms(ustr("n99999999")),
            Err(HierarchyError::NotFound(_))
        ));
        assert_eq!(tax.resolve("old_man.n.02"), Some(ustr("n00000003")));
        assert_eq!(tax.resolve("n1"), Some(ustr("n00000001")));
        assert_eq!(tax.resolve("nope.n.01"), None);
    }

    #[test]
    fn test_rejects_bad_records() {
        let dup = MemoryTaxonomy::from_records(vec![
            rec("n00000001", "a.n.01", &["a"], &[]),
            rec("n00000001", "b.n.01", &["b"], &[]),
        ]);
        assert!(matches!(dup, Err(HierarchyError::DataProblem(_))));

        let empty = MemoryTaxonomy::from_records(vec![rec("n00000001", "a.n.01", &[], &[])]);
        assert!(matches!(empty, Err(HierarchyError::DataProblem(_))));
    }

    #[test]
    fn test_dangling_hypernyms_are_ignored() {
        let tax = MemoryTaxonomy::from_records(vec![rec(
            "n00000005",
            "orphan.n.01",
            &["orphan"],
            &["n00000404"],
        )])
        .unwrap();
        assert!(tax.hypernyms(ustr("n00000005")).unwrap().is_empty());
    }
}
