use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::from_reader;
use ustr::Ustr;

use crate::error::Result;
use crate::taxonomy::MemoryTaxonomy;

/// One synset of an exported lexical database.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynsetRecord {
    /// The identifier everything else refers to, usually a WNID.
    pub id: Ustr,
    /// Optional dotted synset name like `dog.n.01` so callers can name roots
    /// the way WordNet users are used to.
    #[serde(default)]
    pub name: Option<String>,
    /// Lemma names, most common first.  Must be non-empty.
    pub lemmas: Vec<String>,
    /// Direct hypernyms, most relevant first.
    #[serde(default)]
    pub hypernyms: Vec<Ustr>,
}

/// Schema for taxonomy export files.  Records are expected in sense order;
/// see `MemoryTaxonomy` for why that matters.
#[derive(Debug, Deserialize)]
pub struct TaxonomyJson {
    pub synsets: Vec<SynsetRecord>,
}

pub fn parse_taxonomy(json: &str) -> Result<MemoryTaxonomy> {
    let parsed: TaxonomyJson = serde_json::from_str(json)?;
    MemoryTaxonomy::from_records(parsed.synsets)
}

pub fn read_taxonomy(path: &Path) -> Result<MemoryTaxonomy> {
    let file = File::open(path)?;
    let parsed: TaxonomyJson = from_reader(BufReader::new(file))?;
    info!(path = %path.display(), synsets = parsed.synsets.len(), "loaded taxonomy");
    MemoryTaxonomy::from_records(parsed.synsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HierarchyError;
    use crate::taxonomy::Taxonomy;
    use ustr::ustr;

    #[test]
    fn test_parse_taxonomy() {
        let tax = parse_taxonomy(
            r#"{
                "synsets": [
                    { "id": "n00001740", "name": "entity.n.01", "lemmas": ["entity"] },
                    { "id": "n00015388", "name": "animal.n.01", "lemmas": ["animal", "beast"],
                      "hypernyms": ["n00001740"] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(tax.len(), 2);
        assert_eq!(tax.resolve("animal.n.01"), Some(ustr("n00015388")));
        assert_eq!(
            tax.hyponyms(ustr("n00001740")).unwrap(),
            vec![ustr("n00015388")]
        );
    }

    #[test]
    fn test_parse_taxonomy_rejects_garbage() {
        assert!(matches!(
            parse_taxonomy("{\"synsets\": 5}"),
            Err(HierarchyError::DataProblem(_))
        ));
    }
}
