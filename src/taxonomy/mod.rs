/*!
Read-only view over a lexical graph.

Everything that builds hierarchies talks to the lexical database through the
`Taxonomy` trait.  Identifiers are interned `Ustr`s because the same handful of
high-level synsets get looked up over and over again while walking hypernym
chains, and because they're cheap to copy into visited-sets.

Two implementations live here:
- `MemoryTaxonomy` is a complete lexical database held in memory, typically
  loaded from a JSON export via `file_format::taxonomy_json`.
- `CachedTaxonomy` wraps any other implementation and memoizes lookups for the
  lifetime of one run.  The caller constructs and owns it; there is no global
  cache.
*/

mod cached;
mod memory;

pub use cached::CachedTaxonomy;
pub use memory::MemoryTaxonomy;

use ustr::Ustr;

use crate::error::Result;
use crate::file_format::wnid::normalize_wnid;

pub type SynsetId = Ustr;

/// Turn a raw lemma name into the human-readable label we emit.
pub fn lemma_to_label(lemma: &str) -> String {
    lemma.replace('_', " ")
}

pub trait Taxonomy {
    /// Direct hypernyms, most relevant first.  Empty at the taxonomy root.
    fn hypernyms(&self, id: SynsetId) -> Result<Vec<SynsetId>>;

    /// Direct hyponyms.  Empty for leaves.
    fn hyponyms(&self, id: SynsetId) -> Result<Vec<SynsetId>>;

    /// Non-empty ordered list of lemma names.
    fn lemma_names(&self, id: SynsetId) -> Result<Vec<String>>;

    /// True iff `id` is the first-listed sense of its first lemma.
    fn is_primary_sense(&self, id: SynsetId) -> Result<bool>;

    fn contains(&self, id: SynsetId) -> bool;

    /// Map a caller-supplied name (an identifier, a synset name like
    /// `dog.n.01`, or an un-padded WNID) to the identifier we use internally.
    fn resolve(&self, name: &str) -> Option<SynsetId> {
        let direct = ustr::ustr(name);
        if self.contains(direct) {
            return Some(direct);
        }
        let normalized = ustr::ustr(&normalize_wnid(name)?);
        if self.contains(normalized) {
            Some(normalized)
        } else {
            None
        }
    }

    /// The label derived from the first lemma name.
    fn label(&self, id: SynsetId) -> Result<String> {
        let lemmas = self.lemma_names(id)?;
        Ok(lemmas
            .first()
            .map(|lemma| lemma_to_label(lemma))
            .unwrap_or_else(|| id.to_string()))
    }
}

impl<T: Taxonomy + ?Sized> Taxonomy for &T {
    fn hypernyms(&self, id: SynsetId) -> Result<Vec<SynsetId>> {
        (**self).hypernyms(id)
    }

    fn hyponyms(&self, id: SynsetId) -> Result<Vec<SynsetId>> {
        (**self).hyponyms(id)
    }

    fn lemma_names(&self, id: SynsetId) -> Result<Vec<String>> {
        (**self).lemma_names(id)
    }

    fn is_primary_sense(&self, id: SynsetId) -> Result<bool> {
        (**self).is_primary_sense(id)
    }

    fn contains(&self, id: SynsetId) -> bool {
        (**self).contains(id)
    }

    fn resolve(&self, name: &str) -> Option<SynsetId> {
        (**self).resolve(name)
    }

    fn label(&self, id: SynsetId) -> Result<String> {
        (**self).label(id)
    }
}
