use std::cell::RefCell;

use ustr::UstrMap;

use super::{SynsetId, Taxonomy};
use crate::error::Result;

#[derive(Default)]
struct Memo {
    hypernyms: UstrMap<Vec<SynsetId>>,
    hyponyms: UstrMap<Vec<SynsetId>>,
    lemma_names: UstrMap<Vec<String>>,
    primary: UstrMap<bool>,
}

/// Per-run memoization of taxonomy lookups, keyed by identifier.
///
/// The builders repeatedly ask about the same ancestors (every leaf under
/// "dog" walks through "canine", "carnivore", ...) and the flattening step
/// re-traverses whole subtrees, so backends that are expensive to query
/// benefit from this.  Only successful lookups are remembered.
///
/// This is `!Sync` on purpose; parallel runs each construct their own.
pub struct CachedTaxonomy<T> {
    inner: T,
    memo: RefCell<Memo>,
}

impl<T: Taxonomy> CachedTaxonomy<T> {
    pub fn new(inner: T) -> Self {
        CachedTaxonomy {
            inner,
            memo: RefCell::new(Memo::default()),
        }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Number of identifiers we have memoized hyponyms for.
    pub fn cached_hyponym_count(&self) -> usize {
        self.memo.borrow().hyponyms.len()
    }
}

macro_rules! memoized {
    ($self:ident, $field:ident, $id:ident) => {{
        if let Some(hit) = $self.memo.borrow().$field.get(&$id) {
            return Ok(hit.clone());
        }
        let value = $self.inner.$field($id)?;
        $self
            .memo
            .borrow_mut()
            .$field
            .insert($id, value.clone());
        Ok(value)
    }};
}

impl<T: Taxonomy> Taxonomy for CachedTaxonomy<T> {
    fn hypernyms(&self, id: SynsetId) -> Result<Vec<SynsetId>> {
        memoized!(self, hypernyms, id)
    }

    fn hyponyms(&self, id: SynsetId) -> Result<Vec<SynsetId>> {
        memoized!(self, hyponyms, id)
    }

    fn lemma_names(&self, id: SynsetId) -> Result<Vec<String>> {
        memoized!(self, lemma_names, id)
    }

    fn is_primary_sense(&self, id: SynsetId) -> Result<bool> {
        if let Some(hit) = self.memo.borrow().primary.get(&id) {
            return Ok(*hit);
        }
        let value = self.inner.is_primary_sense(id)?;
        self.memo.borrow_mut().primary.insert(id, value);
        Ok(value)
    }

    fn contains(&self, id: SynsetId) -> bool {
        self.inner.contains(id)
    }

    fn resolve(&self, name: &str) -> Option<SynsetId> {
        self.inner.resolve(name)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use ustr::ustr;

    use super::*;

    /// Counts how often the wrapped taxonomy gets asked for hyponyms.
    struct CountingTaxonomy {
        hyponym_calls: Cell<u32>,
    }

    impl Taxonomy for CountingTaxonomy {
        fn hypernyms(&self, _id: SynsetId) -> Result<Vec<SynsetId>> {
            Ok(vec![])
        }

        fn hyponyms(&self, _id: SynsetId) -> Result<Vec<SynsetId>> {
            self.hyponym_calls.set(self.hyponym_calls.get() + 1);
            Ok(vec![ustr("child")])
        }

        fn lemma_names(&self, id: SynsetId) -> Result<Vec<String>> {
            Ok(vec![id.to_string()])
        }

        fn is_primary_sense(&self, _id: SynsetId) -> Result<bool> {
            Ok(true)
        }

        fn contains(&self, _id: SynsetId) -> bool {
            true
        }
    }

    #[test]
    fn test_hyponyms_are_looked_up_once() {
        let cached = CachedTaxonomy::new(CountingTaxonomy {
            hyponym_calls: Cell::new(0),
        });
        for _ in 0..3 {
            assert_eq!(cached.hyponyms(ustr("root")).unwrap(), vec![ustr("child")]);
        }
        assert_eq!(cached.cached_hyponym_count(), 1);
        assert_eq!(cached.into_inner().hyponym_calls.get(), 1);
    }
}
