#![allow(dead_code)]

use wildcard_hierarchy::file_format::taxonomy_json::parse_taxonomy;
use wildcard_hierarchy::taxonomy::MemoryTaxonomy;

/// A small slice of WordNet:
///
/// ```text
/// entity
/// ├── abstraction ── communication ── message ── letter
/// ├── animal ── carnivore
/// │             ├── canine: dog, wolf, wild dog ── fox
/// │             └── feline: cat
/// └── food ── sausage ── dog (the hot dog sense, not primary)
/// ```
pub fn taxonomy() -> MemoryTaxonomy {
    parse_taxonomy(include_str!("../fixtures/taxonomy.json")).unwrap()
}

pub const DOG: &str = "n02084071";
pub const WOLF: &str = "n02114100";
pub const FOX: &str = "n02118333";
pub const CAT: &str = "n02121620";
pub const LETTER: &str = "n06624161";
pub const HOTDOG: &str = "n07676602";

pub fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
