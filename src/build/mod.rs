/*!
Builders turning a lexical graph into an `InternalNode` tree.

- `bottom_up` starts from a flat set of leaf identifiers and walks each one's
  hypernym chain, merging shared ancestors into a forest.
- `top_down` starts from a root and descends hyponyms to a depth bound,
  flattening whatever lies beyond it.
- `flat` ingests sources that are already flat or already hierarchical.

Each build owns its tree exclusively; nothing here keeps state between runs.
*/

pub mod bottom_up;
pub mod flat;
pub mod top_down;

pub use bottom_up::{build_bottom_up, BottomUpBuild};
pub use flat::{tree_from_category_pairs, tree_from_openimages, tree_from_value};
pub use top_down::{build_top_down, TopDownBuild, TopDownBuilder};
