use std::collections::HashMap;

use serde_json::Value;

use crate::file_format::openimages::OpenImagesNode;
use crate::tree::InternalNode;

/// Group `(category, supercategory)` pairs into one node per supercategory
/// whose direct leaves are its member categories.
pub fn tree_from_category_pairs(pairs: &[(String, String)]) -> InternalNode {
    let mut forest = InternalNode::forest();
    for (category, supercategory) in pairs {
        forest.child_mut(supercategory).add_leaf(category.as_str());
    }
    forest
}

fn openimages_node(node: &OpenImagesNode, names: &HashMap<String, String>) -> InternalNode {
    let label = names
        .get(&node.label_name)
        .cloned()
        .unwrap_or_else(|| node.label_name.clone());
    let mut out = InternalNode::new(label);
    for sub in &node.subcategories {
        let child = openimages_node(sub, names);
        if sub.subcategories.is_empty() {
            out.add_leaf(child.label);
        } else {
            out.merge_child(child);
        }
    }
    out
}

/// Copy an Open Images label hierarchy, translating machine ids to display
/// names where the descriptions have one.
pub fn tree_from_openimages(root: &OpenImagesNode, names: &HashMap<String, String>) -> InternalNode {
    let mut forest = InternalNode::forest();
    let node = openimages_node(root, names);
    if root.subcategories.is_empty() {
        forest.add_leaf(node.label);
    } else {
        forest.merge_child(node);
    }
    forest
}

fn scalar_to_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn fill_from_value(node: &mut InternalNode, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    // `{leaf: {}}` and `{leaf: null}` are both just leaves.
                    Value::Null => node.add_leaf(key.as_str()),
                    Value::Object(inner) if inner.is_empty() => node.add_leaf(key.as_str()),
                    // `{leaf: "leaf"}` names a leaf; any other string is a
                    // single-member group.
                    Value::String(s) if s == key => node.add_leaf(key.as_str()),
                    _ => fill_from_value(node.child_mut(key), child),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match scalar_to_label(item) {
                    Some(leaf) => node.add_leaf(leaf),
                    None => fill_from_value(node, item),
                }
            }
        }
        Value::Null => {}
        scalar => {
            if let Some(leaf) = scalar_to_label(scalar) {
                node.add_leaf(leaf);
            }
        }
    }
}

/// Structural copy of an already-parsed pre-built hierarchy.
///
/// Objects are branches.  Arrays hold leaf strings and may also hold nested
/// objects, whose keys become branches of the array's owner.  Empty objects,
/// nulls and self-named strings mark leaves, which covers the legacy
/// `{a: {b: {}}}` shape as well as `{a: {b: "b"}}` and `{a: [b, c]}`.
pub fn tree_from_value(value: &Value) -> InternalNode {
    let mut forest = InternalNode::forest();
    fill_from_value(&mut forest, value);
    forest
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaves(node: &InternalNode) -> Vec<&str> {
        node.direct_leaves.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_category_pairs() {
        let forest = tree_from_category_pairs(&[
            ("car".to_string(), "vehicle".to_string()),
            ("bicycle".to_string(), "vehicle".to_string()),
            ("dog".to_string(), "animal".to_string()),
        ]);
        assert_eq!(forest.children.len(), 2);
        assert_eq!(leaves(&forest.children["vehicle"]), vec!["bicycle", "car"]);
        assert_eq!(leaves(&forest.children["animal"]), vec!["dog"]);
    }

    #[test]
    fn test_openimages() {
        let root: OpenImagesNode = serde_json::from_value(json!({
            "LabelName": "/m/0bl9f",
            "Subcategories": [
                {"LabelName": "/m/01g317"},
                {"LabelName": "/m/0cgh4", "Subcategories": [{"LabelName": "/m/09j2d"}]}
            ]
        }))
        .unwrap();
        let names: HashMap<String, String> = [
            ("/m/0bl9f", "Entity"),
            ("/m/01g317", "Person"),
            ("/m/0cgh4", "Building"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let forest = tree_from_openimages(&root, &names);
        let entity = &forest.children["Entity"];
        assert_eq!(leaves(entity), vec!["Person"]);
        // No description for /m/09j2d, so the machine id is kept.
        assert_eq!(leaves(&entity.children["Building"]), vec!["/m/09j2d"]);
    }

    #[test]
    fn test_value_shapes() {
        let legacy = tree_from_value(&json!({"root": {"leaf1": {}, "sub": {"leaf2": {}}}}));
        let root = &legacy.children["root"];
        assert_eq!(leaves(root), vec!["leaf1"]);
        assert_eq!(leaves(&root.children["sub"]), vec!["leaf2"]);

        let named = tree_from_value(&json!({"root": {"leaf1": "leaf1", "B": "other"}}));
        let root = &named.children["root"];
        assert_eq!(leaves(root), vec!["leaf1"]);
        assert_eq!(leaves(&root.children["B"]), vec!["other"]);

        let mixed_list = tree_from_value(&json!({"root": ["leaf1", {"sub": ["leaf2"]}]}));
        let root = &mixed_list.children["root"];
        assert_eq!(leaves(root), vec!["leaf1"]);
        assert_eq!(leaves(&root.children["sub"]), vec!["leaf2"]);
    }
}
