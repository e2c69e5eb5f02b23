use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::from_reader;

use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct CocoCategory {
    pub name: String,
    pub supercategory: String,
}

/// The only part of a COCO instances file we care about.  Everything else
/// (images, annotations) is skipped by serde.
#[derive(Debug, Deserialize)]
pub struct CocoAnnotations {
    pub categories: Vec<CocoCategory>,
}

impl CocoAnnotations {
    /// `(category, supercategory)` pairs in file order.
    pub fn category_pairs(&self) -> Vec<(String, String)> {
        self.categories
            .iter()
            .map(|cat| (cat.name.clone(), cat.supercategory.clone()))
            .collect()
    }
}

pub fn parse_coco_annotations(json: &str) -> Result<CocoAnnotations> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_coco_annotations(path: &Path) -> Result<CocoAnnotations> {
    let file = File::open(path)?;
    let annotations: CocoAnnotations = from_reader(BufReader::new(file))?;
    info!(path = %path.display(), categories = annotations.categories.len(), "loaded COCO categories");
    Ok(annotations)
}

#[test]
fn test_parse_coco_annotations() {
    let annotations = parse_coco_annotations(
        r#"{
            "info": {"year": 2017},
            "images": [],
            "categories": [
                {"supercategory": "vehicle", "id": 2, "name": "bicycle"},
                {"supercategory": "vehicle", "id": 3, "name": "car"},
                {"supercategory": "animal", "id": 18, "name": "dog"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(
        annotations.category_pairs(),
        vec![
            ("bicycle".to_string(), "vehicle".to_string()),
            ("car".to_string(), "vehicle".to_string()),
            ("dog".to_string(), "animal".to_string()),
        ]
    );
}
