use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::from_reader;

use crate::error::Result;

/// A node of the Open Images bounding-box label hierarchy.  Label names are
/// opaque machine ids like `/m/0bl9f`; display names come from the class
/// descriptions file.
#[derive(Debug, Deserialize)]
pub struct OpenImagesNode {
    #[serde(rename = "LabelName")]
    pub label_name: String,
    #[serde(rename = "Subcategories", default)]
    pub subcategories: Vec<OpenImagesNode>,
}

pub fn parse_openimages_hierarchy(json: &str) -> Result<OpenImagesNode> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_openimages_hierarchy(path: &Path) -> Result<OpenImagesNode> {
    let file = File::open(path)?;
    Ok(from_reader(BufReader::new(file))?)
}

/// Split one CSV row into fields.  Commas inside double quotes don't
/// separate, and `""` inside quotes is a literal quote.
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Parse `id,display name` rows.  Either column may be quoted, so ids and
/// names containing commas must be; any columns past the second are
/// ignored.  Rows with fewer than two columns or an empty id are skipped.
pub fn parse_class_descriptions(text: &str) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for line in text.lines() {
        let mut fields = split_csv_row(line).into_iter();
        let (id, name) = match (fields.next(), fields.next()) {
            (Some(id), Some(name)) if !id.is_empty() => (id, name),
            _ => continue,
        };
        names.insert(id, name);
    }
    names
}

pub fn read_class_descriptions(path: &Path) -> Result<HashMap<String, String>> {
    let names = parse_class_descriptions(&fs::read_to_string(path)?);
    info!(path = %path.display(), classes = names.len(), "loaded class descriptions");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hierarchy() {
        let root = parse_openimages_hierarchy(
            r#"{
                "LabelName": "/m/0bl9f",
                "Subcategories": [
                    {"LabelName": "/m/01g317"},
                    {"LabelName": "/m/0cgh4", "Subcategories": [{"LabelName": "/m/09j2d"}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(root.label_name, "/m/0bl9f");
        assert_eq!(root.subcategories.len(), 2);
        assert!(root.subcategories[0].subcategories.is_empty());
        assert_eq!(root.subcategories[1].subcategories[0].label_name, "/m/09j2d");
    }

    #[test]
    fn test_parse_class_descriptions() {
        let names = parse_class_descriptions(
            "/m/011k07,Tortoise\n/m/0cgh4,\"Building, tall\"\nbogus\n/m/02,\"Say \"\"hi\"\"\"\n",
        );
        assert_eq!(names.len(), 3);
        assert_eq!(names["/m/011k07"], "Tortoise");
        assert_eq!(names["/m/0cgh4"], "Building, tall");
        assert_eq!(names["/m/02"], "Say \"hi\"");
    }

    #[test]
    fn test_class_descriptions_quoted_id_and_extra_columns() {
        let names = parse_class_descriptions(
            "\"/m/0a,b\",Comma id\n/m/0c,Cat,extra,columns\n\"/m/0d\",\"Dog, domestic\",\"x,y\"\n,No id\n",
        );
        assert_eq!(names.len(), 3);
        assert_eq!(names["/m/0a,b"], "Comma id");
        assert_eq!(names["/m/0c"], "Cat");
        assert_eq!(names["/m/0d"], "Dog, domestic");
    }
}
