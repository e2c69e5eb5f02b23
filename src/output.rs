/**
 * Rendering of finished hierarchies.  The canonical document is plain nested
 * maps and sequences, so this is a thin layer over serde; the only decisions
 * made here are which text format to use and how to summarize a result for a
 * status line.
 **/
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::normalize::CanonicalDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    /// `.json` files get JSON; everything else, `.yaml`/`.yml` included, YAML.
    pub fn for_path(path: &Path) -> OutputFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}

pub fn render_yaml(doc: &CanonicalDocument) -> Result<String> {
    Ok(serde_yaml::to_string(doc)?)
}

pub fn render_json(doc: &CanonicalDocument) -> Result<String> {
    let mut json = serde_json::to_string_pretty(doc)?;
    json.push('\n');
    Ok(json)
}

pub fn render(doc: &CanonicalDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => render_yaml(doc),
        OutputFormat::Json => render_json(doc),
    }
}

/// Parse a previously saved hierarchy back into a document.
pub fn parse_yaml(text: &str) -> Result<CanonicalDocument> {
    Ok(serde_yaml::from_str(text)?)
}

/// Write `doc` to `path`, creating parent directories as needed.
pub fn save_hierarchy(doc: &CanonicalDocument, path: &Path) -> Result<()> {
    let text = render(doc, OutputFormat::for_path(path))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    info!(path = %path.display(), "saved hierarchy");
    Ok(())
}

/// The first `max_lines` lines of the YAML rendering, with a marker noting the
/// full length when anything was cut.
pub fn preview(doc: &CanonicalDocument, max_lines: usize) -> Result<String> {
    let yaml = render_yaml(doc)?;
    let lines: Vec<&str> = yaml.lines().collect();
    if lines.len() <= max_lines {
        return Ok(yaml);
    }
    let mut out = lines[..max_lines].join("\n");
    out.push_str(&format!("\n... (Truncated. Total lines: {})", lines.len()));
    Ok(out)
}

pub fn summarize(doc: &CanonicalDocument) -> String {
    match doc {
        CanonicalDocument::Leaves(leaves) => {
            format!("Generated List with {} items.", leaves.len())
        }
        CanonicalDocument::Branch(_) => {
            format!("Generated Hierarchy with ~{} leaf items.", doc.leaf_count())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> CanonicalDocument {
        let mut vehicle = BTreeMap::new();
        vehicle.insert(
            "car".to_string(),
            CanonicalDocument::Leaves(vec!["sedan".into(), "coupe".into()]),
        );
        vehicle.insert(
            "misc".to_string(),
            CanonicalDocument::Leaves(vec!["bicycle".into()]),
        );
        let mut top = BTreeMap::new();
        top.insert("vehicle".to_string(), CanonicalDocument::Branch(vehicle));
        CanonicalDocument::Branch(top)
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(OutputFormat::for_path(Path::new("out.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::for_path(Path::new("out.yaml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::for_path(Path::new("out")), OutputFormat::Yaml);
    }

    #[test]
    fn test_yaml_round_trip() {
        let doc = sample();
        let yaml = render_yaml(&doc).unwrap();
        assert_eq!(parse_yaml(&yaml).unwrap(), doc);
    }

    #[test]
    fn test_preview_truncates() {
        let doc = sample();
        let full = preview(&doc, 100).unwrap();
        assert_eq!(full, render_yaml(&doc).unwrap());

        let short = preview(&doc, 2).unwrap();
        let total = full.lines().count();
        assert_eq!(short.lines().count(), 3);
        assert!(short.ends_with(&format!("... (Truncated. Total lines: {})", total)));
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(&sample()), "Generated Hierarchy with ~3 leaf items.");
        let list = CanonicalDocument::Leaves(vec!["a".into(), "b".into()]);
        assert_eq!(summarize(&list), "Generated List with 2 items.");
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        save_hierarchy(&sample(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let parsed: CanonicalDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample());
    }
}
