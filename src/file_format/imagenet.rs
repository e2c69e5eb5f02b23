use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use itertools::Itertools;
use serde_json::Value;
use ustr::{ustr, UstrSet};

use crate::error::{HierarchyError, Result};

/// Extract the set of WNIDs from an ImageNet class index, which has the form
/// `{"0": ["n01440764", "tench"], "1": [...], ...}`.  Entries that aren't a
/// non-empty list are skipped.
pub fn parse_class_index(json: &str) -> Result<UstrSet> {
    let data: BTreeMap<String, Value> = serde_json::from_str(json)?;
    let mut valid = UstrSet::default();
    for (key, value) in data {
        match value.as_array().and_then(|entry| entry.first()).and_then(Value::as_str) {
            Some(wnid) => {
                valid.insert(ustr(wnid));
            }
            None => {
                debug!(key = key.as_str(), "skipping malformed class index entry");
            }
        }
    }
    Ok(valid)
}

pub fn load_valid_wnids(path: &Path) -> Result<UstrSet> {
    let valid = parse_class_index(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), count = valid.len(), "loaded valid WNIDs");
    Ok(valid)
}

/// Ids from a plain text list, one per line, ignoring blank lines.  This is
/// the format of the ImageNet-21k id list.
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_id_set(path: &Path) -> Result<UstrSet> {
    let ids = parse_id_list(&fs::read_to_string(path)?);
    if ids.is_empty() {
        return Err(HierarchyError::bad_data(format!(
            "id list {} is empty",
            path.display()
        )));
    }
    Ok(ids.iter().map(|id| ustr(id)).collect())
}

/// Each input is either a path to an id list or an id itself.  The result is
/// deduplicated, keeping the first occurrence.  Unreadable files are logged
/// and skipped so one bad path doesn't sink a long list.
pub fn load_wnids(inputs: &[String]) -> Vec<String> {
    let mut wnids = vec![];
    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            match fs::read_to_string(path) {
                Ok(text) => wnids.extend(parse_id_list(&text)),
                Err(err) => {
                    error!(path = input.as_str(), %err, "error reading id list");
                }
            }
        } else {
            wnids.push(input.clone());
        }
    }
    wnids.into_iter().unique().collect()
}
