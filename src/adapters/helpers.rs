//! Shared lenient parsing for agent config files.
//!
//! Agent configs are hand-edited and drift between versions, so nothing
//! here fails: unreadable or malformed files read as an empty object and
//! unexpected value shapes contribute nothing.

use crate::model::Skill;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

fn empty() -> Value {
    Value::Object(Map::new())
}

pub fn read_json(path: &Path) -> Value {
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));
    parsed.unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "unreadable json config");
        empty()
    })
}

pub fn read_toml(path: &Path) -> Value {
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| toml::from_str::<Value>(&text).map_err(|e| e.to_string()));
    parsed.unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "unreadable toml config");
        empty()
    })
}

/// First candidate, relative to `base`, that is an existing regular file.
pub fn first_existing(base: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|c| base.join(c))
        .find(|full| full.is_file())
}

/// Files under `base` (recursively, `base` included) matching a glob
/// file-name pattern such as `*openclaw*.json`.
pub fn find_files(base: &Path, file_pattern: &str) -> Vec<PathBuf> {
    let Some(base_str) = base.to_str() else {
        trace!(path = %base.display(), "non-utf8 path, skipping glob");
        return Vec::new();
    };
    let pattern = format!("{}/**/{}", glob::Pattern::escape(base_str), file_pattern);
    match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
        Err(e) => {
            debug!(pattern, error = %e, "bad glob pattern");
            Vec::new()
        }
    }
}

/// `payload[key]` when it is an object.
pub fn object_at<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|v| v.is_object())
}

/// Scalar rendering used for names, versions and modes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// `payload[key]` rendered, or `fallback` when the key is absent.
pub fn string_or(value: Option<&Value>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), display_value)
}

/// A list (non-null items rendered) or a lone string; anything else is empty.
pub fn list_of_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(display_value)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Every string leaf of a nested list/object structure, in document order.
pub fn flatten_endpoint_values(value: Option<&Value>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(value) = value {
        collect_strings(value, &mut out);
    }
    out
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

/// Skill entries as objects.
///
/// Accepts a list of objects, or an object keyed by skill name whose
/// values are objects (the key becomes `name` unless the value sets one).
pub fn flatten_skills(value: &Value) -> Vec<Map<String, Value>> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(name, meta)| {
                let meta = meta.as_object()?;
                let mut entry = Map::new();
                entry.insert("name".to_string(), Value::String(name.clone()));
                entry.extend(meta.clone());
                Some(entry)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Skills from the first existing candidate file, either under a `skills`
/// key or at top level.
pub fn skills_from(base: &Path, candidates: &[&str]) -> Vec<Skill> {
    let Some(skills_path) = first_existing(base, candidates) else {
        return Vec::new();
    };
    let payload = read_json(&skills_path);
    let listing = payload.get("skills").unwrap_or(&payload);
    let source = skills_path.display().to_string();

    flatten_skills(listing)
        .iter()
        .map(|item| Skill {
            name: string_or(item.get("name"), "unknown"),
            permissions: list_of_strings(item.get("permissions")),
            source: source.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn broken_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(read_json(&bad), json!({}));
        assert_eq!(read_json(&dir.path().join("missing.json")), json!({}));

        let bad_toml = dir.path().join("bad.toml");
        fs::write(&bad_toml, "= nope").unwrap();
        assert_eq!(read_toml(&bad_toml), json!({}));
    }

    #[test]
    fn toml_reads_into_json_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "shell = \"off\"\n[sandbox]\nwritable_roots = [\"./src\"]\n").unwrap();
        let v = read_toml(&path);
        assert_eq!(v["shell"], "off");
        assert_eq!(v["sandbox"]["writable_roots"][0], "./src");
    }

    #[test]
    fn first_existing_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a.json")).unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        let found = first_existing(dir.path(), &["a.json", "b.json"]).unwrap();
        assert!(found.ends_with("b.json"));
    }

    #[test]
    fn list_shapes() {
        let v = json!(["a", null, 3, true]);
        assert_eq!(list_of_strings(Some(&v)), vec!["a", "3", "True"]);
        assert_eq!(list_of_strings(Some(&json!("only"))), vec!["only"]);
        assert!(list_of_strings(Some(&json!({"a": 1}))).is_empty());
        assert!(list_of_strings(None).is_empty());
    }

    #[test]
    fn endpoints_flatten_nested_values() {
        let v = json!({
            "fs": {"command": "npx", "args": ["-y", "server"]},
            "remote": {"url": "https://mcp.example.com", "port": 443}
        });
        assert_eq!(
            flatten_endpoint_values(Some(&v)),
            vec!["npx", "-y", "server", "https://mcp.example.com"]
        );
    }

    #[test]
    fn skills_from_either_shape() {
        let keyed = json!({"web": {"permissions": ["network"]}, "junk": 1});
        let flat = flatten_skills(&keyed);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0]["name"], "web");

        let listed = json!([{"name": "x"}, "nope"]);
        assert_eq!(flatten_skills(&listed).len(), 1);

        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("skills.json"),
            r#"{"skills": [{"name": "shell-runner", "permissions": ["shell"]}, {"permissions": "exec"}]}"#,
        )
        .unwrap();
        let skills = skills_from(dir.path(), &["skills.json"]);
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].permissions, vec!["shell"]);
        assert_eq!(skills[1].name, "unknown");
        assert_eq!(skills[1].permissions, vec!["exec"]);
        assert!(skills[0].source.ends_with("skills.json"));
    }

    #[test]
    fn glob_finds_nested_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("deep/er")).unwrap();
        fs::write(dir.path().join("deep/er/my-openclaw-setup.json"), "{}").unwrap();
        assert_eq!(find_files(dir.path(), "*openclaw*.json").len(), 1);
        assert!(find_files(dir.path(), "*nanobot*.json").is_empty());
    }
}
