//! Path normalisation for agent configs that talk in `~` and relative paths.

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the home directory; anything else is unchanged.
pub fn expand_home(raw: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (raw, home) {
        ("~", Some(home)) => home,
        (raw, Some(home)) if raw.starts_with("~/") => home.join(&raw[2..]),
        (raw, _) => PathBuf::from(raw),
    }
}

/// Absolute, symlink-free form of `path`.
///
/// Paths that do not exist cannot be canonicalised, so those are made
/// absolute against the working directory and cleaned lexically.
pub fn resolve(path: &Path) -> PathBuf {
    if let Ok(real) = std::fs::canonicalize(path) {
        return real;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    normalize_lexically(&absolute)
}

/// Drop `.` and fold `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
