//! Agent config adapters.
//!
//! Each supported agent keeps its permissions in its own file layout and
//! vocabulary. An adapter recognises one layout and normalises it into an
//! [`AgentConfig`] plus the declared skills, so the checks never see
//! agent-specific shapes.

pub mod helpers;

mod claude_code;
mod codex;
mod mcp_generic;
mod nanobot;
mod openclaw;

pub use claude_code::ClaudeCode;
pub use codex::Codex;
pub use mcp_generic::McpGeneric;
pub use nanobot::Nanobot;
pub use openclaw::OpenClaw;

use crate::error::{AuditError, Result};
use crate::model::{AgentConfig, Skill};
use std::path::Path;
use tracing::debug;

pub trait AgentAdapter {
    /// Stable identifier, reported as `adapter_name`.
    fn name(&self) -> &'static str;

    fn detect(&self, path: &Path) -> bool;

    fn config(&self, path: &Path) -> AgentConfig;

    fn skills(&self, path: &Path) -> Vec<Skill>;

    fn endpoints(&self, path: &Path) -> Vec<String> {
        self.config(path).endpoints
    }
}

/// Detection order. More specific layouts come first; the generic MCP
/// adapter matches almost any JSON and must stay last.
pub const ADAPTERS: &[&(dyn AgentAdapter + Sync)] = &[&OpenClaw, &Nanobot, &ClaudeCode, &Codex, &McpGeneric];

/// First adapter whose layout is present under `path`.
pub fn detect_adapter(path: &Path) -> Result<&'static (dyn AgentAdapter + Sync)> {
    let adapter = ADAPTERS
        .iter()
        .copied()
        .find(|adapter| adapter.detect(path))
        .ok_or_else(|| AuditError::UnknownAgent {
            path: path.to_path_buf(),
        })?;
    debug!(adapter = adapter.name(), path = %path.display(), "agent detected");
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn detected(files: &[(&str, &str)]) -> Result<&'static str> {
        let dir = TempDir::new().unwrap();
        for (name, body) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        detect_adapter(dir.path()).map(|a| a.name())
    }

    #[test]
    fn each_layout_has_an_owner() {
        assert_eq!(detected(&[("openclaw.json", "{}")]).unwrap(), "openclaw");
        assert_eq!(detected(&[(".nanobot/config.json", "{}")]).unwrap(), "nanobot");
        assert_eq!(detected(&[(".claude/settings.json", "{}")]).unwrap(), "claude_code");
        assert_eq!(detected(&[(".codex/config.toml", "")]).unwrap(), "codex");
        assert_eq!(detected(&[("mcp.json", "{}")]).unwrap(), "mcp_generic");
    }

    #[test]
    fn order_decides_ties() {
        // openclaw wins over a claude settings file in the same tree
        let name = detected(&[("openclaw.json", "{}"), (".claude/settings.json", "{}")]).unwrap();
        assert_eq!(name, "openclaw");
    }

    #[test]
    fn foreign_config_json_is_not_nanobot() {
        let name = detected(&[
            ("config.json", r#"{"agent": "something-else"}"#),
            (".claude/settings.json", "{}"),
        ])
        .unwrap();
        assert_eq!(name, "claude_code");
    }

    #[test]
    fn nothing_recognisable_is_an_unknown_agent() {
        let err = detected(&[("README.md", "# hi"), ("package.json", r#"{"name": "x"}"#)]).unwrap_err();
        assert!(matches!(err, AuditError::UnknownAgent { .. }));
        assert!(err.is_user_error());
    }
}
