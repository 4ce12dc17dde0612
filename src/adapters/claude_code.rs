use super::helpers::{
    first_existing, flatten_endpoint_values, list_of_strings, object_at, read_json, skills_from,
    string_or,
};
use super::AgentAdapter;
use crate::model::{AgentConfig, Skill};
use serde_json::Value;
use std::path::Path;

const CONFIG_CANDIDATES: &[&str] = &[".claude/settings.json", "claude-code.json"];
const SKILL_CANDIDATES: &[&str] = &[".claude/skills.json", "claude-skills.json"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeCode;

impl AgentAdapter for ClaudeCode {
    fn name(&self) -> &'static str {
        "claude_code"
    }

    fn detect(&self, path: &Path) -> bool {
        first_existing(path, CONFIG_CANDIDATES).is_some()
    }

    fn config(&self, path: &Path) -> AgentConfig {
        let config_path = first_existing(path, CONFIG_CANDIDATES);
        let payload = config_path.as_deref().map_or(Value::Null, read_json);
        let permissions = object_at(&payload, "permissions");
        // permission block first, then the same key at top level
        let lookup = |key: &str| {
            permissions
                .and_then(|p| p.get(key))
                .or_else(|| payload.get(key))
        };

        AgentConfig {
            agent_name: "Claude Code".to_string(),
            agent_version: string_or(payload.get("version"), "unknown"),
            root_path: path.to_path_buf(),
            allowed_paths: list_of_strings(lookup("allow")),
            blocked_paths: list_of_strings(lookup("deny")),
            shell_mode: string_or(lookup("shell"), "unknown").to_lowercase(),
            endpoints: flatten_endpoint_values(payload.get("mcpServers")),
            env_var_refs: list_of_strings(payload.get("env")),
            hardcoded_secrets: list_of_strings(payload.get("secrets")),
            config_path,
        }
    }

    fn skills(&self, path: &Path) -> Vec<Skill> {
        skills_from(path, SKILL_CANDIDATES)
    }
}
