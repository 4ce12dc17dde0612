use super::helpers::{
    first_existing, flatten_endpoint_values, list_of_strings, object_at, read_json, read_toml,
    skills_from, string_or,
};
use super::AgentAdapter;
use crate::model::{AgentConfig, Skill};
use serde_json::Value;
use std::path::Path;

const CONFIG_CANDIDATES: &[&str] = &[".codex/config.toml", "codex.toml", "codex.json"];
const SKILL_CANDIDATES: &[&str] = &[".codex/skills.json", "skills.json"];

#[derive(Debug, Clone, Copy, Default)]
pub struct Codex;

impl AgentAdapter for Codex {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn detect(&self, path: &Path) -> bool {
        first_existing(path, CONFIG_CANDIDATES).is_some()
    }

    fn config(&self, path: &Path) -> AgentConfig {
        let config_path = first_existing(path, CONFIG_CANDIDATES);
        let payload = match config_path.as_deref() {
            None => Value::Null,
            Some(p) if p.extension().is_some_and(|ext| ext == "toml") => read_toml(p),
            Some(p) => read_json(p),
        };
        let permissions = object_at(&payload, "permissions");
        let sandbox = object_at(&payload, "sandbox");
        let from_permissions = |key: &str| permissions.and_then(|p| p.get(key));
        let from_sandbox = |key: &str| sandbox.and_then(|s| s.get(key));

        let allowed = from_permissions("allowed_paths")
            .or_else(|| from_sandbox("writable_roots"))
            .or_else(|| payload.get("writable_roots"));
        let shell = from_permissions("shell")
            .or_else(|| payload.get("shell"))
            .or_else(|| from_sandbox("shell"));

        AgentConfig {
            agent_name: "Codex".to_string(),
            agent_version: string_or(payload.get("version"), "unknown"),
            root_path: path.to_path_buf(),
            allowed_paths: list_of_strings(allowed),
            blocked_paths: list_of_strings(
                from_permissions("blocked_paths").or_else(|| payload.get("blocked_paths")),
            ),
            shell_mode: string_or(shell, "unknown").to_lowercase(),
            endpoints: flatten_endpoint_values(
                payload.get("network").or_else(|| payload.get("endpoints")),
            ),
            env_var_refs: list_of_strings(payload.get("env").or_else(|| payload.get("env_vars"))),
            hardcoded_secrets: list_of_strings(payload.get("hardcoded_secrets")),
            config_path,
        }
    }

    fn skills(&self, path: &Path) -> Vec<Skill> {
        skills_from(path, SKILL_CANDIDATES)
    }
}
