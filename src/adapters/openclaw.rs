use super::helpers::{
    find_files, first_existing, flatten_endpoint_values, list_of_strings, object_at, read_json,
    skills_from, string_or,
};
use super::AgentAdapter;
use crate::model::{AgentConfig, Skill};
use serde_json::Value;
use std::path::Path;

const CONFIG_CANDIDATES: &[&str] = &["openclaw.json", ".openclaw/config.json", "config/openclaw.json"];
const SKILL_CANDIDATES: &[&str] = &["skills.json", ".openclaw/skills.json"];

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenClaw;

impl AgentAdapter for OpenClaw {
    fn name(&self) -> &'static str {
        "openclaw"
    }

    fn detect(&self, path: &Path) -> bool {
        first_existing(path, CONFIG_CANDIDATES).is_some()
            || !find_files(path, "*openclaw*.json").is_empty()
    }

    fn config(&self, path: &Path) -> AgentConfig {
        let config_path = first_existing(path, CONFIG_CANDIDATES);
        let payload = config_path.as_deref().map_or(Value::Null, read_json);
        let permissions = object_at(&payload, "permissions");
        let from_permissions = |key: &str| permissions.and_then(|p| p.get(key));

        let mut endpoints = flatten_endpoint_values(payload.get("endpoints"));
        endpoints.extend(flatten_endpoint_values(payload.get("mcpServers")));

        AgentConfig {
            agent_name: "OpenClaw".to_string(),
            agent_version: string_or(payload.get("version"), "unknown"),
            root_path: path.to_path_buf(),
            allowed_paths: list_of_strings(
                payload.get("allowedPaths").or_else(|| from_permissions("allowedPaths")),
            ),
            blocked_paths: list_of_strings(
                payload.get("blockedPaths").or_else(|| from_permissions("blockedPaths")),
            ),
            shell_mode: string_or(
                from_permissions("shell").or_else(|| payload.get("shell")),
                "unknown",
            )
            .to_lowercase(),
            endpoints,
            env_var_refs: list_of_strings(payload.get("env")),
            hardcoded_secrets: list_of_strings(payload.get("hardcodedSecrets")),
            config_path,
        }
    }

    fn skills(&self, path: &Path) -> Vec<Skill> {
        skills_from(path, SKILL_CANDIDATES)
    }
}
