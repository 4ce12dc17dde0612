use super::helpers::{
    find_files, first_existing, flatten_endpoint_values, list_of_strings, object_at, read_json,
    skills_from, string_or,
};
use super::AgentAdapter;
use crate::model::{AgentConfig, Skill};
use serde_json::Value;
use std::path::Path;

const CONFIG_CANDIDATES: &[&str] = &["nanobot.json", ".nanobot/config.json", "config.json"];
const SKILL_CANDIDATES: &[&str] = &["nanobot-skills.json", ".nanobot/skills.json"];

#[derive(Debug, Clone, Copy, Default)]
pub struct Nanobot;

impl AgentAdapter for Nanobot {
    fn name(&self) -> &'static str {
        "nanobot"
    }

    /// A bare `config.json` is common, so it only counts when its `agent`
    /// field is missing, empty or says nanobot.
    fn detect(&self, path: &Path) -> bool {
        match first_existing(path, CONFIG_CANDIDATES) {
            Some(config) => {
                let payload = read_json(&config);
                let agent = string_or(payload.get("agent"), "").to_lowercase();
                agent.is_empty() || agent == "nanobot"
            }
            None => !find_files(path, "*nanobot*.json").is_empty(),
        }
    }

    fn config(&self, path: &Path) -> AgentConfig {
        let config_path = first_existing(path, CONFIG_CANDIDATES);
        let payload = config_path.as_deref().map_or(Value::Null, read_json);
        let permissions = object_at(&payload, "permissions");
        let from_permissions = |key: &str| permissions.and_then(|p| p.get(key));

        AgentConfig {
            agent_name: "Nanobot".to_string(),
            agent_version: string_or(payload.get("version"), "unknown"),
            root_path: path.to_path_buf(),
            allowed_paths: list_of_strings(
                payload.get("allowed_paths").or_else(|| from_permissions("filesystem")),
            ),
            blocked_paths: list_of_strings(payload.get("blocked_paths")),
            shell_mode: string_or(
                from_permissions("shell").or_else(|| payload.get("shell")),
                "unknown",
            )
            .to_lowercase(),
            endpoints: flatten_endpoint_values(
                payload.get("network").or_else(|| payload.get("endpoints")),
            ),
            env_var_refs: list_of_strings(payload.get("env_refs")),
            hardcoded_secrets: list_of_strings(payload.get("hardcoded_secrets")),
            config_path,
        }
    }

    fn skills(&self, path: &Path) -> Vec<Skill> {
        skills_from(path, SKILL_CANDIDATES)
    }
}
