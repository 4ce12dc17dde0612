use super::helpers::{
    find_files, first_existing, flatten_endpoint_values, list_of_strings, read_json, string_or,
};
use super::AgentAdapter;
use crate::model::{AgentConfig, Skill};
use serde_json::Value;
use std::path::Path;

const CONFIG_CANDIDATES: &[&str] = &["mcp.json", ".mcp/config.json", "mcp-servers.json"];

/// Any tree that declares MCP servers, whatever client it belongs to.
#[derive(Debug, Clone, Copy, Default)]
pub struct McpGeneric;

fn declares_servers(payload: &Value) -> bool {
    payload.get("mcpServers").is_some() || payload.get("mcp_servers").is_some()
}

impl AgentAdapter for McpGeneric {
    fn name(&self) -> &'static str {
        "mcp_generic"
    }

    fn detect(&self, path: &Path) -> bool {
        first_existing(path, CONFIG_CANDIDATES).is_some()
            || find_files(path, "*.json")
                .iter()
                .any(|candidate| declares_servers(&read_json(candidate)))
    }

    fn config(&self, path: &Path) -> AgentConfig {
        let config_path = first_existing(path, CONFIG_CANDIDATES);
        let payload = config_path.as_deref().map_or(Value::Null, read_json);
        let servers = payload
            .get("mcpServers")
            .or_else(|| payload.get("mcp_servers"));

        AgentConfig {
            agent_name: "MCP".to_string(),
            agent_version: string_or(payload.get("version"), "unknown"),
            root_path: path.to_path_buf(),
            allowed_paths: list_of_strings(payload.get("allowedPaths")),
            blocked_paths: list_of_strings(payload.get("blockedPaths")),
            shell_mode: string_or(payload.get("shell"), "unknown").to_lowercase(),
            endpoints: flatten_endpoint_values(servers),
            env_var_refs: list_of_strings(payload.get("env")),
            hardcoded_secrets: list_of_strings(payload.get("secrets")),
            config_path,
        }
    }

    /// MCP configs declare servers, not skills.
    fn skills(&self, _path: &Path) -> Vec<Skill> {
        Vec::new()
    }
}
