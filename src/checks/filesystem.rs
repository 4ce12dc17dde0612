use super::FILESYSTEM;
use crate::model::{AgentConfig, CheckResult, Severity};
use crate::paths::{expand_home, resolve};

const TITLE: &str = "File System Access";

/// Allowed-path values that grant the whole disk.
const UNRESTRICTED: &[&str] = &["/", "*", "**", "~", "~/", "C:\\", "D:\\"];

/// Fragments marking credential stores and system configuration.
const SENSITIVE_SEGMENTS: &[&str] = &[".ssh", ".aws", ".gnupg", ".config", ".env", "/etc", "/var"];

fn is_unrestricted(raw: &str) -> bool {
    UNRESTRICTED.contains(&raw.trim())
}

fn is_sensitive(raw: &str) -> bool {
    SENSITIVE_SEGMENTS.iter().any(|s| raw.contains(s))
}

pub fn evaluate_filesystem(config: &AgentConfig) -> CheckResult {
    let allowed = &config.allowed_paths;
    if allowed.is_empty() {
        return CheckResult::new(
            FILESYSTEM,
            TITLE,
            10.0,
            Severity::High,
            "No path constraints detected; access model appears unrestricted.",
            vec!["Declare explicit allowed paths in agent config.".to_string()],
        );
    }

    let mut details = Vec::new();
    let unrestricted: Vec<&String> = allowed.iter().filter(|p| is_unrestricted(p)).collect();
    details.extend(unrestricted.iter().map(|p| format!("Unrestricted path detected: {p}")));

    let sensitive: Vec<&String> = allowed.iter().filter(|p| is_sensitive(p)).collect();
    details.extend(sensitive.iter().map(|p| format!("Sensitive location accessible: {p}")));

    let root = resolve(&config.root_path);
    let out_of_scope: Vec<&String> = allowed
        .iter()
        .filter(|raw| !is_unrestricted(raw))
        .filter(|raw| {
            let candidate = expand_home(raw);
            let candidate = if candidate.is_absolute() {
                resolve(&candidate)
            } else {
                resolve(&root.join(candidate))
            };
            !candidate.starts_with(&root)
        })
        .collect();
    details.extend(out_of_scope.iter().map(|p| format!("Path exceeds project scope: {p}")));

    let (score, severity, summary) = if !unrestricted.is_empty() {
        (10.0, Severity::Critical, "Agent can access effectively any path on disk.")
    } else if !sensitive.is_empty() || !out_of_scope.is_empty() {
        (6.5, Severity::High, "Agent has broad file system access beyond project scope.")
    } else {
        (1.5, Severity::Low, "File access appears scoped to project paths.")
    };

    if !config.blocked_paths.is_empty() {
        details.push(format!("Blocked paths declared: {}", config.blocked_paths.join(", ")));
    }

    CheckResult::new(FILESYSTEM, TITLE, score, severity, summary, details)
}
