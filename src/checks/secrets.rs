use super::SECRETS;
use crate::model::{AgentConfig, CheckResult, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

const TITLE: &str = "Secrets Exposure";

/// Key/value assignments of credential-looking names, and bare `sk-` keys.
/// When a pattern has groups, the last group is the secret value.
static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)(api[_-]?key|token|password|secret)\s*[:=]\s*["']?([A-Za-z0-9_\-]{10,})"#,
        r"(?i)sk-[A-Za-z0-9]{12,}",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

const VISIBLE_PREFIX: usize = 4;

/// First few characters and a marker; the rest never leaves this module.
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(VISIBLE_PREFIX).collect();
    format!("{prefix}...redacted")
}

fn scan_text(text: &str) -> BTreeSet<String> {
    let mut hits = BTreeSet::new();
    for pattern in SECRET_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let value = caps.get(caps.len() - 1).map_or("", |m| m.as_str());
            if !value.is_empty() {
                hits.insert(redact(value));
            }
        }
    }
    hits
}

fn scan_file(path: &Path) -> BTreeSet<String> {
    match fs::read_to_string(path) {
        Ok(text) => scan_text(&text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "config not rescanned for secrets");
            BTreeSet::new()
        }
    }
}

pub fn evaluate_secrets(config: &AgentConfig) -> CheckResult {
    let mut hardcoded: BTreeSet<String> = config.hardcoded_secrets.iter().map(|s| redact(s)).collect();
    if let Some(path) = config.config_path.as_deref().filter(|p| p.is_file()) {
        hardcoded.extend(scan_file(path));
    }
    let env_refs: BTreeSet<&str> = config.env_var_refs.iter().map(String::as_str).collect();

    let mut details = Vec::new();
    if !env_refs.is_empty() {
        let names: Vec<&str> = env_refs.iter().copied().collect();
        details.push(format!("Environment secrets referenced: {}", names.join(", ")));
    }
    details.extend(hardcoded.iter().map(|v| format!("Hardcoded secret detected: {v}")));

    let (score, severity, summary) = if !hardcoded.is_empty() {
        (10.0, Severity::Critical, "Hardcoded secrets detected in configuration.")
    } else if !env_refs.is_empty() {
        (5.0, Severity::Medium, "Sensitive environment variables are referenced by agent config.")
    } else {
        (0.0, Severity::Low, "No secret exposure signals found in static configuration.")
    };

    CheckResult::new(SECRETS, TITLE, score, severity, summary, details)
}
