use super::SHELL;
use crate::model::{AgentConfig, CheckResult, Severity};

const TITLE: &str = "Shell Execution";

pub fn evaluate_shell(config: &AgentConfig) -> CheckResult {
    let mode = if config.shell_mode.is_empty() {
        "unknown".to_string()
    } else {
        config.shell_mode.to_lowercase()
    };

    match mode.as_str() {
        "none" | "disabled" | "off" => CheckResult::new(
            SHELL,
            TITLE,
            0.0,
            Severity::Low,
            "Shell execution appears disabled.",
            Vec::new(),
        ),
        "filtered" | "restricted" | "allowlist" => CheckResult::new(
            SHELL,
            TITLE,
            5.0,
            Severity::Medium,
            "Shell execution is enabled with filters.",
            vec!["Review allowlist and escaping controls.".to_string()],
        ),
        "unrestricted" | "true" | "enabled" | "on" => CheckResult::new(
            SHELL,
            TITLE,
            10.0,
            Severity::Critical,
            "Agent can execute unrestricted shell commands.",
            vec!["Treat runtime as equivalent to current user shell access.".to_string()],
        ),
        _ => CheckResult::new(
            SHELL,
            TITLE,
            7.5,
            Severity::High,
            "Shell policy is unclear; assume broad command execution.",
            vec![format!("Observed shell mode: {mode}")],
        ),
    }
}
