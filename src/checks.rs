//! Static rule checks over a normalised agent config.
//!
//! Every check is a pure function producing a [`CheckResult`] scored 0-10.
//! Keys double as the weights' lookup keys in [`crate::risk`].

mod filesystem;
mod network;
mod secrets;
mod shell;
mod skills;

pub use filesystem::evaluate_filesystem;
pub use network::evaluate_network;
pub use secrets::evaluate_secrets;
pub use shell::evaluate_shell;
pub use skills::evaluate_skills;

use crate::model::{AgentConfig, CheckResult, Skill};

pub const FILESYSTEM: &str = "filesystem";
pub const NETWORK: &str = "network";
pub const SHELL: &str = "shell";
pub const SECRETS: &str = "secrets";
pub const SKILLS: &str = "skills";

/// All five checks, in report order.
pub fn evaluate_all(config: &AgentConfig, skills: &[Skill]) -> Vec<CheckResult> {
    vec![
        evaluate_filesystem(config),
        evaluate_network(&config.endpoints),
        evaluate_shell(config),
        evaluate_secrets(config),
        evaluate_skills(skills),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_order_is_stable() {
        let keys: Vec<_> = evaluate_all(&AgentConfig::default(), &[])
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec![FILESYSTEM, NETWORK, SHELL, SECRETS, SKILLS]);
    }
}
