//! Static severity heuristics for monitor observations.

use crate::constants::{
    HIGH_RISK_EXEC_TOKENS, INTERPRETER_EXEC_TOKENS, LOCAL_ENDPOINT_MARKERS,
    SENSITIVE_PATH_MARKERS,
};
use crate::model::Severity;
use std::path::Path;

/// Severity of a newly observed process, from its command line.
///
/// Network / privilege tools outrank interpreters; matching is a
/// case-insensitive substring test.
pub fn exec_severity(command: &str) -> Severity {
    let lower = command.to_lowercase();
    if HIGH_RISK_EXEC_TOKENS.iter().any(|t| lower.contains(t)) {
        Severity::High
    } else if INTERPRETER_EXEC_TOKENS.iter().any(|t| lower.contains(t)) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Severity of an open file.
///
/// `project_root` is expected to be canonical already; descriptor targets
/// come from the kernel and are canonical too, so a component-wise prefix
/// test is enough.
pub fn file_severity(path: &str, is_write: bool, project_root: Option<&Path>) -> Severity {
    let lower = path.to_lowercase();
    if lower == "/dev/null" || lower.starts_with("/dev/pts/") {
        return Severity::Low;
    }
    if SENSITIVE_PATH_MARKERS.iter().any(|m| lower.contains(m)) {
        return Severity::Critical;
    }

    let target = Path::new(path);
    let outside_root = project_root.is_some_and(|root| target.is_absolute() && !target.starts_with(root));
    match (outside_root, is_write) {
        (true, true) => Severity::High,
        (true, false) | (false, true) => Severity::Medium,
        (false, false) => Severity::Low,
    }
}

/// Severity of a socket, from its resolved endpoint label.
pub fn network_severity(endpoint: &str) -> Severity {
    if LOCAL_ENDPOINT_MARKERS.iter().any(|m| endpoint.contains(m)) {
        Severity::Low
    } else {
        Severity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_high_list_wins() {
        assert_eq!(exec_severity("sudo apt install x"), Severity::High);
        assert_eq!(exec_severity("bash -c curl https://x.sh"), Severity::High);
        assert_eq!(exec_severity("/usr/bin/SSH host"), Severity::High);
        assert_eq!(exec_severity("python3 agent.py"), Severity::Medium);
        assert_eq!(exec_severity("/bin/sh -c ls"), Severity::Medium);
        assert_eq!(exec_severity("git status"), Severity::Low);
        // no trailing space, so not an ssh invocation
        assert_eq!(exec_severity("ssh-agent"), Severity::Low);
    }

    #[test]
    fn dev_null_and_ttys_are_low_either_way() {
        for write in [false, true] {
            assert_eq!(file_severity("/dev/null", write, None), Severity::Low);
            assert_eq!(
                file_severity("/dev/pts/3", write, Some(Path::new("/srv/app"))),
                Severity::Low
            );
        }
    }

    #[test]
    fn sensitive_markers_are_critical() {
        assert_eq!(file_severity("/home/u/.ssh/id_rsa", false, None), Severity::Critical);
        assert_eq!(file_severity("/etc/passwd", false, None), Severity::Critical);
        assert_eq!(file_severity("/srv/app/.env", true, Some(Path::new("/srv/app"))), Severity::Critical);
        assert_eq!(file_severity("/var/lib/dpkg/status", false, None), Severity::Critical);
        assert_eq!(file_severity("/home/u/.AWS/credentials", false, None), Severity::Critical);
    }

    #[test]
    fn project_scope_splits_by_direction() {
        let root = Some(Path::new("/srv/app"));
        assert_eq!(file_severity("/opt/other/file.txt", true, root), Severity::High);
        assert_eq!(file_severity("/opt/other/file.txt", false, root), Severity::Medium);
        assert_eq!(file_severity("/srv/app/src/main.rs", true, root), Severity::Medium);
        assert_eq!(file_severity("/srv/app/src/main.rs", false, root), Severity::Low);
        // prefix on a component boundary only
        assert_eq!(file_severity("/srv/application/x", true, root), Severity::High);
    }

    #[test]
    fn no_root_means_direction_only() {
        assert_eq!(file_severity("/opt/other/file.txt", true, None), Severity::Medium);
        assert_eq!(file_severity("/opt/other/file.txt", false, None), Severity::Low);
    }

    #[test]
    fn local_endpoints_are_low() {
        assert_eq!(network_severity("tcp://127.0.0.1:8080"), Severity::Low);
        assert_eq!(network_severity("udp://0.0.0.0:0"), Severity::Low);
        assert_eq!(network_severity("tcp6://[::1]:443"), Severity::Low);
        assert_eq!(network_severity("tcp://34.216.184.93:443"), Severity::Medium);
        assert_eq!(network_severity("socket_inode:991"), Severity::Medium);
    }
}
