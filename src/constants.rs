//! Global paths, environment knobs and heuristic token lists.

/// Default mount point of the process-information filesystem.
pub const PROC_ROOT: &str = "/proc";

// environment variables
pub const ENV_PROC_ROOT: &str = "AGENT_AUDIT_PROC_ROOT";
pub const ENV_LOG: &str = "AGENT_AUDIT_LOG";

// monitor defaults, in seconds
pub const DEFAULT_DURATION_SECS: f64 = 20.0;
pub const DEFAULT_INTERVAL_SECS: f64 = 0.5;
pub const MIN_DURATION_SECS: f64 = 1.0;
pub const MIN_INTERVAL_SECS: f64 = 0.1;

/// Grace period between SIGTERM and SIGKILL for a launched target.
pub const TERMINATE_GRACE_MS: u64 = 500;

/// Path fragments that make any file access critical.
pub const SENSITIVE_PATH_MARKERS: &[&str] = &[".ssh", ".aws", ".gnupg", ".env", "/etc", "/var/lib"];

/// Command fragments that mark an exec as high severity.
pub const HIGH_RISK_EXEC_TOKENS: &[&str] = &["sudo ", "curl ", "wget ", "nc ", "ssh "];

/// Interpreter / shell invocations, medium severity.
pub const INTERPRETER_EXEC_TOKENS: &[&str] = &["python", "node", "bash", "sh "];

/// Endpoints containing these are loopback or wildcard binds.
pub const LOCAL_ENDPOINT_MARKERS: &[&str] = &["127.0.0.1", "0.0.0.0", "[::1]", "[::]"];

/// Label prefix for sockets missing from every connection table.
pub const UNRESOLVED_SOCKET_PREFIX: &str = "socket_inode:";
