use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// End-to-end tests of `monitor`.
///
/// Most run against a fabricated process-information tree handed in via
/// AGENT_AUDIT_PROC_ROOT, so the events are fully predictable. A couple
/// run against the real /proc to prove the wiring on a live system.

fn agent_audit() -> Command {
    let mut cmd = Command::cargo_bin("agent-audit").unwrap();
    cmd.env_remove("AGENT_AUDIT_LOG")
        .env_remove("AGENT_AUDIT_PROC_ROOT");
    cmd
}

/// node (4242) -> curl (4243), node holding an ssh key and a socket to
/// 34.216.184.93:443.
fn fabricated_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let node = root.join("4242");
    fs::create_dir_all(node.join("fd")).unwrap();
    fs::create_dir_all(node.join("fdinfo")).unwrap();
    fs::write(node.join("stat"), "4242 (node) S 1 4242 4242 0 -1").unwrap();
    fs::write(node.join("cmdline"), b"node\0agent.js\0").unwrap();
    symlink("/home/u/.ssh/id_rsa", node.join("fd/3")).unwrap();
    fs::write(node.join("fdinfo/3"), "pos:\t0\nflags:\t0100000\n").unwrap();
    symlink("socket:[9001]", node.join("fd/4")).unwrap();
    symlink("pipe:[77]", node.join("fd/5")).unwrap();

    let curl = root.join("4243");
    fs::create_dir_all(curl.join("fd")).unwrap();
    fs::write(curl.join("stat"), "4243 (curl) S 4242 4242 4242 0 -1").unwrap();
    fs::write(curl.join("cmdline"), b"curl\0https://example.com\0").unwrap();

    // unrelated process, never reported
    let other = root.join("7");
    fs::create_dir_all(other.join("fd")).unwrap();
    fs::write(other.join("stat"), "7 (sshd) S 1 7 7 0 -1").unwrap();
    symlink("/etc/shadow", other.join("fd/3")).unwrap();

    fs::create_dir_all(root.join("net")).unwrap();
    fs::write(
        root.join("net/tcp"),
        "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n   \
         0: 0A00020F:C350 5DB8D822:01BB 01 00000000:00000000 02:000A7B2D 00000000  1000        0 9001 1\n",
    )
    .unwrap();
    dir
}

#[test]
fn fabricated_tree_json_report() {
    let tree = fabricated_tree();
    let output = agent_audit()
        .env("AGENT_AUDIT_PROC_ROOT", tree.path())
        .args(["monitor", "--pid", "4242", "--duration", "1", "--interval", "0.2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["pid"], 4242);
    assert!(doc["command"].is_null());
    assert_eq!(doc["duration_seconds"], 1.0);
    assert!(doc["session_id"].as_str().is_some());

    let events: Vec<(String, String, String)> = doc["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["kind"].as_str().unwrap().to_string(),
                e["target"].as_str().unwrap().to_string(),
                e["severity"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        events,
        vec![
            ("EXEC".into(), "curl https://example.com".into(), "high".into()),
            ("READ".into(), "/home/u/.ssh/id_rsa".into(), "critical".into()),
            ("NETWORK".into(), "tcp://34.216.184.93:443".into(), "medium".into()),
        ]
    );
    assert_eq!(doc["summary"]["events"], 3);
    assert_eq!(doc["summary"]["alerts_high"], 2);
    assert_eq!(doc["summary"]["alerts_medium"], 1);
}

#[test]
fn live_lines_stream_to_stdout_in_table_mode() {
    let tree = fabricated_tree();
    agent_audit()
        .env("AGENT_AUDIT_PROC_ROOT", tree.path())
        .args(["monitor", "--pid", "4242", "--duration", "1", "--interval", "0.5", "--live"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[CRITICAL] READ    /home/u/.ssh/id_rsa"))
        .stdout(predicate::str::contains("[HIGH] EXEC    curl https://example.com"))
        .stdout(predicate::str::contains("Session summary: events=3 high=2 medium=1"));
}

#[test]
fn nonexistent_pid_is_rejected() {
    agent_audit()
        .args(["monitor", "--pid", "999999999", "--duration", "1"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "PID 999999999 is not running or not visible from this namespace.",
        ));
}

#[test]
fn exactly_one_target_is_required() {
    agent_audit().arg("monitor").assert().code(2);
    agent_audit()
        .args(["monitor", "--pid", "1", "--exec", "sleep 1"])
        .assert()
        .code(2);
}

#[test]
fn watches_a_live_pid() {
    let started = Instant::now();
    agent_audit()
        .args(["monitor", "--duration", "1", "--interval", "0.2", "--pid"])
        .arg(std::process::id().to_string())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Session summary: events="));
    // one second of polling plus process start-up
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn launched_command_is_cleaned_up() {
    let output = agent_audit()
        .args(["monitor", "--exec", "sleep 30", "--duration", "1", "--interval", "0.2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["command"], "sleep 30");
    let pid = doc["pid"].as_u64().unwrap();

    let proc_dir = format!("/proc/{pid}");
    let deadline = Instant::now() + Duration::from_secs(2);
    while Path::new(&proc_dir).exists() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }
    assert!(!Path::new(&proc_dir).exists(), "launched child outlived the monitor");
}

#[test]
fn short_lived_command_ends_the_session_early() {
    let started = Instant::now();
    agent_audit()
        .args(["monitor", "--exec", "true", "--duration", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session summary:"));
    assert!(started.elapsed() < Duration::from_secs(5));
}
