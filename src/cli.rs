use agent_audit::constants::{
    DEFAULT_DURATION_SECS, DEFAULT_INTERVAL_SECS, ENV_PROC_ROOT, MIN_DURATION_SECS,
    MIN_INTERVAL_SECS, PROC_ROOT,
};
use agent_audit::model::Pid;
use agent_audit::report::{MonitorFormat, ScanFormat};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agent-audit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Security audit and live activity monitor for AI agents"
)]
pub struct Cli {
    /// log more to stderr: -v info, -vv debug, -vvv trace ($AGENT_AUDIT_LOG wins)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// process-information tree to read instead of /proc
    #[arg(long, global = true, hide = true, env = ENV_PROC_ROOT, default_value = PROC_ROOT)]
    pub proc_root: PathBuf,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print version
    Version,

    /// Statically scan an agent configuration
    Scan {
        /// agent directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: ScanFormat,
    },

    /// Compare two agent scan results
    Compare {
        path_one: PathBuf,
        path_two: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: ScanFormat,
    },

    /// Monitor a running agent process (or a command launched for it)
    Monitor(MonitorArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["pid", "exec"])))]
pub struct MonitorArgs {
    /// PID of the agent process to monitor
    #[arg(long)]
    pub pid: Option<Pid>,

    /// command to launch through `sh -c` and monitor, e.g. --exec 'openclaw run'
    #[arg(long, value_name = "CMD")]
    pub exec: Option<String>,

    /// seconds to monitor for
    #[arg(long, default_value_t = DEFAULT_DURATION_SECS, value_parser = parse_duration)]
    pub duration: f64,

    /// seconds between polls
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS, value_parser = parse_interval)]
    pub interval: f64,

    /// project root used for file-scope severity
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// print events as they are collected
    #[arg(long)]
    pub live: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: MonitorFormat,
}

fn parse_seconds(raw: &str, min: f64) -> Result<f64, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if !secs.is_finite() || secs < min {
        return Err(format!("must be at least {min} seconds"));
    }
    Ok(secs)
}

fn parse_duration(raw: &str) -> Result<f64, String> {
    parse_seconds(raw, MIN_DURATION_SECS)
}

fn parse_interval(raw: &str) -> Result<f64, String> {
    parse_seconds(raw, MIN_INTERVAL_SECS)
}
