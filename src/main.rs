// src/main.rs
mod cli;

use agent_audit::error::{AuditError, EXIT_FAILURE};
use agent_audit::launch::LaunchedProcess;
use agent_audit::procfs::{ProcFs, ProcSource};
use agent_audit::report::{self, Comparison, CompareSide, MonitorFormat, MonitorReport};
use agent_audit::{log, scanner, ProcessMonitor};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, MonitorArgs};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use std::io;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();
    log::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<AuditError>()
                .map_or(EXIT_FAILURE, AuditError::exit_code);
            let message = format!("error: {e:#}");
            if io::stderr().is_tty() {
                eprintln!("{}", message.red());
            } else {
                eprintln!("{message}");
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        // ─────────────────────────── version ───────────────────────────────
        Commands::Version => println!("{}", env!("CARGO_PKG_VERSION")),

        // ─────────────────────────── scan ──────────────────────────────────
        Commands::Scan { path, format } => {
            let result = scanner::scan(&path)?;
            println!("{}", report::render_scan(&result, format, io::stdout().is_tty())?);
        }

        // ─────────────────────────── compare ───────────────────────────────
        Commands::Compare {
            path_one,
            path_two,
            format,
        } => {
            let left = scanner::scan(&path_one)?;
            let right = scanner::scan(&path_two)?;
            let comparison = Comparison {
                left: CompareSide::new(path_one.display().to_string(), &left),
                right: CompareSide::new(path_two.display().to_string(), &right),
            };
            println!("{}", comparison.render(format)?);
        }

        // ─────────────────────────── monitor ───────────────────────────────
        Commands::Monitor(args) => monitor(args, ProcFs::with_root(&cli.proc_root))?,
    }
    Ok(())
}

fn monitor(args: MonitorArgs, source: ProcFs) -> Result<()> {
    let duration = Duration::try_from_secs_f64(args.duration).context("--duration out of range")?;
    let interval = Duration::try_from_secs_f64(args.interval).context("--interval out of range")?;

    // a launched child may already be gone by the first tick; that is a
    // short session, not a user error
    let launched = args.exec.as_deref().map(LaunchedProcess::spawn).transpose()?;
    let pid = match (&launched, args.pid) {
        (Some(child), _) => child.pid(),
        (None, Some(pid)) if source.is_alive(pid) => pid,
        (None, Some(pid)) => return Err(AuditError::ProcessNotVisible { pid }.into()),
        (None, None) => return Err(anyhow!("provide either --pid or --exec")),
    };

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "Ctrl-C handler not installed");
    }

    let mut monitor = ProcessMonitor::with_source(pid, args.path.as_deref(), source).with_stop_flag(stop);
    info!(pid, session = %monitor.session_id(), "monitoring");

    let (live, format) = (args.live, args.format);
    let stdout_color = io::stdout().is_tty();
    let stderr_color = io::stderr().is_tty();
    let events = monitor.run_with(duration, interval, |event| {
        if !live {
            return;
        }
        // keep stdout a single JSON document
        match format {
            MonitorFormat::Table => println!("{}", report::event_line(event, stdout_color)),
            MonitorFormat::Json => eprintln!("{}", report::event_line(event, stderr_color)),
        }
    });
    drop(launched);

    let summary = monitor.summarize();
    match format {
        MonitorFormat::Json => {
            let doc = MonitorReport {
                pid,
                command: args.exec.as_deref(),
                duration_seconds: args.duration,
                session_id: monitor.session_id(),
                events: &events,
                summary,
            };
            println!("{}", doc.to_json()?);
        }
        MonitorFormat::Table => println!("{}", report::summary_line(&summary)),
    }
    Ok(())
}
