//! Polling process-activity monitor.
//!
//! Each tick takes a fresh snapshot of the target's process tree and the
//! kernel socket tables, walks every descendant's descriptor table and
//! emits an event for anything not reported earlier in the session:
//!
//! ```text
//!   alive? ──no──▶ STOPPED
//!     │yes
//!   descendants ─▶ socket index ─▶ EXEC for new pids
//!                                   └▶ READ / WRITE / NETWORK per new descriptor
//! ```
//!
//! Nothing a single read can do stops the loop: unreadable descriptor
//! tables, vanished processes and malformed rows all turn into "no data
//! this tick".

pub mod classify;
pub mod descendants;
pub mod sockets;

use crate::aggregator::SessionLog;
use crate::model::{EventKind, MonitorEvent, MonitorSummary, Pid};
use crate::paths;
use crate::procfs::{self, Fd, ProcFs, ProcSource};
use classify::{exec_severity, file_severity, network_severity};
use sockets::SocketIndex;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, trace};
use uuid::Uuid;

/// Lifecycle of one monitor instance. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Stopped,
}

/// What one tick sees of the target. Rebuilt every tick, never kept.
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    pub root: Pid,
    pub descendants: BTreeSet<Pid>,
    pub sockets: SocketIndex,
}

impl ProcessSnapshot {
    pub fn capture<S: ProcSource + ?Sized>(source: &S, root: Pid) -> Self {
        Self {
            root,
            descendants: descendants::collect_descendants(source, root),
            sockets: sockets::load_socket_index(source),
        }
    }
}

/// Everything already reported. Only ever grows, so a recycled pid or a
/// reopened descriptor is not reported twice.
#[derive(Debug, Default)]
struct SeenState {
    pids: HashSet<Pid>,
    files: HashSet<(Pid, String, bool)>,
    sockets: HashSet<u64>,
}

pub struct ProcessMonitor<S = ProcFs> {
    pid: Pid,
    project_root: Option<PathBuf>,
    source: S,
    session: SessionLog,
    seen: SeenState,
    state: MonitorState,
    session_id: Uuid,
    stop: Option<Arc<AtomicBool>>,
}

impl ProcessMonitor<ProcFs> {
    /// Monitor `pid` on the local `/proc`.
    pub fn new(pid: Pid, project_root: Option<&Path>) -> Self {
        Self::with_source(pid, project_root, ProcFs::new())
    }
}

impl<S: ProcSource> ProcessMonitor<S> {
    pub fn with_source(pid: Pid, project_root: Option<&Path>, source: S) -> Self {
        let mut seen = SeenState::default();
        // the target itself is what the caller asked for, not a discovery
        seen.pids.insert(pid);

        Self {
            pid,
            project_root: project_root.map(paths::resolve),
            source,
            session: SessionLog::new(),
            seen,
            state: MonitorState::Running,
            session_id: Uuid::new_v4(),
            stop: None,
        }
    }

    /// Flag polled between ticks; setting it ends `run` after the current tick.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn summarize(&self) -> MonitorSummary {
        self.session.summarize()
    }

    /// One tick. Returns only what is new since the previous ticks.
    pub fn poll(&mut self) -> Vec<MonitorEvent> {
        self.poll_with(&mut |_| {})
    }

    /// Poll every `interval` until `duration` elapses or the target exits.
    pub fn run(&mut self, duration: Duration, interval: Duration) -> Vec<MonitorEvent> {
        self.run_with(duration, interval, |_| {})
    }

    /// `run`, handing each event to `observer` as soon as its tick emits it.
    pub fn run_with<F>(&mut self, duration: Duration, interval: Duration, mut observer: F) -> Vec<MonitorEvent>
    where
        F: FnMut(&MonitorEvent),
    {
        let span = info_span!("monitor", session = %self.session_id, pid = self.pid);
        let _enter = span.enter();

        let deadline = Instant::now().checked_add(duration);
        let before_deadline = || deadline.map_or(true, |d| Instant::now() < d);

        let mut collected = Vec::new();
        let mut ticks = 0u64;
        while before_deadline() {
            if self.stop_requested() {
                info!("stop requested, ending session");
                break;
            }
            collected.extend(self.poll_with(&mut observer));
            ticks += 1;
            if self.state == MonitorState::Stopped {
                break;
            }
            // never sleep past the deadline
            let remaining = deadline.map_or(interval, |d| d.saturating_duration_since(Instant::now()));
            thread::sleep(interval.min(remaining));
        }

        debug!(ticks, events = collected.len(), state = ?self.state, "monitor run finished");
        collected
    }

    fn stop_requested(&self) -> bool {
        self.stop.as_ref().is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn poll_with(&mut self, observer: &mut dyn FnMut(&MonitorEvent)) -> Vec<MonitorEvent> {
        if self.state == MonitorState::Stopped {
            return Vec::new();
        }
        if !self.source.is_alive(self.pid) {
            info!("target process is gone");
            self.state = MonitorState::Stopped;
            return Vec::new();
        }

        let snapshot = ProcessSnapshot::capture(&self.source, self.pid);
        let mut events = Vec::new();

        for &pid in &snapshot.descendants {
            if self.seen.pids.insert(pid) {
                let command = self.command_for(pid);
                let severity = exec_severity(&command);
                events.push(MonitorEvent::new(EventKind::Exec, command, severity));
            }
        }
        for &pid in &snapshot.descendants {
            self.descriptor_events(pid, &snapshot.sockets, &mut events);
        }

        debug!(
            descendants = snapshot.descendants.len(),
            sockets = snapshot.sockets.len(),
            new_events = events.len(),
            "tick"
        );

        for event in &events {
            observer(event);
            self.session.record(event.clone());
        }
        events
    }

    fn command_for(&self, pid: Pid) -> String {
        match self.source.cmdline(pid) {
            Ok(argv) if !argv.is_empty() => argv.join(" "),
            Ok(_) => format!("pid:{pid}"),
            Err(e) => {
                trace!(pid, error = %e, "cmdline unreadable");
                format!("pid:{pid}")
            }
        }
    }

    fn descriptor_events(&mut self, pid: Pid, sockets: &SocketIndex, out: &mut Vec<MonitorEvent>) {
        let fds = match self.source.list_fds(pid) {
            Ok(fds) => fds,
            Err(e) => {
                trace!(pid, error = %e, "descriptor table unreadable");
                return;
            }
        };

        // a process's sockets follow all of its files
        let mut network = Vec::new();
        for fd in fds {
            let target = match self.source.fd_target(pid, fd) {
                Ok(target) => target,
                Err(e) => {
                    trace!(pid, fd, error = %e, "descriptor closed mid-scan");
                    continue;
                }
            };

            if let Some(inode) = procfs::socket_inode(&target) {
                if self.seen.sockets.insert(inode) {
                    let endpoint = sockets::endpoint_label(sockets, inode);
                    let severity = network_severity(&endpoint);
                    network.push(MonitorEvent::new(EventKind::Network, endpoint, severity));
                }
            } else if target.starts_with('/') {
                let is_write = self.is_write(pid, fd);
                if self.seen.files.insert((pid, target.clone(), is_write)) {
                    let severity = file_severity(&target, is_write, self.project_root.as_deref());
                    let kind = if is_write { EventKind::Write } else { EventKind::Read };
                    out.push(MonitorEvent::new(kind, target, severity));
                }
            }
            // pipes, anon inodes and friends are not resources we report
        }
        out.extend(network);
    }

    /// Unreadable or flag-less fdinfo counts as a read.
    fn is_write(&self, pid: Pid, fd: Fd) -> bool {
        match self.source.fd_flags(pid, fd) {
            Ok(flags) => flags.is_some_and(procfs::flags_allow_write),
            Err(e) => {
                trace!(pid, fd, error = %e, "fdinfo unreadable");
                false
            }
        }
    }
}
