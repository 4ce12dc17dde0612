//! Launch a shell command for monitoring and make sure it does not outlive us.

use crate::constants::TERMINATE_GRACE_MS;
use crate::error::{AuditError, Result};
use crate::model::Pid;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid as NixPid;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How often the grace period checks whether SIGTERM was enough.
const REAP_POLL: Duration = Duration::from_millis(20);

/// A `sh -c` child owned for the lifetime of a monitoring session.
///
/// The child leads its own process group, so everything it starts can be
/// signalled together and a terminal Ctrl-C reaches only us. Dropping the
/// guard sends the group SIGTERM, then SIGKILL after a grace period, and
/// always reaps the shell.
#[derive(Debug)]
pub struct LaunchedProcess {
    command: String,
    child: Child,
}

impl LaunchedProcess {
    pub fn spawn(command: &str) -> Result<Self> {
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|source| AuditError::Launch {
                command: command.to_string(),
                source,
            })?;

        debug!(pid = child.id(), command, "launched target");
        Ok(Self {
            command: command.to_string(),
            child,
        })
    }

    pub fn pid(&self) -> Pid {
        self.child.id()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the child has exited; reaps it if so.
    pub fn has_exited(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }

    fn signal_group(&self, signal: Signal) {
        let group = NixPid::from_raw(self.child.id() as i32);
        if let Err(e) = killpg(group, signal) {
            // ESRCH once the whole group is gone
            debug!(pgid = %group, ?signal, error = %e, "group signal not delivered");
        }
    }

    /// Some member of the group is still around to receive signals.
    fn group_alive(&self) -> bool {
        killpg(NixPid::from_raw(self.child.id() as i32), None::<Signal>).is_ok()
    }

    fn terminate(&mut self) {
        let pid = self.child.id();
        // the shell may be gone already while its children are not
        self.signal_group(Signal::SIGTERM);

        let deadline = Instant::now() + Duration::from_millis(TERMINATE_GRACE_MS);
        while Instant::now() < deadline {
            // reaping the shell keeps a zombie leader from counting as alive
            if self.has_exited() && !self.group_alive() {
                debug!(pid, "target group exited after SIGTERM");
                break;
            }
            thread::sleep(REAP_POLL);
        }

        if self.group_alive() {
            warn!(pid, "target group ignored SIGTERM, killing");
        }
        self.signal_group(Signal::SIGKILL);
    }
}

impl Drop for LaunchedProcess {
    fn drop(&mut self) {
        self.terminate();
        // reap whatever state it ended in; never leave a zombie behind
        let _ = self.child.wait();
    }
}
