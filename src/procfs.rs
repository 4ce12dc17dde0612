//! Snapshot primitives over the process-information filesystem.
//!
//! Everything the monitor knows about the live system comes through
//! [`ProcSource`]. Reads are point-in-time: a process may vanish between
//! two calls, so every method reports failure through `io::Result` and the
//! callers decide what "missing" means.

use crate::constants;
use crate::model::Pid;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File descriptor number within one process.
pub type Fd = u32;

/// Kernel connection tables the socket resolver decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnTable {
    Tcp,
    Udp,
    Tcp6,
    Udp6,
}

impl ConnTable {
    pub const ALL: [ConnTable; 4] = [ConnTable::Tcp, ConnTable::Udp, ConnTable::Tcp6, ConnTable::Udp6];

    /// File name under `net/`, doubling as the endpoint scheme.
    pub fn name(self) -> &'static str {
        match self {
            ConnTable::Tcp => "tcp",
            ConnTable::Udp => "udp",
            ConnTable::Tcp6 => "tcp6",
            ConnTable::Udp6 => "udp6",
        }
    }

    pub fn is_ipv6(self) -> bool {
        matches!(self, ConnTable::Tcp6 | ConnTable::Udp6)
    }
}

/// Platform snapshot provider.
///
/// `ProcFs` reads a real `/proc`; tests substitute an in-memory tree.
pub trait ProcSource {
    /// Process is visible and not a zombie.
    fn is_alive(&self, pid: Pid) -> bool;

    /// Every numeric process id currently visible, ascending.
    fn list_pids(&self) -> io::Result<Vec<Pid>>;

    /// Parent pid, `None` for processes without one (pid 1, kernel threads).
    fn parent_of(&self, pid: Pid) -> io::Result<Option<Pid>>;

    /// argv, with empty parts dropped.
    fn cmdline(&self, pid: Pid) -> io::Result<Vec<String>>;

    /// Open descriptor numbers, ascending.
    fn list_fds(&self, pid: Pid) -> io::Result<Vec<Fd>>;

    /// Link target of a descriptor: a path or a `socket:[N]` style pseudo-path.
    fn fd_target(&self, pid: Pid, fd: Fd) -> io::Result<String>;

    /// Open flags from fdinfo; `None` when no parsable `flags:` line exists.
    fn fd_flags(&self, pid: Pid, fd: Fd) -> io::Result<Option<u32>>;

    /// Raw connection table contents, `None` when the platform hides it.
    fn connection_table(&self, table: ConnTable) -> io::Result<Option<String>>;
}

/// `/proc`-backed snapshot provider.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::with_root(constants::PROC_ROOT)
    }
}

impl ProcFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a process tree mounted (or fabricated) somewhere other than `/proc`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pid_dir(&self, pid: Pid) -> PathBuf {
        self.root.join(pid.to_string())
    }
}

impl ProcSource for ProcFs {
    fn is_alive(&self, pid: Pid) -> bool {
        let dir = self.pid_dir(pid);
        if !dir.is_dir() {
            return false;
        }
        match fs::read_to_string(dir.join("stat")) {
            Ok(stat) => parse_stat(&stat).map_or(true, |s| !s.is_dead()),
            // directory is there but stat is not readable to us
            Err(_) => true,
        }
    }

    fn list_pids(&self) -> io::Result<Vec<Pid>> {
        let mut pids: Vec<Pid> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str()?.parse::<Pid>().ok())
            .collect();
        pids.sort_unstable();
        Ok(pids)
    }

    fn parent_of(&self, pid: Pid) -> io::Result<Option<Pid>> {
        let stat = fs::read_to_string(self.pid_dir(pid).join("stat"))?;
        let fields = parse_stat(&stat).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, format!("malformed stat for pid {pid}"))
        })?;
        Ok(fields.ppid.filter(|&ppid| ppid != 0))
    }

    fn cmdline(&self, pid: Pid) -> io::Result<Vec<String>> {
        let raw = fs::read(self.pid_dir(pid).join("cmdline"))?;
        Ok(split_cmdline(&raw))
    }

    fn list_fds(&self, pid: Pid) -> io::Result<Vec<Fd>> {
        let mut fds: Vec<Fd> = fs::read_dir(self.pid_dir(pid).join("fd"))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str()?.parse::<Fd>().ok())
            .collect();
        fds.sort_unstable();
        Ok(fds)
    }

    fn fd_target(&self, pid: Pid, fd: Fd) -> io::Result<String> {
        let link = fs::read_link(self.pid_dir(pid).join("fd").join(fd.to_string()))?;
        Ok(link.to_string_lossy().into_owned())
    }

    fn fd_flags(&self, pid: Pid, fd: Fd) -> io::Result<Option<u32>> {
        let info = fs::read_to_string(self.pid_dir(pid).join("fdinfo").join(fd.to_string()))?;
        Ok(parse_fdinfo_flags(&info))
    }

    fn connection_table(&self, table: ConnTable) -> io::Result<Option<String>> {
        match fs::read_to_string(self.root.join("net").join(table.name())) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// The two `stat` fields the monitor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatFields {
    pub state: char,
    pub ppid: Option<Pid>,
}

impl StatFields {
    /// Zombie or dead: gone for monitoring purposes.
    pub fn is_dead(&self) -> bool {
        matches!(self.state, 'Z' | 'X' | 'x')
    }
}

/// Parse `<pid> (<comm>) <state> <ppid> ...`.
///
/// `comm` may itself contain spaces and parentheses, so fields are counted
/// from the last `)` rather than split from the start of the line.
pub fn parse_stat(stat: &str) -> Option<StatFields> {
    let after_comm = &stat[stat.rfind(')')? + 1..];
    let mut fields = after_comm.split_whitespace();
    let state = fields.next()?.chars().next()?;
    let ppid = fields.next().and_then(|p| p.parse::<Pid>().ok());
    Some(StatFields { state, ppid })
}

/// Octal value of the `flags:` line in an fdinfo file.
pub fn parse_fdinfo_flags(info: &str) -> Option<u32> {
    let line = info.lines().find(|l| l.starts_with("flags:"))?;
    u32::from_str_radix(line["flags:".len()..].trim(), 8).ok()
}

/// True when the access-mode bits say the descriptor may write.
pub fn flags_allow_write(flags: u32) -> bool {
    let mode = flags & libc::O_ACCMODE as u32;
    mode == libc::O_WRONLY as u32 || mode == libc::O_RDWR as u32
}

/// NUL-separated argv to owned strings, lossy on bad UTF-8.
pub fn split_cmdline(raw: &[u8]) -> Vec<String> {
    raw.split(|&b| b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned())
        .collect()
}

/// Inode from a `socket:[12345]` descriptor target.
pub fn socket_inode(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory process tree for exercising the monitor without `/proc`.

    use super::*;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashMap};
    use std::rc::Rc;

    #[derive(Debug, Default, Clone)]
    struct FakeProcess {
        ppid: Option<Pid>,
        cmdline: Vec<String>,
        fds: BTreeMap<Fd, (String, Option<u32>)>,
        zombie: bool,
        fds_denied: bool,
    }

    #[derive(Debug, Default)]
    struct FakeState {
        procs: BTreeMap<Pid, FakeProcess>,
        tables: HashMap<ConnTable, String>,
        pid_scans: usize,
    }

    /// Cloning hands out another handle onto the same tree, so a test can
    /// keep mutating it while the monitor owns a copy.
    #[derive(Debug, Default, Clone)]
    pub struct FakeProc {
        inner: Rc<RefCell<FakeState>>,
    }

    impl FakeProc {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn spawn(&self, pid: Pid, ppid: Option<Pid>, cmdline: &str) -> &Self {
            self.inner.borrow_mut().procs.insert(
                pid,
                FakeProcess {
                    ppid,
                    cmdline: cmdline.split_whitespace().map(str::to_string).collect(),
                    ..FakeProcess::default()
                },
            );
            self
        }

        pub fn open(&self, pid: Pid, fd: Fd, target: &str, flags: Option<u32>) -> &Self {
            if let Some(p) = self.inner.borrow_mut().procs.get_mut(&pid) {
                p.fds.insert(fd, (target.to_string(), flags));
            }
            self
        }

        pub fn close(&self, pid: Pid, fd: Fd) -> &Self {
            if let Some(p) = self.inner.borrow_mut().procs.get_mut(&pid) {
                p.fds.remove(&fd);
            }
            self
        }

        pub fn deny_fds(&self, pid: Pid) -> &Self {
            if let Some(p) = self.inner.borrow_mut().procs.get_mut(&pid) {
                p.fds_denied = true;
            }
            self
        }

        pub fn zombify(&self, pid: Pid) -> &Self {
            if let Some(p) = self.inner.borrow_mut().procs.get_mut(&pid) {
                p.zombie = true;
            }
            self
        }

        pub fn exit(&self, pid: Pid) -> &Self {
            self.inner.borrow_mut().procs.remove(&pid);
            self
        }

        pub fn table(&self, table: ConnTable, contents: &str) -> &Self {
            self.inner
                .borrow_mut()
                .tables
                .insert(table, contents.to_string());
            self
        }

        pub fn pid_scans(&self) -> usize {
            self.inner.borrow().pid_scans
        }

        fn with<T>(&self, pid: Pid, f: impl FnOnce(&FakeProcess) -> io::Result<T>) -> io::Result<T> {
            let state = self.inner.borrow();
            match state.procs.get(&pid) {
                Some(p) => f(p),
                None => Err(io::Error::new(io::ErrorKind::NotFound, format!("no pid {pid}"))),
            }
        }
    }

    impl ProcSource for FakeProc {
        fn is_alive(&self, pid: Pid) -> bool {
            self.inner
                .borrow()
                .procs
                .get(&pid)
                .is_some_and(|p| !p.zombie)
        }

        fn list_pids(&self) -> io::Result<Vec<Pid>> {
            let mut state = self.inner.borrow_mut();
            state.pid_scans += 1;
            Ok(state.procs.keys().copied().collect())
        }

        fn parent_of(&self, pid: Pid) -> io::Result<Option<Pid>> {
            self.with(pid, |p| Ok(p.ppid))
        }

        fn cmdline(&self, pid: Pid) -> io::Result<Vec<String>> {
            self.with(pid, |p| Ok(p.cmdline.clone()))
        }

        fn list_fds(&self, pid: Pid) -> io::Result<Vec<Fd>> {
            self.with(pid, |p| {
                if p.fds_denied {
                    return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
                }
                Ok(p.fds.keys().copied().collect())
            })
        }

        fn fd_target(&self, pid: Pid, fd: Fd) -> io::Result<String> {
            self.with(pid, |p| {
                p.fds
                    .get(&fd)
                    .map(|(target, _)| target.clone())
                    .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "fd closed"))
            })
        }

        fn fd_flags(&self, pid: Pid, fd: Fd) -> io::Result<Option<u32>> {
            self.with(pid, |p| {
                p.fds
                    .get(&fd)
                    .map(|(_, flags)| *flags)
                    .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "fd closed"))
            })
        }

        fn connection_table(&self, table: ConnTable) -> io::Result<Option<String>> {
            Ok(self.inner.borrow().tables.get(&table).cloned())
        }
    }
}
