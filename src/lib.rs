//! Security audit for AI agent runtimes.
//!
//! Two halves share one model:
//!
//! * a static scanner that reads an agent's config files ([`adapters`]),
//!   scores them with rule checks ([`checks`], [`risk`]) and renders a
//!   report ([`report`]);
//! * a live monitor that polls the process-information filesystem
//!   ([`procfs`]) for what an agent process tree actually opens, spawns and
//!   connects to ([`monitor`]).

pub mod adapters;
pub mod aggregator;
pub mod checks;
pub mod constants;
pub mod error;
pub mod launch;
pub mod log;
pub mod model;
pub mod monitor;
pub mod paths;
pub mod procfs;
pub mod report;
pub mod risk;
pub mod scanner;

pub use error::{AuditError, Result};
pub use monitor::{MonitorState, ProcessMonitor};
pub use scanner::scan;
