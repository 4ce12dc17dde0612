use crate::constants::ENV_LOG;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `AGENT_AUDIT_LOG` takes EnvFilter directives and wins over `-v`;
/// without it the level starts at `warn` and each `-v` raises it a step.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // a second init (tests calling in twice) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
