use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FAMLY_LOG";

/// Installs the stderr subscriber. The filter comes from `FAMLY_LOG`, defaulting to `warn`.
///
/// With `quiet` set, nothing is logged unless `FAMLY_LOG` is given explicitly;
/// the TUI uses this so log lines don't land on its screen.
pub fn init(quiet: bool) {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(f) => f,
        Err(_) if quiet => EnvFilter::new("off"),
        Err(_) => EnvFilter::new("warn"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
