use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::app_config::AppConfig;

const DEFAULT_LEVEL: &str = "warn";

/// Install the stderr subscriber.
///
/// Filter precedence: a valid `RUST_LOG`, then `--verbose` / `--quiet`,
/// then `[logging] level` from the config, then `warn`.
pub fn init(verbose: bool, quiet: bool) {
    let configured = AppConfig::load(super::context::taskfeed_dir())
        .ok()
        .map(|c| c.logging.level);

    let filter = env_filter().unwrap_or_else(|| {
        EnvFilter::try_new(pick_level(verbose, quiet, configured.as_deref()))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn env_filter() -> Option<EnvFilter> {
    let raw = std::env::var("RUST_LOG").ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    EnvFilter::try_new(raw).ok()
}

fn pick_level<'a>(verbose: bool, quiet: bool, configured: Option<&'a str>) -> &'a str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        configured
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_LEVEL)
    }
}
