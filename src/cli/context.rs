use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::errors::{FeedError, Result};

/// Directory used when neither `--config` nor `TASKFEED_DIR` is given.
pub const DEFAULT_DIR: &str = ".taskfeed";

static TASKFEED_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Set the taskfeed directory for this process. `custom` comes from
/// `--config` or `TASKFEED_DIR`; without it the directory is `.taskfeed`.
pub fn init(custom: Option<&str>) {
    let dir = custom
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
    let _ = TASKFEED_DIR.set(dir);
}

pub fn taskfeed_dir() -> &'static Path {
    TASKFEED_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(DEFAULT_DIR))
}

/// The taskfeed directory, provided `taskfeed init` has created it.
///
/// # Errors
///
/// `InvalidConfig` if the path is missing or is not a directory.
pub fn initialized_dir() -> Result<&'static Path> {
    let dir = taskfeed_dir();
    require_initialized(dir)?;
    Ok(dir)
}

fn require_initialized(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    let detail = if dir.exists() {
        format!(
            "{} is a file, not a taskfeed directory.\n\n  \
             Point --config or TASKFEED_DIR at the directory 'taskfeed init' created.",
            dir.display()
        )
    } else {
        "taskfeed not initialized. Run 'taskfeed init' first.".into()
    };
    Err(FeedError::InvalidConfig { detail })
}
