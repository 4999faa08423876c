use std::future::Future;

use crate::adapters::change_log::jsonl_change_log::JsonlChangeLog;
use crate::adapters::directory::json_directory::JsonDirectory;
use crate::cli::context;
use crate::config::app_config::AppConfig;
use crate::core::errors::{FeedError, Result};

/// The two file-backed ports over the configured export directory.
pub struct Workspace {
    pub change_log: JsonlChangeLog,
    pub directory: JsonDirectory,
}

/// Load the config and open the export directory it points at.
pub fn open() -> Result<Workspace> {
    let taskfeed_dir = context::initialized_dir()?;
    let config = AppConfig::load(taskfeed_dir)?;
    let data_dir = config.data_dir(taskfeed_dir);
    if !data_dir.is_dir() {
        return Err(FeedError::InvalidConfig {
            detail: format!(
                "Export directory {} does not exist. Check [store] data_dir in config.toml.",
                data_dir.display()
            ),
        });
    }

    let directory = JsonDirectory::load(&data_dir)?;
    let change_log = JsonlChangeLog::new(&data_dir, directory.task_projects());

    Ok(Workspace {
        change_log,
        directory,
    })
}

/// Drive an async core call to completion on a current-thread runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    Ok(rt.block_on(future))
}
