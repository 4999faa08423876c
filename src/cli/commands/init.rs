use crate::adapters::change_log::jsonl_change_log::{
    ASSIGNMENTS_FILE, COMMENTS_FILE, FIELD_CHANGES_FILE,
};
use crate::adapters::directory::json_directory::{
    PROJECTS_FILE, TASK_TYPES_FILE, TASKS_FILE, USERS_FILE,
};
use crate::cli::{context, output};
use crate::core::errors::{FeedError, Result};

const DEFAULT_CONFIG: &str = r#"[taskfeed]
version = "0.1.0"
format_version = 1

[store]
# Directory holding the JSON-lines export, relative to this directory.
data_dir = "data"

[logging]
level = "warn"
"#;

/// Execute the `taskfeed init` command.
///
/// Creates the `.taskfeed/` directory with a default config and an
/// empty export directory.
pub fn execute() -> Result<()> {
    let taskfeed_dir = context::taskfeed_dir();

    if taskfeed_dir.exists() {
        return Err(FeedError::InvalidConfig {
            detail: format!(
                "taskfeed is already initialized here ({} exists)",
                taskfeed_dir.display()
            ),
        });
    }

    output::header("taskfeed: initializing");

    let data_dir = taskfeed_dir.join("data");
    std::fs::create_dir_all(&data_dir)?;
    output::success(&format!("Created {}", taskfeed_dir.display()));

    std::fs::write(taskfeed_dir.join("config.toml"), DEFAULT_CONFIG)?;
    output::success("Generated config.toml with defaults");

    for file in [
        USERS_FILE,
        PROJECTS_FILE,
        TASK_TYPES_FILE,
        TASKS_FILE,
        COMMENTS_FILE,
        FIELD_CHANGES_FILE,
        ASSIGNMENTS_FILE,
    ] {
        std::fs::write(data_dir.join(file), "")?;
    }
    output::success(&format!(
        "Created empty export files in {}",
        data_dir.display()
    ));

    output::hint("Fill the export files, then run 'taskfeed feed --project <id>'.");
    Ok(())
}
