use std::path::PathBuf;

/// All domain errors for taskfeed.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A task, user, task type or project id referenced by a record does
    /// not resolve. Recoverable per record.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    /// A change-log record whose shape does not say what happened.
    #[error("Ambiguous {record} record for task {task_id}: {detail}")]
    AmbiguousRecord {
        record: &'static str,
        task_id: i64,
        detail: String,
    },

    #[error(
        "{kind} {id} does not exist\n\n  \
         The feed scope must name an existing project and/or user.\n  \
         Check the ids in the export directory (projects.jsonl, users.jsonl)."
    )]
    ScopeNotFound { kind: EntityKind, id: i64 },

    #[error(
        "Cannot read change log {path}: {detail}\n\n  \
         Each line must be one JSON object. Blank lines are allowed.\n  \
         Run 'taskfeed check' once the file is readable to look for bad records."
    )]
    StoreError { path: PathBuf, detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "This project uses format version {project_version}, but your taskfeed \
         only supports up to version {supported_version}.\n\n  \
         Solutions:\n    \
         → Update taskfeed: cargo install taskfeed --force"
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FeedError {
    /// Returns true for errors that only invalidate a single record.
    pub fn is_per_record(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AmbiguousRecord { .. })
    }
}

/// Which kind of entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Task,
    TaskType,
    Project,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::User => "User",
            Self::Task => "Task",
            Self::TaskType => "Task type",
            Self::Project => "Project",
        };
        f.write_str(label)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FeedError>;
