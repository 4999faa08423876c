use chrono::{DateTime, Utc};
use serde::Serialize;

use super::change_record::{ProjectId, TaskId};

/// One line of a reconstructed history: a timestamp plus a
/// human-readable description of one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub activity: String,
    pub time: DateTime<Utc>,
}

/// The three change-log record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Comment,
    FieldChange,
    Assignment,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Comment => "comment",
            Self::FieldChange => "field change",
            Self::Assignment => "assignment",
        })
    }
}

/// A record that produced no entry, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub kind: RecordKind,
    pub task_id: TaskId,
    pub reason: String,
}

/// A generated feed: entries most recent first, plus what was left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub entries: Vec<ActivityEntry>,
    pub skipped: Vec<SkippedRecord>,
}

impl Feed {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
