use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{FeedError, Result};

pub type TaskId = i64;
pub type UserId = i64;
pub type ProjectId = i64;
pub type TaskTypeId = i64;

/// A change-log row recording that one attribute of a task changed,
/// or that the task was created (all optional fields empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChangeRecord {
    pub task_id: TaskId,
    pub timestamp: DateTime<Utc>,
    pub updater_id: UserId,
    #[serde(default)]
    pub changed_name: Option<String>,
    #[serde(default)]
    pub changed_status: Option<String>,
    #[serde(default)]
    pub changed_urgency: Option<String>,
    #[serde(default)]
    pub changed_task_type_id: Option<TaskTypeId>,
}

/// What a `FieldChangeRecord` means once its nullable columns are read.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    NameChanged(String),
    StatusChanged(String),
    UrgencyChanged(String),
    TypeChanged(TaskTypeId),
    Created,
}

/// A `FieldChange` plus the number of other set fields that lost out
/// to the priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedChange {
    pub change: FieldChange,
    pub discarded: usize,
}

impl FieldChangeRecord {
    /// Number of optional attribute fields that carry a value.
    pub fn set_field_count(&self) -> usize {
        [
            self.changed_name.is_some(),
            self.changed_status.is_some(),
            self.changed_urgency.is_some(),
            self.changed_task_type_id.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Classify the record into a single `FieldChange`.
    ///
    /// Fields are checked in fixed priority order: name, status, urgency,
    /// task type. When several are set only the first wins and the rest
    /// are counted in `discarded`. The writer never records which one was
    /// meant, so this order is a known limitation, not a derived fact.
    pub fn classify(&self) -> ClassifiedChange {
        let set = self.set_field_count();
        let change = if let Some(name) = &self.changed_name {
            FieldChange::NameChanged(name.clone())
        } else if let Some(status) = &self.changed_status {
            FieldChange::StatusChanged(status.clone())
        } else if let Some(urgency) = &self.changed_urgency {
            FieldChange::UrgencyChanged(urgency.clone())
        } else if let Some(type_id) = self.changed_task_type_id {
            FieldChange::TypeChanged(type_id)
        } else {
            FieldChange::Created
        };

        ClassifiedChange {
            change,
            discarded: set.saturating_sub(1),
        }
    }
}

/// A change-log row recording that a user was added to or removed from a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub updater_id: UserId,
    #[serde(default)]
    pub time_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_removed: Option<DateTime<Utc>>,
}

/// What an `AssignmentRecord` means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentEvent {
    Assigned(DateTime<Utc>),
    Unassigned(DateTime<Utc>),
}

impl AssignmentEvent {
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Self::Assigned(t) | Self::Unassigned(t) => *t,
        }
    }
}

impl AssignmentRecord {
    /// Classify the record. Exactly one of `time_added` / `time_removed`
    /// must be set.
    ///
    /// # Errors
    ///
    /// `AmbiguousRecord` when both or neither timestamp is present.
    pub fn event(&self) -> Result<AssignmentEvent> {
        match (self.time_added, self.time_removed) {
            (Some(added), None) => Ok(AssignmentEvent::Assigned(added)),
            (None, Some(removed)) => Ok(AssignmentEvent::Unassigned(removed)),
            (Some(_), Some(_)) => Err(self.ambiguous("both timeAdded and timeRemoved are set")),
            (None, None) => Err(self.ambiguous("neither timeAdded nor timeRemoved is set")),
        }
    }

    fn ambiguous(&self, detail: &str) -> FeedError {
        FeedError::AmbiguousRecord {
            record: "assignment",
            task_id: self.task_id,
            detail: detail.to_string(),
        }
    }
}

/// A comment left on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// The three record families for one slice of the change log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLogBatch {
    pub comments: Vec<CommentRecord>,
    pub field_changes: Vec<FieldChangeRecord>,
    pub assignments: Vec<AssignmentRecord>,
}

impl ChangeLogBatch {
    /// Total number of records across all three families.
    pub fn len(&self) -> usize {
        self.comments.len() + self.field_changes.len() + self.assignments.len()
    }
}
