use tracing::warn;

use crate::core::errors::Result;
use crate::core::models::activity_entry::ActivityEntry;
use crate::core::models::change_record::{
    AssignmentEvent, AssignmentRecord, CommentRecord, FieldChange, FieldChangeRecord, TaskId,
};
use crate::core::traits::resolver::EntityResolver;

/// Turns one raw change-log record into an `ActivityEntry`.
///
/// Each method resolves the names it needs through the `EntityResolver`;
/// any failed lookup fails that one entry and nothing else.
pub struct EntryBuilder<'a, R: EntityResolver> {
    resolver: &'a R,
}

impl<'a, R: EntityResolver> EntryBuilder<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// `"<user> commented on <task>:   <text>"` at the comment's timestamp.
    pub fn from_comment(&self, record: &CommentRecord) -> Result<ActivityEntry> {
        let author = self.resolver.user_name(record.user_id)?;
        let task = self.resolver.task_name(record.task_id)?;

        self.entry(
            record.task_id,
            format!("{author} commented on {task}:   {}", record.text),
            record.timestamp,
        )
    }

    /// Describe a field change or a task creation.
    ///
    /// A record with several fields set is described by the first one in
    /// priority order (name, status, urgency, task type) and a warning is
    /// logged for the ones left out.
    pub fn from_field_change(&self, record: &FieldChangeRecord) -> Result<ActivityEntry> {
        let classified = record.classify();
        if classified.discarded > 0 {
            warn!(
                task_id = record.task_id,
                timestamp = %record.timestamp,
                discarded = classified.discarded,
                "field change record sets several attributes; describing only the first by priority"
            );
        }

        let updater = self.resolver.user_name(record.updater_id)?;
        let task = self.resolver.task_name(record.task_id)?;

        let (attribute, value) = match classified.change {
            FieldChange::Created => {
                return self.entry(
                    record.task_id,
                    format!("{updater} created a new task: {task}"),
                    record.timestamp,
                );
            }
            FieldChange::NameChanged(name) => ("name", name),
            FieldChange::StatusChanged(status) => ("task status", status),
            FieldChange::UrgencyChanged(urgency) => ("urgency", urgency),
            FieldChange::TypeChanged(type_id) => {
                ("task type", self.resolver.task_type_name(type_id)?)
            }
        };

        self.entry(
            record.task_id,
            format!("{updater} changed the {attribute} for {task} to {value}"),
            record.timestamp,
        )
    }

    /// Describe an assignment or unassignment at the time it happened.
    ///
    /// # Errors
    ///
    /// `AmbiguousRecord` when the record has both or neither timestamp.
    pub fn from_assignment(&self, record: &AssignmentRecord) -> Result<ActivityEntry> {
        let event = record.event()?;
        let updater = self.resolver.user_name(record.updater_id)?;
        let assignee = self.resolver.user_name(record.user_id)?;
        let task = self.resolver.task_name(record.task_id)?;

        let activity = match event {
            AssignmentEvent::Assigned(_) => format!("{updater} assigned {assignee} to {task}"),
            AssignmentEvent::Unassigned(_) => {
                format!("{updater} unassigned {assignee} from {task}")
            }
        };

        self.entry(record.task_id, activity, event.time())
    }

    fn entry(
        &self,
        task_id: TaskId,
        activity: String,
        time: chrono::DateTime<chrono::Utc>,
    ) -> Result<ActivityEntry> {
        Ok(ActivityEntry {
            project_id: self.resolver.task_project_id(task_id)?,
            task_id,
            activity,
            time,
        })
    }
}
