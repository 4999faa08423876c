use crate::core::errors::Result;
use crate::core::models::change_record::{ProjectId, TaskId, TaskTypeId, UserId};

/// Port for turning ids into display names.
///
/// Every lookup fails with `FeedError::NotFound` for an unknown id;
/// callers decide whether that skips a record or fails a request.
pub trait EntityResolver: Send + Sync {
    fn user_name(&self, id: UserId) -> Result<String>;

    fn task_name(&self, id: TaskId) -> Result<String>;

    /// Project that owns the task.
    fn task_project_id(&self, id: TaskId) -> Result<ProjectId>;

    fn task_type_name(&self, id: TaskTypeId) -> Result<String>;

    fn project_name(&self, id: ProjectId) -> Result<String>;
}
