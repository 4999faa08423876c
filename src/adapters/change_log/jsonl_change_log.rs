use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::adapters::jsonl;
use crate::core::errors::{FeedError, Result};
use crate::core::models::change_record::{
    AssignmentRecord, ChangeLogBatch, CommentRecord, FieldChangeRecord, ProjectId, TaskId,
    UserId,
};
use crate::core::models::scope::FeedScope;
use crate::core::traits::change_log::ChangeLogStore;

pub const COMMENTS_FILE: &str = "comments.jsonl";
pub const FIELD_CHANGES_FILE: &str = "field_changes.jsonl";
pub const ASSIGNMENTS_FILE: &str = "assignments.jsonl";

/// Change-log store that reads JSON-lines exports from a directory.
///
/// Each fetch re-reads its file, so concurrent fetches overlap on the
/// blocking pool. Records keep file order. A missing file is an empty
/// record family.
pub struct JsonlChangeLog {
    data_dir: PathBuf,
    task_projects: HashMap<TaskId, ProjectId>,
}

impl JsonlChangeLog {
    /// Create a store over `data_dir`. `task_projects` maps each task to
    /// its project and drives project-scoped filtering.
    pub fn new(data_dir: &Path, task_projects: HashMap<TaskId, ProjectId>) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            task_projects,
        }
    }

    async fn read_records<T: DeserializeOwned + Send>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.data_dir.join(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => jsonl::parse(&path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(FeedError::StoreError {
                path,
                detail: e.to_string(),
            }),
        }
    }

    fn covers(&self, scope: FeedScope, task: TaskId, actor: UserId) -> bool {
        scope.covers(self.task_projects.get(&task).copied(), actor)
    }

    fn unowned(&self, task: TaskId, who: UserId, actor: Option<UserId>) -> bool {
        !self.task_projects.contains_key(&task) && actor.is_none_or(|a| a == who)
    }
}

impl ChangeLogStore for JsonlChangeLog {
    async fn fetch_comments(&self, scope: FeedScope) -> Result<Vec<CommentRecord>> {
        let records: Vec<CommentRecord> = self.read_records(COMMENTS_FILE).await?;
        Ok(records
            .into_iter()
            .filter(|c| self.covers(scope, c.task_id, c.user_id))
            .collect())
    }

    async fn fetch_field_changes(&self, scope: FeedScope) -> Result<Vec<FieldChangeRecord>> {
        let records: Vec<FieldChangeRecord> = self.read_records(FIELD_CHANGES_FILE).await?;
        Ok(records
            .into_iter()
            .filter(|c| self.covers(scope, c.task_id, c.updater_id))
            .collect())
    }

    async fn fetch_assignments(&self, scope: FeedScope) -> Result<Vec<AssignmentRecord>> {
        let records: Vec<AssignmentRecord> = self.read_records(ASSIGNMENTS_FILE).await?;
        Ok(records
            .into_iter()
            .filter(|a| self.covers(scope, a.task_id, a.updater_id))
            .collect())
    }

    async fn fetch_unowned(&self, actor: Option<UserId>) -> Result<ChangeLogBatch> {
        let (comments, field_changes, assignments) = tokio::try_join!(
            self.read_records::<CommentRecord>(COMMENTS_FILE),
            self.read_records::<FieldChangeRecord>(FIELD_CHANGES_FILE),
            self.read_records::<AssignmentRecord>(ASSIGNMENTS_FILE),
        )?;
        Ok(ChangeLogBatch {
            comments: comments
                .into_iter()
                .filter(|c| self.unowned(c.task_id, c.user_id, actor))
                .collect(),
            field_changes: field_changes
                .into_iter()
                .filter(|c| self.unowned(c.task_id, c.updater_id, actor))
                .collect(),
            assignments: assignments
                .into_iter()
                .filter(|a| self.unowned(a.task_id, a.updater_id, actor))
                .collect(),
        })
    }
}
