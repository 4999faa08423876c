//! In-memory fakes for the core ports, shared by service tests.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Barrier;
use tracing_subscriber::fmt::MakeWriter;

use crate::core::errors::{EntityKind, FeedError, Result};
use crate::core::models::change_record::{
    AssignmentRecord, ChangeLogBatch, CommentRecord, FieldChangeRecord, ProjectId, TaskId,
    TaskTypeId, UserId,
};
use crate::core::models::scope::FeedScope;
use crate::core::traits::change_log::ChangeLogStore;
use crate::core::traits::resolver::EntityResolver;

/// Instant `secs` seconds after the Unix epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[derive(Debug, Default, Clone)]
pub struct MemoryDirectory {
    users: HashMap<UserId, String>,
    projects: HashMap<ProjectId, String>,
    tasks: HashMap<TaskId, (ProjectId, String)>,
    task_types: HashMap<TaskTypeId, String>,
}

impl MemoryDirectory {
    pub fn user(mut self, id: UserId, name: &str) -> Self {
        self.users.insert(id, name.to_string());
        self
    }

    pub fn project(mut self, id: ProjectId, name: &str) -> Self {
        self.projects.insert(id, name.to_string());
        self
    }

    pub fn task(mut self, id: TaskId, project: ProjectId, name: &str) -> Self {
        self.tasks.insert(id, (project, name.to_string()));
        self
    }

    pub fn task_type(mut self, id: TaskTypeId, name: &str) -> Self {
        self.task_types.insert(id, name.to_string());
        self
    }
}

fn lookup<V: Clone>(map: &HashMap<i64, V>, id: i64, kind: EntityKind) -> Result<V> {
    map.get(&id)
        .cloned()
        .ok_or(FeedError::NotFound { kind, id })
}

impl EntityResolver for MemoryDirectory {
    fn user_name(&self, id: UserId) -> Result<String> {
        lookup(&self.users, id, EntityKind::User)
    }

    fn task_name(&self, id: TaskId) -> Result<String> {
        lookup(&self.tasks, id, EntityKind::Task).map(|(_, name)| name)
    }

    fn task_project_id(&self, id: TaskId) -> Result<ProjectId> {
        lookup(&self.tasks, id, EntityKind::Task).map(|(project, _)| project)
    }

    fn task_type_name(&self, id: TaskTypeId) -> Result<String> {
        lookup(&self.task_types, id, EntityKind::TaskType)
    }

    fn project_name(&self, id: ProjectId) -> Result<String> {
        lookup(&self.projects, id, EntityKind::Project)
    }
}

/// Change log held in vectors. Scope filtering uses `task_projects`.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    pub task_projects: HashMap<TaskId, ProjectId>,
    pub comments: Vec<CommentRecord>,
    pub field_changes: Vec<FieldChangeRecord>,
    pub assignments: Vec<AssignmentRecord>,
    /// When set, every assignment fetch fails with a store error.
    pub broken_assignments: bool,
}

impl MemoryLog {
    pub fn for_directory(directory: &MemoryDirectory) -> Self {
        Self {
            task_projects: directory
                .tasks
                .iter()
                .map(|(task, (project, _))| (*task, *project))
                .collect(),
            ..Self::default()
        }
    }

    fn covers(&self, scope: FeedScope, task: TaskId, actor: UserId) -> bool {
        scope.covers(self.task_projects.get(&task).copied(), actor)
    }

    fn unowned(&self, task: TaskId, who: UserId, actor: Option<UserId>) -> bool {
        !self.task_projects.contains_key(&task) && actor.is_none_or(|a| a == who)
    }
}

impl ChangeLogStore for MemoryLog {
    async fn fetch_comments(&self, scope: FeedScope) -> Result<Vec<CommentRecord>> {
        Ok(self
            .comments
            .iter()
            .filter(|c| self.covers(scope, c.task_id, c.user_id))
            .cloned()
            .collect())
    }

    async fn fetch_field_changes(&self, scope: FeedScope) -> Result<Vec<FieldChangeRecord>> {
        Ok(self
            .field_changes
            .iter()
            .filter(|c| self.covers(scope, c.task_id, c.updater_id))
            .cloned()
            .collect())
    }

    async fn fetch_assignments(&self, scope: FeedScope) -> Result<Vec<AssignmentRecord>> {
        if self.broken_assignments {
            return Err(FeedError::StoreError {
                path: PathBuf::from("assignments.jsonl"),
                detail: "simulated read failure".into(),
            });
        }
        Ok(self
            .assignments
            .iter()
            .filter(|a| self.covers(scope, a.task_id, a.updater_id))
            .cloned()
            .collect())
    }

    async fn fetch_unowned(&self, actor: Option<UserId>) -> Result<ChangeLogBatch> {
        Ok(ChangeLogBatch {
            comments: self
                .comments
                .iter()
                .filter(|c| self.unowned(c.task_id, c.user_id, actor))
                .cloned()
                .collect(),
            field_changes: self
                .field_changes
                .iter()
                .filter(|c| self.unowned(c.task_id, c.updater_id, actor))
                .cloned()
                .collect(),
            assignments: self
                .assignments
                .iter()
                .filter(|a| self.unowned(a.task_id, a.updater_id, actor))
                .cloned()
                .collect(),
        })
    }
}

/// Change log whose fetches each wait on a shared barrier sized for three
/// parties. The fetches complete only when all three are in flight at once.
pub struct RendezvousLog {
    barrier: Barrier,
}

impl Default for RendezvousLog {
    fn default() -> Self {
        Self {
            barrier: Barrier::new(3),
        }
    }
}

impl ChangeLogStore for RendezvousLog {
    async fn fetch_comments(&self, _scope: FeedScope) -> Result<Vec<CommentRecord>> {
        self.barrier.wait().await;
        Ok(Vec::new())
    }

    async fn fetch_field_changes(&self, _scope: FeedScope) -> Result<Vec<FieldChangeRecord>> {
        self.barrier.wait().await;
        Ok(Vec::new())
    }

    async fn fetch_assignments(&self, _scope: FeedScope) -> Result<Vec<AssignmentRecord>> {
        self.barrier.wait().await;
        Ok(Vec::new())
    }

    async fn fetch_unowned(&self, _actor: Option<UserId>) -> Result<ChangeLogBatch> {
        Ok(ChangeLogBatch::default())
    }
}

/// In-memory log sink for asserting on emitted `tracing` events.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Run `f` with a subscriber writing plain-text events into this sink.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
