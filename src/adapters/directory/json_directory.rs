use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::adapters::jsonl;
use crate::core::errors::{EntityKind, FeedError, Result};
use crate::core::models::change_record::{ProjectId, TaskId, TaskTypeId, UserId};
use crate::core::traits::resolver::EntityResolver;

pub const USERS_FILE: &str = "users.jsonl";
pub const PROJECTS_FILE: &str = "projects.jsonl";
pub const TASK_TYPES_FILE: &str = "task_types.jsonl";
pub const TASKS_FILE: &str = "tasks.jsonl";

#[derive(Debug, Deserialize)]
struct NamedRow {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRow {
    id: TaskId,
    project_id: ProjectId,
    name: String,
}

#[derive(Debug, Clone)]
struct TaskInfo {
    project_id: ProjectId,
    name: String,
}

/// Entity directory loaded from the JSON-lines tables of an export directory.
///
/// Tables are read once at load time. Files:
/// - `users.jsonl`, `projects.jsonl`, `task_types.jsonl`: `{"id": 1, "name": "..."}`
/// - `tasks.jsonl`: `{"id": 1, "projectId": 3, "name": "..."}`
///
/// A missing table is treated as empty. Duplicate ids: the last row wins.
#[derive(Debug, Clone, Default)]
pub struct JsonDirectory {
    users: HashMap<UserId, String>,
    projects: HashMap<ProjectId, String>,
    task_types: HashMap<TaskTypeId, String>,
    tasks: HashMap<TaskId, TaskInfo>,
}

impl JsonDirectory {
    /// Load all entity tables from `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let named = |file: &str| -> Result<HashMap<i64, String>> {
            let rows: Vec<NamedRow> = jsonl::read_file(&data_dir.join(file))?;
            Ok(rows.into_iter().map(|r| (r.id, r.name)).collect())
        };

        let task_rows: Vec<TaskRow> = jsonl::read_file(&data_dir.join(TASKS_FILE))?;
        let tasks = task_rows
            .into_iter()
            .map(|r| {
                (
                    r.id,
                    TaskInfo {
                        project_id: r.project_id,
                        name: r.name,
                    },
                )
            })
            .collect();

        Ok(Self {
            users: named(USERS_FILE)?,
            projects: named(PROJECTS_FILE)?,
            task_types: named(TASK_TYPES_FILE)?,
            tasks,
        })
    }

    /// Owning project of every known task, for scope filtering.
    pub fn task_projects(&self) -> HashMap<TaskId, ProjectId> {
        self.tasks
            .iter()
            .map(|(id, info)| (*id, info.project_id))
            .collect()
    }

    fn task(&self, id: TaskId) -> Result<&TaskInfo> {
        self.tasks.get(&id).ok_or(FeedError::NotFound {
            kind: EntityKind::Task,
            id,
        })
    }
}

fn name_of(map: &HashMap<i64, String>, id: i64, kind: EntityKind) -> Result<String> {
    map.get(&id).cloned().ok_or(FeedError::NotFound { kind, id })
}

impl EntityResolver for JsonDirectory {
    fn user_name(&self, id: UserId) -> Result<String> {
        name_of(&self.users, id, EntityKind::User)
    }

    fn task_name(&self, id: TaskId) -> Result<String> {
        self.task(id).map(|t| t.name.clone())
    }

    fn task_project_id(&self, id: TaskId) -> Result<ProjectId> {
        self.task(id).map(|t| t.project_id)
    }

    fn task_type_name(&self, id: TaskTypeId) -> Result<String> {
        name_of(&self.task_types, id, EntityKind::TaskType)
    }

    fn project_name(&self, id: ProjectId) -> Result<String> {
        name_of(&self.projects, id, EntityKind::Project)
    }
}
