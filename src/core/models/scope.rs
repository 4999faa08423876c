use super::change_record::{ProjectId, UserId};

/// Which records a feed request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Everything the user did, across all projects.
    User(UserId),
    /// Everything that happened to the project's tasks.
    Project(ProjectId),
    /// What the user did to the project's tasks.
    UserInProject(ProjectId, UserId),
}

impl FeedScope {
    /// Build a scope from optional CLI-style filters.
    /// Returns `None` when neither id is given.
    pub fn from_filters(project: Option<ProjectId>, user: Option<UserId>) -> Option<Self> {
        match (project, user) {
            (Some(p), Some(u)) => Some(Self::UserInProject(p, u)),
            (Some(p), None) => Some(Self::Project(p)),
            (None, Some(u)) => Some(Self::User(u)),
            (None, None) => None,
        }
    }

    pub fn project(&self) -> Option<ProjectId> {
        match self {
            Self::Project(p) | Self::UserInProject(p, _) => Some(*p),
            Self::User(_) => None,
        }
    }

    pub fn user(&self) -> Option<UserId> {
        match self {
            Self::User(u) | Self::UserInProject(_, u) => Some(*u),
            Self::Project(_) => None,
        }
    }

    /// Whether a record written by `actor` on a task owned by
    /// `task_project` falls inside this scope. A task with no known
    /// project never matches a project filter.
    pub fn covers(&self, task_project: Option<ProjectId>, actor: UserId) -> bool {
        match self {
            Self::User(u) => actor == *u,
            Self::Project(p) => task_project == Some(*p),
            Self::UserInProject(p, u) => actor == *u && task_project == Some(*p),
        }
    }
}

impl std::fmt::Display for FeedScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(u) => write!(f, "user {u}"),
            Self::Project(p) => write!(f, "project {p}"),
            Self::UserInProject(p, u) => write!(f, "user {u} in project {p}"),
        }
    }
}
