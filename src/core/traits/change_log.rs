use std::future::Future;

use crate::core::errors::Result;
use crate::core::models::change_record::{
    AssignmentRecord, ChangeLogBatch, CommentRecord, FieldChangeRecord, UserId,
};
use crate::core::models::scope::FeedScope;

/// Port for reading the three change-log record families.
///
/// Implementations live in `adapters::change_log`. The fetches are
/// independent of one another, so callers may await them concurrently.
///
/// Scope semantics shared by all three fetches:
/// - `User(u)`: records written by `u` (comment author, or updater for
///   field changes and assignments), across all projects.
/// - `Project(p)`: records on any task belonging to `p`.
/// - `UserInProject(p, u)`: both filters at once.
///
/// A record on a task with no known project matches `User(u)` only, so it
/// never reaches a project-scoped fetch. `fetch_unowned` returns exactly
/// those records.
pub trait ChangeLogStore: Send + Sync {
    fn fetch_comments(
        &self,
        scope: FeedScope,
    ) -> impl Future<Output = Result<Vec<CommentRecord>>> + Send;

    fn fetch_field_changes(
        &self,
        scope: FeedScope,
    ) -> impl Future<Output = Result<Vec<FieldChangeRecord>>> + Send;

    fn fetch_assignments(
        &self,
        scope: FeedScope,
    ) -> impl Future<Output = Result<Vec<AssignmentRecord>>> + Send;

    /// Records on tasks that belong to no known project, written by
    /// `actor` when one is given.
    fn fetch_unowned(
        &self,
        actor: Option<UserId>,
    ) -> impl Future<Output = Result<ChangeLogBatch>> + Send;
}
