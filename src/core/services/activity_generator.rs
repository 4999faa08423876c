use std::time::Instant;

use tracing::{debug, warn};

use crate::core::errors::Result;
use crate::core::models::activity_entry::{ActivityEntry, Feed, RecordKind, SkippedRecord};
use crate::core::models::change_record::{ProjectId, TaskId, UserId};
use crate::core::models::scope::FeedScope;
use crate::core::services::entry_builder::EntryBuilder;
use crate::core::services::{feed_merge, scope_guard};
use crate::core::traits::change_log::ChangeLogStore;
use crate::core::traits::resolver::EntityResolver;

/// Builds activity feeds by combining a `ChangeLogStore` with an
/// `EntityResolver`.
///
/// Stateless: every call re-reads the change log and rebuilds the feed.
pub struct ActivityGenerator<S: ChangeLogStore, R: EntityResolver> {
    pub store: S,
    pub resolver: R,
}

impl<S: ChangeLogStore, R: EntityResolver> ActivityGenerator<S, R> {
    /// Everything the user did, across all projects.
    pub async fn generate_for_user(&self, user: UserId) -> Result<Feed> {
        self.generate(FeedScope::User(user)).await
    }

    /// Everything that happened to the project's tasks.
    pub async fn generate_for_project(&self, project: ProjectId) -> Result<Feed> {
        self.generate(FeedScope::Project(project)).await
    }

    /// What the user did to the project's tasks.
    pub async fn generate_for_user_in_project(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> Result<Feed> {
        self.generate(FeedScope::UserInProject(project, user)).await
    }

    /// Build the feed for a scope.
    ///
    /// The three record families are fetched concurrently; the first
    /// fetch error fails the call and drops the others. Records that
    /// cannot be described (unknown ids, ambiguous assignments) are left
    /// out and listed in `Feed::skipped`.
    ///
    /// Entries come back most recent first. Entries sharing an instant
    /// keep the order comments, field changes, assignments.
    ///
    /// # Errors
    ///
    /// - `ScopeNotFound` if the scope names an unknown project or user.
    /// - Any error from the store, or a non per-record resolver error.
    pub async fn generate(&self, scope: FeedScope) -> Result<Feed> {
        scope_guard::validate_scope(&self.resolver, scope)?;

        let started = Instant::now();
        let (comments, field_changes, assignments) = tokio::try_join!(
            self.store.fetch_comments(scope),
            self.store.fetch_field_changes(scope),
            self.store.fetch_assignments(scope),
        )?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            %scope,
            comments = comments.len(),
            field_changes = field_changes.len(),
            assignments = assignments.len(),
            elapsed_ms,
            "fetched change log"
        );

        let builder = EntryBuilder::new(&self.resolver);
        let mut skipped = Vec::new();

        let from_comments = build_all(
            &comments,
            RecordKind::Comment,
            |c| c.task_id,
            |c| builder.from_comment(c),
            &mut skipped,
        )?;
        let from_changes = build_all(
            &field_changes,
            RecordKind::FieldChange,
            |c| c.task_id,
            |c| builder.from_field_change(c),
            &mut skipped,
        )?;
        let from_assignments = build_all(
            &assignments,
            RecordKind::Assignment,
            |a| a.task_id,
            |a| builder.from_assignment(a),
            &mut skipped,
        )?;

        let entries = feed_merge::newest_first([from_comments, from_changes, from_assignments]);
        debug!(%scope, entries = entries.len(), skipped = skipped.len(), "built feed");

        Ok(Feed { entries, skipped })
    }
}

/// Build an entry per record, moving per-record failures into `skipped`.
fn build_all<T>(
    records: &[T],
    kind: RecordKind,
    task_of: impl Fn(&T) -> TaskId,
    build: impl Fn(&T) -> Result<ActivityEntry>,
    skipped: &mut Vec<SkippedRecord>,
) -> Result<Vec<ActivityEntry>> {
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        match build(record) {
            Ok(entry) => entries.push(entry),
            Err(e) if e.is_per_record() => {
                let task_id = task_of(record);
                warn!(%kind, task_id, reason = %e, "skipping change-log record");
                skipped.push(SkippedRecord {
                    kind,
                    task_id,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{EntityKind, FeedError};
    use crate::core::models::change_record::{AssignmentRecord, CommentRecord, FieldChangeRecord};
    use crate::core::testing::{MemoryDirectory, MemoryLog, RendezvousLog, at};
    use std::time::Duration;

    fn directory() -> MemoryDirectory {
        MemoryDirectory::default()
            .user(1, "Alice")
            .user(2, "Bob")
            .user(3, "Carol")
            .project(10, "Website")
            .project(20, "Mobile")
            .task(100, 10, "Landing page")
            .task(101, 10, "Footer")
            .task(200, 20, "Push alerts")
    }

    fn comment(task: i64, user: i64, secs: i64, text: &str) -> CommentRecord {
        CommentRecord {
            task_id: task,
            user_id: user,
            timestamp: at(secs),
            text: text.to_string(),
        }
    }

    fn change(task: i64, updater: i64, secs: i64) -> FieldChangeRecord {
        FieldChangeRecord {
            task_id: task,
            timestamp: at(secs),
            updater_id: updater,
            changed_name: None,
            changed_status: None,
            changed_urgency: None,
            changed_task_type_id: None,
        }
    }

    fn assign(task: i64, user: i64, updater: i64, secs: i64) -> AssignmentRecord {
        AssignmentRecord {
            task_id: task,
            user_id: user,
            updater_id: updater,
            time_added: Some(at(secs)),
            time_removed: None,
        }
    }

    fn generator(
        log: MemoryLog,
        dir: MemoryDirectory,
    ) -> ActivityGenerator<MemoryLog, MemoryDirectory> {
        ActivityGenerator {
            store: log,
            resolver: dir,
        }
    }

    fn activities(feed: &Feed) -> Vec<&str> {
        feed.entries.iter().map(|e| e.activity.as_str()).collect()
    }

    #[tokio::test]
    async fn project_feed_orders_heterogeneous_records() {
        let dir = directory();
        let mut log = MemoryLog::for_directory(&dir);
        log.comments.push(comment(100, 1, 10, "Looks good"));
        log.field_changes.push(FieldChangeRecord {
            changed_name: Some("Redesign homepage".into()),
            ..change(100, 1, 20)
        });
        log.assignments.push(assign(100, 2, 1, 5));

        let feed = generator(log, dir).generate_for_project(10).await.unwrap();

        assert_eq!(feed.entries.len(), 3);
        assert_eq!(
            feed.entries.iter().map(|e| e.time).collect::<Vec<_>>(),
            vec![at(20), at(10), at(5)]
        );
        assert_eq!(
            activities(&feed),
            vec![
                "Alice changed the name for Landing page to Redesign homepage",
                "Alice commented on Landing page:   Looks good",
                "Alice assigned Bob to Landing page",
            ]
        );
        assert!(feed.skipped.is_empty());
    }

    #[tokio::test]
    async fn empty_change_log_yields_empty_feed() {
        let dir = directory();
        let log = MemoryLog::for_directory(&dir);
        let generator = generator(log, dir);

        assert!(generator.generate_for_project(10).await.unwrap().is_empty());
        assert!(generator.generate_for_user(1).await.unwrap().is_empty());
        assert!(
            generator
                .generate_for_user_in_project(10, 1)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn user_feed_spans_projects_and_ignores_other_actors() {
        let dir = directory();
        let mut log = MemoryLog::for_directory(&dir);
        log.comments.push(comment(100, 2, 1, "web"));
        log.comments.push(comment(200, 2, 2, "mobile"));
        log.comments.push(comment(200, 3, 3, "not Bob"));
        // Bob is the assignee here, not the actor.
        log.assignments.push(assign(101, 2, 1, 4));

        let feed = generator(log, dir).generate_for_user(2).await.unwrap();

        assert_eq!(
            activities(&feed),
            vec![
                "Bob commented on Push alerts:   mobile",
                "Bob commented on Landing page:   web",
            ]
        );
        assert_eq!(feed.entries[0].project_id, 20);
        assert_eq!(feed.entries[1].project_id, 10);
    }

    #[tokio::test]
    async fn user_in_project_feed_applies_both_filters() {
        let dir = directory();
        let mut log = MemoryLog::for_directory(&dir);
        log.field_changes.push(change(100, 1, 1));
        log.field_changes.push(change(200, 1, 2));
        log.field_changes.push(change(101, 3, 3));

        let feed = generator(log, dir)
            .generate_for_user_in_project(10, 1)
            .await
            .unwrap();

        assert_eq!(activities(&feed), vec!["Alice created a new task: Landing page"]);
    }

    #[tokio::test]
    async fn unresolvable_records_are_skipped_not_fatal() {
        let dir = directory();
        let mut log = MemoryLog::for_directory(&dir);
        log.comments.push(comment(100, 1, 10, "kept"));
        // User 99 does not exist.
        log.comments.push(comment(100, 99, 11, "ghost"));
        log.field_changes.push(FieldChangeRecord {
            changed_task_type_id: Some(404),
            ..change(101, 1, 12)
        });
        log.assignments.push(AssignmentRecord {
            time_removed: Some(at(13)),
            ..assign(100, 2, 1, 13)
        });
        log.assignments.push(assign(101, 2, 1, 14));

        let total = log.comments.len() + log.field_changes.len() + log.assignments.len();
        let feed = generator(log, dir).generate_for_project(10).await.unwrap();

        assert_eq!(feed.skipped.len(), 3);
        assert_eq!(feed.entries.len(), total - feed.skipped.len());
        assert_eq!(
            activities(&feed),
            vec![
                "Alice assigned Bob to Footer",
                "Alice commented on Landing page:   kept",
            ]
        );
        let kinds: Vec<RecordKind> = feed.skipped.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecordKind::Comment,
                RecordKind::FieldChange,
                RecordKind::Assignment
            ]
        );
    }

    #[tokio::test]
    async fn unknown_scope_ids_fail_the_request() {
        let dir = directory();
        let log = MemoryLog::for_directory(&dir);
        let generator = generator(log, dir);

        let err = generator.generate_for_project(77).await.unwrap_err();
        assert!(matches!(
            err,
            FeedError::ScopeNotFound {
                kind: EntityKind::Project,
                id: 77
            }
        ));

        let err = generator
            .generate_for_user_in_project(10, 88)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FeedError::ScopeNotFound {
                kind: EntityKind::User,
                id: 88
            }
        ));
    }

    #[tokio::test]
    async fn store_failure_fails_the_whole_feed() {
        let dir = directory();
        let mut log = MemoryLog::for_directory(&dir);
        log.comments.push(comment(100, 1, 10, "fine"));
        log.broken_assignments = true;

        let err = generator(log, dir).generate_for_project(10).await.unwrap_err();
        assert!(matches!(err, FeedError::StoreError { .. }));
    }

    #[tokio::test]
    async fn equal_timestamps_keep_kind_order() {
        let dir = directory();
        let mut log = MemoryLog::for_directory(&dir);
        log.assignments.push(assign(100, 2, 1, 50));
        log.field_changes.push(change(100, 1, 50));
        log.comments.push(comment(100, 1, 50, "same instant"));

        let feed = generator(log, dir).generate_for_project(10).await.unwrap();

        assert_eq!(
            activities(&feed),
            vec![
                "Alice commented on Landing page:   same instant",
                "Alice created a new task: Landing page",
                "Alice assigned Bob to Landing page",
            ]
        );
    }

    #[tokio::test]
    async fn output_is_always_descending() {
        let dir = directory();
        let mut log = MemoryLog::for_directory(&dir);
        for (i, secs) in [13, 2, 40, 7, 40, 1, 29].into_iter().enumerate() {
            let task = if i % 2 == 0 { 100 } else { 101 };
            log.comments.push(comment(task, 1, secs, "c"));
            log.field_changes.push(change(task, 2, secs + 3));
            log.assignments.push(assign(task, 3, 1, secs * 2));
        }

        let feed = generator(log, dir).generate_for_project(10).await.unwrap();

        assert_eq!(feed.entries.len(), 21);
        assert!(feed.entries.windows(2).all(|w| w[0].time >= w[1].time));
    }

    #[tokio::test]
    async fn record_families_are_fetched_concurrently() {
        let generator = ActivityGenerator {
            store: RendezvousLog::default(),
            resolver: directory(),
        };

        let feed = tokio::time::timeout(
            Duration::from_secs(5),
            generator.generate_for_project(10),
        )
        .await
        .expect("fetches did not overlap")
        .unwrap();

        assert!(feed.is_empty());
    }
}
