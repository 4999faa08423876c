use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::errors::{EntityKind, FeedError, Result};
use crate::core::models::activity_entry::RecordKind;
use crate::core::models::change_record::{ChangeLogBatch, TaskId};
use crate::core::models::scope::FeedScope;
use crate::core::services::scope_guard;
use crate::core::traits::change_log::ChangeLogStore;
use crate::core::traits::resolver::EntityResolver;

/// A data-integrity problem found in the change log.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityIssue {
    /// A field-change record with more than one attribute set. Only the
    /// first by priority shows up in feeds.
    MultiFieldChange {
        task_id: TaskId,
        timestamp: DateTime<Utc>,
        fields: usize,
    },
    /// An assignment record with both or neither timestamp set.
    AmbiguousAssignment { task_id: TaskId, detail: String },
    /// A record pointing at an id the directory does not know.
    DanglingReference {
        record: RecordKind,
        task_id: TaskId,
        missing: EntityKind,
        id: i64,
    },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultiFieldChange {
                task_id,
                timestamp,
                fields,
            } => write!(
                f,
                "task {task_id}: field change at {} sets {fields} attributes",
                timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            Self::AmbiguousAssignment { task_id, detail } => {
                write!(f, "task {task_id}: assignment record has {detail}")
            }
            Self::DanglingReference {
                record,
                task_id,
                missing,
                id,
            } => write!(f, "task {task_id}: {record} refers to unknown {missing} {id}"),
        }
    }
}

/// Result of scanning a scope's change log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrityReport {
    pub records_scanned: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Returns true if no issues were found.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Scans change-log records for shapes the feed cannot describe faithfully.
pub struct IntegrityService<S: ChangeLogStore, R: EntityResolver> {
    pub store: S,
    pub resolver: R,
}

impl<S: ChangeLogStore, R: EntityResolver> IntegrityService<S, R> {
    /// Check every record in `scope`.
    ///
    /// Issues are reported per record in the order comments, field
    /// changes, assignments. A project scope also scans records on tasks
    /// that belong to no known project (restricted to the scope's user, if
    /// any): no project fetch can return them, so each one surfaces here
    /// as a dangling task reference.
    ///
    /// # Errors
    ///
    /// - `ScopeNotFound` if the scope names an unknown project or user.
    /// - Any error from the store, or a non per-record resolver error.
    pub async fn check(&self, scope: FeedScope) -> Result<IntegrityReport> {
        scope_guard::validate_scope(&self.resolver, scope)?;

        let unowned = async {
            match scope.project() {
                Some(_) => self.store.fetch_unowned(scope.user()).await,
                None => Ok(ChangeLogBatch::default()),
            }
        };
        let (comments, field_changes, assignments, unowned) = tokio::try_join!(
            self.store.fetch_comments(scope),
            self.store.fetch_field_changes(scope),
            self.store.fetch_assignments(scope),
            unowned,
        )?;
        let scoped = ChangeLogBatch {
            comments,
            field_changes,
            assignments,
        };

        let mut report = IntegrityReport::default();
        self.scan(&scoped, &mut report)?;
        self.scan(&unowned, &mut report)?;
        debug!(
            %scope,
            scanned = report.records_scanned,
            unowned = unowned.len(),
            issues = report.issues.len(),
            "integrity check finished"
        );
        Ok(report)
    }

    fn scan(&self, batch: &ChangeLogBatch, report: &mut IntegrityReport) -> Result<()> {
        report.records_scanned += batch.len();

        for c in &batch.comments {
            self.require_task(RecordKind::Comment, c.task_id, report)?;
            self.require_user(RecordKind::Comment, c.task_id, c.user_id, report)?;
        }

        for c in &batch.field_changes {
            let fields = c.set_field_count();
            if fields > 1 {
                report.issues.push(IntegrityIssue::MultiFieldChange {
                    task_id: c.task_id,
                    timestamp: c.timestamp,
                    fields,
                });
            }
            self.require_task(RecordKind::FieldChange, c.task_id, report)?;
            self.require_user(RecordKind::FieldChange, c.task_id, c.updater_id, report)?;
            if let Some(type_id) = c.changed_task_type_id {
                let found = self.resolver.task_type_name(type_id);
                note_missing(found, RecordKind::FieldChange, c.task_id, report)?;
            }
        }

        for a in &batch.assignments {
            if let Err(FeedError::AmbiguousRecord { detail, .. }) = a.event() {
                report.issues.push(IntegrityIssue::AmbiguousAssignment {
                    task_id: a.task_id,
                    detail,
                });
            }
            self.require_task(RecordKind::Assignment, a.task_id, report)?;
            self.require_user(RecordKind::Assignment, a.task_id, a.updater_id, report)?;
            self.require_user(RecordKind::Assignment, a.task_id, a.user_id, report)?;
        }

        Ok(())
    }

    fn require_task(
        &self,
        record: RecordKind,
        task_id: TaskId,
        report: &mut IntegrityReport,
    ) -> Result<()> {
        note_missing(self.resolver.task_name(task_id), record, task_id, report)
    }

    fn require_user(
        &self,
        record: RecordKind,
        task_id: TaskId,
        user_id: i64,
        report: &mut IntegrityReport,
    ) -> Result<()> {
        note_missing(self.resolver.user_name(user_id), record, task_id, report)
    }
}

/// Record a `NotFound` lookup as a dangling reference; propagate anything else.
fn note_missing<T>(
    lookup: Result<T>,
    record: RecordKind,
    task_id: TaskId,
    report: &mut IntegrityReport,
) -> Result<()> {
    match lookup {
        Ok(_) => Ok(()),
        Err(FeedError::NotFound { kind, id }) => {
            report.issues.push(IntegrityIssue::DanglingReference {
                record,
                task_id,
                missing: kind,
                id,
            });
            Ok(())
        }
        Err(e) => Err(e),
    }
}
