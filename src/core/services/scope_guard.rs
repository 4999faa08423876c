use crate::core::errors::{EntityKind, FeedError, Result};
use crate::core::models::scope::FeedScope;
use crate::core::traits::resolver::EntityResolver;

/// Check that the project and user named by a caller-supplied scope exist.
///
/// # Errors
///
/// - `ScopeNotFound` for an unknown project or user id.
/// - Any other resolver error unchanged.
pub fn validate_scope<R: EntityResolver>(resolver: &R, scope: FeedScope) -> Result<()> {
    if let Some(project) = scope.project() {
        resolver
            .project_name(project)
            .map_err(|e| scope_error(e, EntityKind::Project, project))?;
    }
    if let Some(user) = scope.user() {
        resolver
            .user_name(user)
            .map_err(|e| scope_error(e, EntityKind::User, user))?;
    }
    Ok(())
}

fn scope_error(err: FeedError, kind: EntityKind, id: i64) -> FeedError {
    match err {
        FeedError::NotFound { .. } => FeedError::ScopeNotFound { kind, id },
        other => other,
    }
}
