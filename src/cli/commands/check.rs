use crate::cli::commands::workspace;
use crate::cli::output;
use crate::core::errors::{FeedError, Result};
use crate::core::models::scope::FeedScope;
use crate::core::services::integrity_service::IntegrityService;

/// Execute the `taskfeed check` command.
///
/// Scans the scope's change log for ambiguous records and dangling
/// references. Issues are reported, not treated as failures.
pub fn execute(project: Option<i64>, user: Option<i64>) -> Result<()> {
    let scope = FeedScope::from_filters(project, user).ok_or_else(|| FeedError::InvalidConfig {
        detail: "check needs --project, --user, or both".into(),
    })?;

    let ws = workspace::open()?;
    let service = IntegrityService {
        store: ws.change_log,
        resolver: ws.directory,
    };

    let report = workspace::block_on(service.check(scope))??;

    output::header(&format!("🔍 taskfeed check: {scope}"));

    if report.is_ok() {
        output::success(&format!(
            "{} records scanned, no issues",
            report.records_scanned
        ));
        return Ok(());
    }

    output::warning(&format!("Issues found ({}):", report.issues.len()));
    for issue in &report.issues {
        output::bullet(&issue.to_string());
    }
    println!();
    output::success(&format!("{} records scanned", report.records_scanned));
    output::hint("Records listed here are left out of feeds or described partially.");

    Ok(())
}
