use crate::cli::commands::workspace;
use crate::cli::output;
use crate::core::errors::{FeedError, Result};
use crate::core::models::activity_entry::Feed;
use crate::core::models::scope::FeedScope;
use crate::core::services::activity_generator::ActivityGenerator;

/// Execute the `taskfeed feed` command.
///
/// Builds the feed for a project, a user, or a user within a project and
/// prints it most recent first.
pub fn execute(project: Option<i64>, user: Option<i64>, json: bool) -> Result<()> {
    let scope = FeedScope::from_filters(project, user).ok_or_else(|| FeedError::InvalidConfig {
        detail: "feed needs --project, --user, or both".into(),
    })?;

    let ws = workspace::open()?;
    let generator = ActivityGenerator {
        store: ws.change_log,
        resolver: ws.directory,
    };

    let feed = workspace::block_on(async {
        match scope {
            FeedScope::User(u) => generator.generate_for_user(u).await,
            FeedScope::Project(p) => generator.generate_for_project(p).await,
            FeedScope::UserInProject(p, u) => generator.generate_for_user_in_project(p, u).await,
        }
    })??;

    if json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &feed.entries)
            .map_err(std::io::Error::from)?;
        println!();
        return Ok(());
    }

    print_feed(scope, &feed);
    Ok(())
}

fn print_feed(scope: FeedScope, feed: &Feed) {
    if feed.is_empty() {
        output::header(&format!("taskfeed feed: {scope}"));
        output::warning("No activity found");
    } else {
        output::header(&format!(
            "taskfeed feed: {scope} ({} entries)",
            feed.entries.len()
        ));
        println!();
        for entry in &feed.entries {
            output::activity_row(entry.time, entry.project_id, entry.task_id, &entry.activity);
        }
    }

    if !feed.skipped.is_empty() {
        println!();
        output::warning(&format!(
            "{} record(s) could not be described and were left out:",
            feed.skipped.len()
        ));
        for skipped in &feed.skipped {
            output::bullet(&format!(
                "{} on task {}: {}",
                skipped.kind, skipped.task_id, skipped.reason
            ));
        }
        output::hint(&format!("Run 'taskfeed check {}' for details.", scope_flags(scope)));
    }
}

/// The command-line flags that select `scope`.
fn scope_flags(scope: FeedScope) -> String {
    match scope {
        FeedScope::User(u) => format!("--user {u}"),
        FeedScope::Project(p) => format!("--project {p}"),
        FeedScope::UserInProject(p, u) => format!("--project {p} --user {u}"),
    }
}
