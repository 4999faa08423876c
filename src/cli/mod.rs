pub mod commands;
pub mod context;
pub mod logging;
pub mod output;

use clap::{Args, Parser, Subcommand};

/// Reconstruct what happened in a project, or what a user did, from task change logs.
#[derive(Parser, Debug)]
#[command(name = "taskfeed", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to an alternative .taskfeed directory
    #[arg(long, global = true, env = "TASKFEED_DIR")]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize taskfeed in the current directory
    Init,

    /// Show the activity feed, most recent first
    Feed {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look for change-log records the feed cannot describe faithfully
    ///
    /// With --project, records on tasks that belong to no known project are
    /// scanned too and reported as dangling task references.
    Check {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

/// Feed scope. Give both to see one user's activity within one project.
#[derive(Args, Debug)]
#[group(required = true, multiple = true)]
pub struct ScopeArgs {
    /// Project id
    #[arg(long)]
    pub project: Option<i64>,

    /// User id (the person who acted)
    #[arg(long)]
    pub user: Option<i64>,
}
