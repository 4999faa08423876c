mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    cli::context::init(args.config.as_deref());
    cli::logging::init(args.verbose, args.quiet);

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(),
        Commands::Feed { scope, json } => {
            cli::commands::feed::execute(scope.project, scope.user, *json)
        }
        Commands::Check { scope } => cli::commands::check::execute(scope.project, scope.user),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
