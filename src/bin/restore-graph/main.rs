//! restore-graph CLI - plays the host for a solution described by Restore.toml

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use restore_graph::ops::Solution;
use restore_graph::project::ProjectError;
use restore_graph::util::diagnostic::{self, Diagnostic};
use restore_graph::util::shell::ColorChoice;
use restore_graph::util::{GlobalContext, Shell};

/// A token cancelled when the user interrupts the process.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupted, cancelling");
            child.cancel();
        }
    });
    token
}

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
    pub solution: Option<PathBuf>,
    pub verbose: bool,
    pub token: CancellationToken,
}

impl GlobalOptions {
    /// Locate and load the solution the command works against.
    pub fn load_solution(&self) -> Result<Solution> {
        let mut ctx = GlobalContext::new()?;
        ctx.set_verbose(self.verbose);

        let path = ctx.solution_path(self.solution.as_deref())?;
        let config = ctx.load_config(&path);
        Solution::load(&path, &config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let diag = match e.chain().find_map(|cause| cause.downcast_ref::<ProjectError>()) {
                Some(err) if e.chain().count() == 1 => err.to_diagnostic(),
                Some(err) => match err.suggestion() {
                    Some(help) => Diagnostic::from_error(&e).with_suggestion(help),
                    None => Diagnostic::from_error(&e),
                },
                None => Diagnostic::from_error(&e),
            };
            diagnostic::emit(&diag, color);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("restore_graph=debug")
    } else if cli.quiet {
        EnvFilter::new("restore_graph=error")
    } else {
        EnvFilter::new("restore_graph=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json = match &cli.command {
        Commands::Installed(args) | Commands::References(args) => args.json,
        Commands::Closure(args) => args.json,
        Commands::Plan(args) => args.json,
        _ => false,
    };
    let opts = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.color, json),
        solution: cli.solution,
        verbose: cli.verbose,
        token: cancel_on_ctrl_c(),
    };

    // Execute command
    match cli.command {
        Commands::Installed(args) => commands::installed::execute(args, &opts).await,
        Commands::Closure(args) => commands::closure::execute(args, &opts).await,
        Commands::Plan(args) => commands::plan::execute(args, &opts).await,
        Commands::Install(args) => commands::install::execute(args, &opts).await,
        Commands::Uninstall(args) => commands::uninstall::execute(args, &opts).await,
        Commands::References(args) => commands::references::execute(args, &opts).await,
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
