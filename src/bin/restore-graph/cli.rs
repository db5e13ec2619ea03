//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use restore_graph::ops::PackageSource;
use restore_graph::util::shell::ColorChoice;

/// restore-graph - project reference closures and restore decisions
#[derive(Parser)]
#[command(name = "restore-graph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Path to Restore.toml (defaults to searching upward from cwd)
    #[arg(long, global = true, env = "RESTORE_GRAPH_SOLUTION")]
    pub solution: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the packages a project has installed
    Installed(ProjectArgs),

    /// Show the project reference closure of a project
    Closure(ClosureArgs),

    /// Decide which projects of a closure need a restore
    Plan(PlanArgs),

    /// Install a package into a project
    Install(InstallArgs),

    /// Uninstall a package from a project
    Uninstall(UninstallArgs),

    /// Show a project's persisted package references
    References(ProjectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Project name, unique name or path
    pub project: String,

    /// Emit JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ClosureArgs {
    /// Project name, unique name or path
    pub project: String,

    /// Emit JSON output
    #[arg(long)]
    pub json: bool,

    /// Print projects in restore order instead of as a tree
    #[arg(long)]
    pub order: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Project name, unique name or path
    pub project: String,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Record the plan's fingerprints for the next run
    #[arg(long)]
    pub record: bool,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Project name, unique name or path
    pub project: String,

    /// Package id
    pub id: String,

    /// Exact package version
    pub version: String,

    /// Package manifest to read metadata from (`-` for stdin)
    #[arg(long, value_name = "FILE")]
    pub package: Option<PackageSource>,
}

#[derive(Args)]
pub struct UninstallArgs {
    /// Project name, unique name or path
    pub project: String,

    /// Package id
    pub id: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
