//! `restore-graph install` command

use anyhow::Result;

use restore_graph::ops::{self, InstallOptions};
use restore_graph::project::InstallOutcome;
use restore_graph::util::Status;

use crate::cli::InstallArgs;
use crate::GlobalOptions;

pub async fn execute(args: InstallArgs, opts: &GlobalOptions) -> Result<()> {
    let solution = opts.load_solution()?;
    let install_opts = InstallOptions {
        project: args.project,
        id: args.id,
        version: args.version,
        source: args.package,
    };

    let outcome = ops::install(&solution, &install_opts, &opts.token).await?;

    let status = match outcome {
        InstallOutcome::Added => Status::Added,
        InstallOutcome::Updated => Status::Updated,
    };
    opts.shell.status(
        status,
        format!("{} v{} in {}", install_opts.id, install_opts.version, install_opts.project),
    );
    Ok(())
}
