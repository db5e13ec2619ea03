//! `restore-graph uninstall` command

use anyhow::Result;

use restore_graph::ops;
use restore_graph::project::UninstallOutcome;
use restore_graph::util::Status;

use crate::cli::UninstallArgs;
use crate::GlobalOptions;

pub async fn execute(args: UninstallArgs, opts: &GlobalOptions) -> Result<()> {
    let solution = opts.load_solution()?;
    let outcome = ops::uninstall(&solution, &args.project, &args.id, &opts.token).await?;

    match outcome {
        UninstallOutcome::Removed => {
            opts.shell.status(Status::Removed, format!("{} from {}", args.id, args.project))
        }
        UninstallOutcome::NotInstalled => opts.shell.status(
            Status::Skipped,
            format!("{} (not installed in {})", args.id, args.project),
        ),
    }
    Ok(())
}
