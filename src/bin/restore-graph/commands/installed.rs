//! `restore-graph installed` command

use anyhow::Result;

use crate::cli::ProjectArgs;
use crate::GlobalOptions;

pub async fn execute(args: ProjectArgs, opts: &GlobalOptions) -> Result<()> {
    let solution = opts.load_solution()?;
    let member = solution.project(&args.project)?;
    let installed = member.project().installed_packages(&opts.token).await?;

    if opts.shell.is_json() {
        return opts.shell.json(&installed);
    }

    if installed.is_empty() {
        opts.shell.note(format!("{} has no installed packages", member.names()));
        return Ok(());
    }
    for reference in &installed {
        opts.shell.print(reference);
    }
    Ok(())
}
