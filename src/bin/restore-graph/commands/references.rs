//! `restore-graph references` command
//!
//! Prints the package reference set persisted for a project, as the host
//! project system sees it.

use anyhow::{Context, Result};

use restore_graph::project::DependencySetService;

use crate::cli::ProjectArgs;
use crate::GlobalOptions;

pub async fn execute(args: ProjectArgs, opts: &GlobalOptions) -> Result<()> {
    let solution = opts.load_solution()?;
    let member = solution.project(&args.project)?;
    let file = member.references();
    let entries = file
        .entries()
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("failed to read {}", file.path().display()))?;

    if opts.shell.is_json() {
        return opts.shell.json(&entries);
    }

    for entry in &entries {
        let properties = entry
            .properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        if properties.is_empty() {
            opts.shell.print(&entry.name);
        } else {
            opts.shell.print(format!("{} ({})", entry.name, properties));
        }
    }
    Ok(())
}
