//! `restore-graph plan` command

use anyhow::Result;

use restore_graph::ops::{self, FingerprintStore};
use restore_graph::util::Status;

use crate::cli::PlanArgs;
use crate::GlobalOptions;

pub async fn execute(args: PlanArgs, opts: &GlobalOptions) -> Result<()> {
    let solution = opts.load_solution()?;
    let store_path = FingerprintStore::path_for(solution.root());
    let mut store = FingerprintStore::load(&store_path)?;

    opts.shell.status(Status::Resolving, format!("closure of {}", args.project));
    let plan = ops::plan(&solution, &args.project, &store, &opts.token).await?;

    if opts.shell.is_json() {
        opts.shell.json(&plan)?;
    } else {
        for project in &plan.projects {
            let status = if project.decision.required {
                Status::Restore
            } else {
                Status::Skipped
            };
            let changed = match project.decision.prior_matches {
                Some(true) => ", unchanged since last plan",
                Some(false) => ", changed since last plan",
                None => "",
            };
            opts.shell.status(
                status,
                format!("{} ({}{})", project.name, project.decision.reason, changed),
            );
        }
        for cycle in &plan.cycles {
            let members: Vec<_> = cycle.iter().map(|n| n.as_str()).collect();
            opts.shell.warn(format!("reference cycle: {}", members.join(" -> ")));
        }
        for name in &plan.unresolved {
            opts.shell.warn(format!("unresolved project reference `{}`", name));
        }
        opts.shell.note(format!(
            "{} of {} projects need a restore",
            plan.restore_count(),
            plan.projects.len()
        ));
    }

    if args.record {
        for (unique_name, fingerprint) in plan.fingerprints() {
            store.insert(unique_name, fingerprint.clone());
        }
        store.save(&store_path)?;
        tracing::debug!("recorded fingerprints to {}", store_path.display());
    }
    Ok(())
}
