//! `restore-graph closure` command

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;

use restore_graph::resolver::{ExternalProjectReference, RestoreGraphClosure};
use restore_graph::util::{Name, NameSet};

use crate::cli::ClosureArgs;
use crate::GlobalOptions;

#[derive(Serialize)]
struct ClosureOutput<'a> {
    projects: Vec<&'a ExternalProjectReference>,
    unresolved: &'a NameSet,
}

pub async fn execute(args: ClosureArgs, opts: &GlobalOptions) -> Result<()> {
    let solution = opts.load_solution()?;
    let member = solution.project(&args.project)?;
    let closure = member
        .project()
        .project_reference_closure(solution.lookup(), &opts.token)
        .await?;

    if opts.shell.is_json() {
        return opts.shell.json(&ClosureOutput {
            projects: closure.restore_order(),
            unresolved: closure.unresolved(),
        });
    }

    if args.order {
        for reference in closure.restore_order() {
            opts.shell.print(display_name(reference));
        }
    } else if let Some(root) = closure.root() {
        let mut seen = HashSet::new();
        print_tree(opts, &closure, root, 0, &mut seen);
    }

    for name in closure.unresolved() {
        opts.shell.warn(format!("unresolved project reference `{}`", name));
    }
    Ok(())
}

fn print_tree<'a>(
    opts: &GlobalOptions,
    closure: &'a RestoreGraphClosure,
    reference: &'a ExternalProjectReference,
    depth: usize,
    seen: &mut HashSet<&'a Name>,
) {
    let is_duplicate = !seen.insert(reference.unique_name());

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };
    let dup_marker = if is_duplicate { " (*)" } else { "" };
    opts.shell.print(format!("{}{}{}", prefix, display_name(reference), dup_marker));

    // Don't recurse into duplicates; this also stops at cycles
    if is_duplicate {
        return;
    }

    for dep in closure.deps(reference.unique_name().as_str()) {
        print_tree(opts, closure, dep, depth + 1, seen);
    }
}

fn display_name(reference: &ExternalProjectReference) -> String {
    match reference.spec() {
        Some(spec) => format!("{} ({})", spec.name, reference.unique_name()),
        None => format!("{} (not nominated)", reference.unique_name()),
    }
}
