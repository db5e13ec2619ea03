//! Project reference closure builder.
//!
//! Starting from a root project, repeatedly resolves referenced project names
//! through a [`ProjectLookup`] until no new projects appear. Each project is
//! expanded at most once, so reference cycles terminate. Names the lookup does
//! not know are dropped and recorded, never failing the walk.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::graph::NodeIndex;
use tokio_util::sync::CancellationToken;

use crate::core::PackageSpec;
use crate::resolver::graph::{ExternalProjectReference, RestoreGraphClosure};
use crate::util::cancel::{self, Cancelled};
use crate::util::Name;

/// A project found by name.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    /// Full path of the project file
    pub path: PathBuf,

    /// Its current specification, if nominated
    pub spec: Option<PackageSpec>,
}

impl ResolvedProject {
    pub fn new(path: impl Into<PathBuf>, spec: Option<PackageSpec>) -> Self {
        ResolvedProject {
            path: path.into(),
            spec,
        }
    }
}

/// Read-only view over every project the host knows about.
///
/// Must not change for the duration of one closure computation.
pub trait ProjectLookup: Send + Sync {
    /// Resolve a project reference name, or `None` if unknown.
    fn resolve(&self, name: &str) -> Option<ResolvedProject>;
}

impl<F> ProjectLookup for F
where
    F: Fn(&str) -> Option<ResolvedProject> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Option<ResolvedProject> {
        self(name)
    }
}

/// Builds a [`RestoreGraphClosure`].
pub struct ClosureBuilder<'a> {
    lookup: &'a dyn ProjectLookup,
    warn_unresolved: bool,
}

impl<'a> ClosureBuilder<'a> {
    pub fn new(lookup: &'a dyn ProjectLookup) -> Self {
        ClosureBuilder {
            lookup,
            warn_unresolved: true,
        }
    }

    /// Log dropped references at `warn` instead of `debug`.
    pub fn warn_unresolved(mut self, warn: bool) -> Self {
        self.warn_unresolved = warn;
        self
    }

    /// Compute the closure of the project at `root_path`.
    ///
    /// An absent root specification yields an empty closure.
    pub fn build(
        &self,
        root_path: &Path,
        root_spec: Option<&PackageSpec>,
        token: &CancellationToken,
    ) -> Result<RestoreGraphClosure, Cancelled> {
        let mut closure = RestoreGraphClosure::new();

        let Some(root_spec) = root_spec else {
            tracing::debug!("no specification for {}, closure is empty", root_path.display());
            return Ok(closure);
        };

        cancel::check(token)?;

        let root = closure.add_reference(ExternalProjectReference::for_project(
            root_path,
            Some(root_spec.clone()),
        ));

        let mut queue: VecDeque<(NodeIndex, Name)> = VecDeque::new();
        enqueue_references(&closure, root, &mut queue);

        // Resolution result per reference name, so each name is looked up once.
        let mut resolved: HashMap<Name, Option<NodeIndex>> = HashMap::new();

        while let Some((from, name)) = queue.pop_front() {
            cancel::check(token)?;

            let target = match resolved.get(&name) {
                Some(&target) => target,
                None => {
                    let target = self.expand(&mut closure, &name, &mut queue);
                    resolved.insert(name, target);
                    target
                }
            };

            if let Some(to) = target {
                closure.add_edge(from, to);
            }
        }

        tracing::debug!(
            "closure of {} has {} project(s), {} unresolved",
            root_path.display(),
            closure.len(),
            closure.unresolved().len()
        );

        Ok(closure)
    }

    /// Resolve `name` and add its project, queueing its references if it is new.
    fn expand(
        &self,
        closure: &mut RestoreGraphClosure,
        name: &Name,
        queue: &mut VecDeque<(NodeIndex, Name)>,
    ) -> Option<NodeIndex> {
        let Some(project) = self.lookup.resolve(name) else {
            if self.warn_unresolved {
                tracing::warn!("project reference `{}` could not be resolved, skipping", name);
            } else {
                tracing::debug!("project reference `{}` could not be resolved, skipping", name);
            }
            closure.mark_unresolved(name.clone());
            return None;
        };

        let path_str = project.path.to_string_lossy();
        if let Some(existing) = closure.node_index(&path_str) {
            return Some(existing);
        }

        tracing::debug!("resolved `{}` to {}", name, project.path.display());
        let node = closure.add_reference(ExternalProjectReference::for_project(
            &project.path,
            project.spec,
        ));
        enqueue_references(closure, node, queue);
        Some(node)
    }
}

fn enqueue_references(
    closure: &RestoreGraphClosure,
    node: NodeIndex,
    queue: &mut VecDeque<(NodeIndex, Name)>,
) {
    let references = closure.reference(node).project_references().clone();
    queue.extend(references.into_iter().map(|name| (node, name)));
}
