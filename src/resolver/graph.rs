//! RestoreGraphClosure - the project reference graph reachable from a root.
//!
//! Nodes are unique by project path (compared ignoring case). Edges record
//! which resolved project each reference name led to, so the closure can be
//! ordered for restore and checked for cycles.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::core::PackageSpec;
use crate::resolver::references::project_references;
use crate::util::{Name, NameSet};

/// One project in a reference closure.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalProjectReference {
    /// Unique name: the project's path
    unique_name: Name,

    /// Specification, when the project has been nominated
    #[serde(skip)]
    spec: Option<PackageSpec>,

    /// Path of the project file
    msbuild_project_path: Option<PathBuf>,

    /// Names of the projects this one references
    project_references: NameSet,
}

impl ExternalProjectReference {
    pub fn new(
        unique_name: impl Into<Name>,
        spec: Option<PackageSpec>,
        msbuild_project_path: Option<PathBuf>,
        project_references: NameSet,
    ) -> Self {
        ExternalProjectReference {
            unique_name: unique_name.into(),
            spec,
            msbuild_project_path,
            project_references,
        }
    }

    /// Build the reference for a project at `path`, taking its reference list from `spec`.
    pub fn for_project(path: &Path, spec: Option<PackageSpec>) -> Self {
        let references = project_references(spec.as_ref());
        ExternalProjectReference::new(
            path.to_string_lossy().into_owned(),
            spec,
            Some(path.to_path_buf()),
            references,
        )
    }

    pub fn unique_name(&self) -> &Name {
        &self.unique_name
    }

    pub fn spec(&self) -> Option<&PackageSpec> {
        self.spec.as_ref()
    }

    pub fn msbuild_project_path(&self) -> Option<&Path> {
        self.msbuild_project_path.as_deref()
    }

    pub fn project_references(&self) -> &NameSet {
        &self.project_references
    }
}

impl PartialEq for ExternalProjectReference {
    fn eq(&self, other: &Self) -> bool {
        self.unique_name == other.unique_name
    }
}

impl Eq for ExternalProjectReference {}

impl Hash for ExternalProjectReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unique_name.hash(state);
    }
}

/// The transitive, de-duplicated set of projects reachable from a root.
#[derive(Debug, Clone, Default)]
pub struct RestoreGraphClosure {
    /// Reference graph; an edge `a -> b` means `a` references `b`
    graph: DiGraph<ExternalProjectReference, ()>,

    /// Map from unique name to node index
    name_to_node: HashMap<Name, NodeIndex>,

    /// First node added
    root: Option<NodeIndex>,

    /// Reference names the lookup could not resolve
    unresolved: NameSet,
}

impl RestoreGraphClosure {
    pub fn new() -> Self {
        RestoreGraphClosure::default()
    }

    /// Add a project. An existing node with the same unique name wins.
    pub fn add_reference(&mut self, reference: ExternalProjectReference) -> NodeIndex {
        if let Some(&node) = self.name_to_node.get(reference.unique_name()) {
            return node;
        }

        let name = reference.unique_name().clone();
        let node = self.graph.add_node(reference);
        self.name_to_node.insert(name, node);
        self.root.get_or_insert(node);
        node
    }

    /// Record that `from` references `to`.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.contains_edge(from, to) {
            self.graph.add_edge(from, to, ());
        }
    }

    pub(crate) fn mark_unresolved(&mut self, name: Name) {
        self.unresolved.insert(name);
    }

    pub(crate) fn reference(&self, node: NodeIndex) -> &ExternalProjectReference {
        &self.graph[node]
    }

    pub fn node_index(&self, unique_name: &str) -> Option<NodeIndex> {
        self.name_to_node.get(&Name::new(unique_name)).copied()
    }

    /// Get a project by unique name (its path).
    pub fn get(&self, unique_name: &str) -> Option<&ExternalProjectReference> {
        self.node_index(unique_name).map(|node| &self.graph[node])
    }

    pub fn contains(&self, unique_name: &str) -> bool {
        self.node_index(unique_name).is_some()
    }

    pub fn root(&self) -> Option<&ExternalProjectReference> {
        self.root.map(|node| &self.graph[node])
    }

    /// Iterate over all projects in the closure.
    pub fn references(&self) -> impl Iterator<Item = &ExternalProjectReference> {
        self.graph.node_weights()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Names dropped because the lookup did not know them.
    pub fn unresolved(&self) -> &NameSet {
        &self.unresolved
    }

    /// Resolved projects directly referenced by a project.
    pub fn deps(&self, unique_name: &str) -> Vec<&ExternalProjectReference> {
        match self.node_index(unique_name) {
            Some(node) => self.graph.neighbors(node).map(|n| &self.graph[n]).collect(),
            None => Vec::new(),
        }
    }

    /// Projects ordered so that referenced projects come before the projects
    /// referencing them. Members of a cycle are adjacent, in no particular order.
    pub fn restore_order(&self) -> Vec<&ExternalProjectReference> {
        // Tarjan yields components in reverse topological order.
        tarjan_scc(&self.graph)
            .into_iter()
            .flatten()
            .map(|node| &self.graph[node])
            .collect()
    }

    /// Reference cycles, each as the unique names of its members.
    pub fn cycles(&self) -> Vec<Vec<Name>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<Name> = scc
                    .into_iter()
                    .map(|node| self.graph[node].unique_name().clone())
                    .collect();
                names.sort();
                names
            })
            .collect()
    }

    /// Consume the closure, returning its projects.
    pub fn into_references(self) -> Vec<ExternalProjectReference> {
        let (nodes, _) = self.graph.into_nodes_edges();
        nodes.into_iter().map(|node| node.weight).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(path: &str, refs: &[&str]) -> ExternalProjectReference {
        ExternalProjectReference::new(
            path,
            None,
            Some(PathBuf::from(path)),
            refs.iter().copied().collect(),
        )
    }

    #[test]
    fn test_nodes_unique_by_path_ignoring_case() {
        let mut closure = RestoreGraphClosure::new();
        let a = closure.add_reference(reference("/src/A.csproj", &[]));
        let again = closure.add_reference(reference("/SRC/a.csproj", &["B"]));

        assert_eq!(a, again);
        assert_eq!(closure.len(), 1);
        assert!(closure.contains("/src/a.CSPROJ"));
        assert!(closure.get("/src/A.csproj").unwrap().project_references().is_empty());
    }

    #[test]
    fn test_restore_order_puts_dependencies_first() {
        let mut closure = RestoreGraphClosure::new();
        let a = closure.add_reference(reference("/a", &["b"]));
        let b = closure.add_reference(reference("/b", &["c"]));
        let c = closure.add_reference(reference("/c", &[]));
        closure.add_edge(a, b);
        closure.add_edge(b, c);

        let order: Vec<_> = closure
            .restore_order()
            .iter()
            .map(|r| r.unique_name().to_string())
            .collect();
        assert_eq!(order, vec!["/c", "/b", "/a"]);
        assert!(closure.cycles().is_empty());
        assert_eq!(closure.root().unwrap().unique_name().as_str(), "/a");
    }

    #[test]
    fn test_cycles_are_reported() {
        let mut closure = RestoreGraphClosure::new();
        let p = closure.add_reference(reference("/p", &["q"]));
        let q = closure.add_reference(reference("/q", &["p"]));
        let s = closure.add_reference(reference("/s", &["s"]));
        closure.add_edge(p, q);
        closure.add_edge(q, p);
        closure.add_edge(s, s);

        let cycles = closure.cycles();
        assert_eq!(cycles.len(), 2);
        assert!(cycles.contains(&vec![Name::new("/p"), Name::new("/q")]));
        assert!(cycles.contains(&vec![Name::new("/s")]));
    }

    #[test]
    fn test_deps_and_into_references() {
        let mut closure = RestoreGraphClosure::new();
        let a = closure.add_reference(reference("/a", &["b"]));
        let b = closure.add_reference(reference("/b", &[]));
        closure.add_edge(a, b);
        closure.add_edge(a, b);

        assert_eq!(closure.deps("/a").len(), 1);
        assert!(closure.deps("/missing").is_empty());
        assert_eq!(closure.into_references().len(), 2);
    }
}
