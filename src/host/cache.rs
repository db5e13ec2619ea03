//! Nomination cache.
//!
//! Holds the specifications the host has nominated, keyed by project unique
//! name. Project objects never copy a specification out of the cache; they
//! get a [`SpecFactory`] that reads the current entry on every call.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::core::{PackageSpec, ProjectNames};
use crate::project::SpecFactory;
use crate::resolver::{ProjectLookup, ResolvedProject};
use crate::util::name::eq_ignore_case;
use crate::util::Name;

#[derive(Debug, Clone)]
struct CacheEntry {
    names: ProjectNames,
    spec: Option<PackageSpec>,
}

/// Shared, thread-safe nomination cache.
#[derive(Debug, Clone, Default)]
pub struct SolutionCache {
    entries: Arc<RwLock<BTreeMap<Name, CacheEntry>>>,
}

impl SolutionCache {
    pub fn new() -> Self {
        SolutionCache::default()
    }

    /// Register a project, replacing any earlier entry with the same unique name.
    pub fn register(&self, names: ProjectNames, spec: Option<PackageSpec>) {
        let key = Name::new(names.unique_name.clone());
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, CacheEntry { names, spec });
    }

    /// Replace the nominated specification of a registered project.
    ///
    /// Returns false if the project is unknown.
    pub fn nominate(&self, unique_name: &str, spec: Option<PackageSpec>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(&Name::new(unique_name)) {
            Some(entry) => {
                entry.spec = spec;
                true
            }
            None => false,
        }
    }

    /// Current specification of a project.
    pub fn spec(&self, unique_name: &str) -> Option<PackageSpec> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&Name::new(unique_name)).and_then(|e| e.spec.clone())
    }

    /// A factory reading the project's specification from this cache.
    pub fn spec_factory(&self, unique_name: &str) -> SpecFactory {
        let cache = self.clone();
        let unique_name = unique_name.to_string();
        Arc::new(move || cache.spec(&unique_name))
    }

    /// Registered projects, sorted by unique name.
    pub fn projects(&self) -> Vec<ProjectNames> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut projects: Vec<_> = entries.values().map(|e| e.names.clone()).collect();
        projects.sort_by(|a, b| Name::new(a.unique_name.as_str()).cmp(&Name::new(b.unique_name.as_str())));
        projects
    }

    /// Whether a project with this unique name is registered.
    pub fn contains(&self, unique_name: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(&Name::new(unique_name))
    }

    /// Find a project by unique name, full path or display name, ignoring case.
    ///
    /// A display name shared by several projects matches none of them.
    pub fn find(&self, key: &str) -> Option<ProjectNames> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        find_entry(&entries, key).map(|e| e.names.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn find_entry<'a>(entries: &'a BTreeMap<Name, CacheEntry>, key: &str) -> Option<&'a CacheEntry> {
    if let Some(entry) = entries.get(&Name::new(key)) {
        return Some(entry);
    }
    if let Some(entry) = entries
        .values()
        .find(|e| eq_ignore_case(&e.names.full_path.to_string_lossy(), key))
    {
        return Some(entry);
    }

    let mut by_name = entries.values().filter(|e| eq_ignore_case(&e.names.name, key));
    let first = by_name.next()?;
    let others: Vec<&str> = by_name.map(|e| e.names.unique_name.as_str()).collect();
    if others.is_empty() {
        return Some(first);
    }
    tracing::warn!(
        "project name `{}` is ambiguous ({}, {}); use a unique name or path",
        key,
        first.names.unique_name,
        others.join(", ")
    );
    None
}

impl ProjectLookup for SolutionCache {
    fn resolve(&self, name: &str) -> Option<ResolvedProject> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        find_entry(&entries, name).map(|e| ResolvedProject {
            path: PathBuf::from(e.names.full_path()),
            spec: e.spec.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::project_spec;

    fn names(name: &str) -> ProjectNames {
        ProjectNames::new(name, format!("{}/{}.csproj", name, name), format!("/sln/{}/{}.csproj", name, name))
    }

    #[test]
    fn test_factory_reads_through() {
        let cache = SolutionCache::new();
        cache.register(names("App"), None);
        let factory = cache.spec_factory("app/APP.csproj");

        assert!(factory().is_none());
        assert!(cache.nominate("App/App.csproj", Some(project_spec("App", "/sln/App/App.csproj", &[]))));
        assert_eq!(factory().unwrap().name.as_str(), "App");

        cache.nominate("App/App.csproj", None);
        assert!(factory().is_none());
    }

    #[test]
    fn test_nominate_unknown_project() {
        let cache = SolutionCache::new();
        assert!(!cache.nominate("Nope", None));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lookup_by_name_unique_name_or_path() {
        let cache = SolutionCache::new();
        cache.register(names("Lib"), Some(project_spec("Lib", "/sln/Lib/Lib.csproj", &[])));

        for key in ["lib", "Lib/Lib.csproj", "/SLN/lib/lib.csproj"] {
            let resolved = cache.resolve(key).unwrap();
            assert_eq!(resolved.path, PathBuf::from("/sln/Lib/Lib.csproj"));
            assert!(resolved.spec.is_some());
        }
        assert!(cache.resolve("Other").is_none());
    }

    #[test]
    fn test_shared_display_name_is_ambiguous() {
        let cache = SolutionCache::new();
        cache.register(ProjectNames::new("Lib", "a/Lib.csproj", "/sln/a/Lib.csproj"), None);
        cache.register(ProjectNames::new("Lib", "b/Lib.csproj", "/sln/b/Lib.csproj"), None);

        for _ in 0..8 {
            assert!(cache.resolve("Lib").is_none());
            assert!(cache.find("lib").is_none());
        }
        assert_eq!(cache.resolve("a/Lib.csproj").unwrap().path, PathBuf::from("/sln/a/Lib.csproj"));
        assert_eq!(cache.resolve("/sln/b/Lib.csproj").unwrap().path, PathBuf::from("/sln/b/Lib.csproj"));
    }

    #[test]
    fn test_unique_name_wins_over_display_name() {
        let cache = SolutionCache::new();
        cache.register(ProjectNames::new("Other", "Lib", "/sln/Other.csproj"), None);
        cache.register(ProjectNames::new("Lib", "src/Lib.csproj", "/sln/src/Lib.csproj"), None);

        assert_eq!(cache.find("lib").unwrap().name, "Other");
        assert!(cache.contains("LIB"));
        assert!(!cache.contains("Other"));
    }

    #[test]
    fn test_projects_sorted() {
        let cache = SolutionCache::new();
        cache.register(names("b"), None);
        cache.register(names("A"), None);

        let projects: Vec<_> = cache.projects().into_iter().map(|p| p.name).collect();
        assert_eq!(projects, vec!["A", "b"]);
        assert!(cache.find("B").is_some());
    }
}
