//! Test utilities and mocks for restore-graph unit tests.
//!
//! This module provides in-memory implementations of the host services a
//! project talks to, so project and mutation logic can be tested without
//! touching the filesystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use restore_graph::test_support::{InMemoryDependencySet, StaticMetadataReader};
//!
//! let set = Arc::new(InMemoryDependencySet::new());
//! let coordinator = MutationCoordinator::new(set.clone(), Arc::new(StaticMetadataReader::new(true)));
//! // Install through the coordinator, then inspect set.snapshot()...
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use semver::Version;

// Re-export fixtures for convenience
pub use fixtures::*;

use crate::core::version::display_version;
use crate::core::{PackageIdentity, PackageSpec};
use crate::project::mutation::VERSION_PROPERTY;
use crate::project::{
    DependencyEntry, DependencySetService, HostError, PackageMetadata, PackageMetadataReader, ReadSeek,
    ScriptExecutor,
};
use crate::resolver::{ProjectLookup, ResolvedProject};
use crate::util::name::eq_ignore_case;

/// In-memory package reference set.
#[derive(Debug, Default)]
pub struct InMemoryDependencySet {
    entries: Mutex<Vec<DependencyEntry>>,
}

impl InMemoryDependencySet {
    pub fn new() -> Self {
        InMemoryDependencySet::default()
    }

    /// Copy of the current entries.
    pub fn snapshot(&self) -> Vec<DependencyEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DependencySetService for InMemoryDependencySet {
    async fn add(&self, name: &str, version: &Version) -> Result<bool, HostError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| eq_ignore_case(&e.name, name)) {
            return Ok(false);
        }
        entries.push(DependencyEntry::new(name).with_property(VERSION_PROPERTY, display_version(version).to_string()));
        Ok(true)
    }

    async fn set_property(&self, name: &str, key: &str, value: &str) -> Result<(), HostError> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| eq_ignore_case(&e.name, name))
            .ok_or_else(|| format!("no entry `{}`", name))?;
        entry.properties.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, HostError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !eq_ignore_case(&e.name, name));
        Ok(entries.len() != before)
    }

    async fn entries(&self) -> Result<Vec<DependencyEntry>, HostError> {
        Ok(self.snapshot())
    }
}

/// A reference set whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDependencySet;

#[async_trait]
impl DependencySetService for FailingDependencySet {
    async fn add(&self, _name: &str, _version: &Version) -> Result<bool, HostError> {
        Err("project system unavailable".into())
    }

    async fn set_property(&self, _name: &str, _key: &str, _value: &str) -> Result<(), HostError> {
        Err("project system unavailable".into())
    }

    async fn remove(&self, _name: &str) -> Result<bool, HostError> {
        Err("project system unavailable".into())
    }

    async fn entries(&self) -> Result<Vec<DependencyEntry>, HostError> {
        Err("project system unavailable".into())
    }
}

/// Metadata reader answering the same metadata for every package.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataReader {
    metadata: PackageMetadata,
}

impl StaticMetadataReader {
    pub fn new(development_dependency: bool) -> Self {
        StaticMetadataReader {
            metadata: PackageMetadata {
                development_dependency,
                tool_items: Vec::new(),
            },
        }
    }

    pub fn with_metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl PackageMetadataReader for StaticMetadataReader {
    fn read_stream(&self, _content: &mut dyn ReadSeek) -> Result<PackageMetadata, HostError> {
        Ok(self.metadata.clone())
    }

    fn read_folder(&self, _path: &Path) -> Result<PackageMetadata, HostError> {
        Ok(self.metadata.clone())
    }
}

/// Script executor recording the scripts it was asked to run.
#[derive(Debug, Default)]
pub struct RecordingScriptExecutor {
    calls: Mutex<Vec<String>>,
}

impl RecordingScriptExecutor {
    pub fn new() -> Self {
        RecordingScriptExecutor::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptExecutor for RecordingScriptExecutor {
    async fn execute(
        &self,
        _identity: &PackageIdentity,
        _install_path: &Path,
        script: &str,
    ) -> Result<bool, HostError> {
        self.calls.lock().unwrap().push(script.to_string());
        Ok(true)
    }
}

/// Fixed project lookup keyed by reference name.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    projects: Vec<(String, PathBuf, Option<PackageSpec>)>,
}

impl StaticLookup {
    pub fn new() -> Self {
        StaticLookup::default()
    }

    pub fn with(mut self, name: &str, path: impl Into<PathBuf>, spec: PackageSpec) -> Self {
        self.projects.push((name.to_string(), path.into(), Some(spec)));
        self
    }

    pub fn with_unnominated(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.projects.push((name.to_string(), path.into(), None));
        self
    }

    /// Specification registered under `name`.
    pub fn spec(&self, name: &str) -> Option<PackageSpec> {
        self.resolve(name).and_then(|p| p.spec)
    }
}

impl ProjectLookup for StaticLookup {
    fn resolve(&self, name: &str) -> Option<ResolvedProject> {
        self.projects
            .iter()
            .find(|(n, _, _)| eq_ignore_case(n, name))
            .map(|(_, path, spec)| ResolvedProject::new(path.clone(), spec.clone()))
    }
}

