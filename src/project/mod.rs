//! Project variants and the host services they consume.
//!
//! A [`DependencyGraphProject`] is what the orchestrator talks to. Each variant
//! reads its specification through a host-supplied factory and routes
//! mutations through a [`MutationCoordinator`]; neither caches anything.

pub mod errors;
pub mod legacy;
pub mod mutation;
pub mod nominated;

pub use errors::{HostError, ProjectError};
pub use legacy::LegacyProject;
pub use mutation::{InstallOutcome, MutationCoordinator, UninstallOutcome};
pub use nominated::NominatedProject;

use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use semver::Version;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::core::{PackageIdentity, PackageReference, PackageSpec, ProjectDescriptor, ProjectKind, ProjectNames, TargetFramework};
use crate::resolver::{ProjectLookup, RestoreGraphClosure};
use crate::restore::{self, RestoreFingerprint};

/// Returns the host's current specification for a project, if nominated.
///
/// Successive calls may return different results.
pub type SpecFactory = Arc<dyn Fn() -> Option<PackageSpec> + Send + Sync>;

/// Package content that supports random access.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Package content handed to an install.
pub enum PackageContent {
    Seekable(Box<dyn ReadSeek>),
    Streaming(Box<dyn Read + Send>),
}

impl PackageContent {
    pub fn is_seekable(&self) -> bool {
        matches!(self, PackageContent::Seekable(_))
    }
}

/// One entry of a project's persisted package reference set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyEntry {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl DependencyEntry {
    pub fn new(name: impl Into<String>) -> Self {
        DependencyEntry {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Host service owning a project's persisted package reference set.
#[async_trait]
pub trait DependencySetService: Send + Sync {
    /// Add a reference. Returns false, leaving the entry untouched, if one
    /// with this name already exists.
    async fn add(&self, name: &str, version: &Version) -> Result<bool, HostError>;

    /// Set a property on an existing reference.
    async fn set_property(&self, name: &str, key: &str, value: &str) -> Result<(), HostError>;

    /// Remove a reference. Returns false if there was none.
    async fn remove(&self, name: &str) -> Result<bool, HostError>;

    /// All references, in stored order.
    async fn entries(&self) -> Result<Vec<DependencyEntry>, HostError>;
}

/// Items of one framework-specific group inside a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkItems {
    pub framework: TargetFramework,
    pub items: Vec<String>,
}

/// What the metadata reader knows about a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub development_dependency: bool,
    pub tool_items: Vec<FrameworkItems>,
}

/// Host service reading package metadata.
pub trait PackageMetadataReader: Send + Sync {
    /// Read from package content. The stream position is left unspecified.
    fn read_stream(&self, content: &mut dyn ReadSeek) -> Result<PackageMetadata, HostError>;

    /// Read from an installed package folder.
    fn read_folder(&self, path: &Path) -> Result<PackageMetadata, HostError>;
}

/// Host service running a package's init script.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Run `script` (relative to `install_path`). Returns whether it ran.
    async fn execute(
        &self,
        identity: &PackageIdentity,
        install_path: &Path,
        script: &str,
    ) -> Result<bool, HostError>;
}

/// A project the restore engine can query and mutate.
#[async_trait]
pub trait DependencyGraphProject: Send + Sync {
    fn kind(&self) -> ProjectKind;

    fn names(&self) -> &ProjectNames;

    /// Always the current time, so no caller can rely on it to skip work.
    fn last_modified(&self) -> SystemTime {
        SystemTime::now()
    }

    /// The current specification, fetched fresh.
    fn package_spec(&self) -> Option<PackageSpec>;

    fn descriptor(&self) -> ProjectDescriptor {
        ProjectDescriptor {
            names: self.names().clone(),
            last_modified: self.last_modified(),
            spec: self.package_spec(),
        }
    }

    /// Specifications to hand to a restore.
    fn package_specs_for_restore(&self) -> Vec<PackageSpec> {
        self.package_spec().into_iter().collect()
    }

    /// One reference per installed package.
    async fn installed_packages(&self, token: &CancellationToken) -> Result<Vec<PackageReference>, ProjectError>;

    /// Projects reachable from this one through project references.
    async fn project_reference_closure(
        &self,
        lookup: &dyn ProjectLookup,
        token: &CancellationToken,
    ) -> Result<RestoreGraphClosure, ProjectError>;

    fn is_restore_required(&self, prior: Option<&RestoreFingerprint>) -> bool {
        !restore::should_skip_restore(&self.descriptor(), prior)
    }

    async fn install_package(
        &self,
        identity: &PackageIdentity,
        content: PackageContent,
        token: &CancellationToken,
    ) -> Result<InstallOutcome, ProjectError>;

    async fn uninstall_package(
        &self,
        identity: &PackageIdentity,
        token: &CancellationToken,
    ) -> Result<UninstallOutcome, ProjectError>;

    /// Run the package's init script, if it has one. Returns whether one ran.
    async fn execute_init_script(
        &self,
        identity: &PackageIdentity,
        package_install_path: &Path,
        token: &CancellationToken,
    ) -> Result<bool, ProjectError>;

    /// Path of the restore assets file, if known.
    fn assets_file(&self) -> Option<PathBuf>;

    fn json_config_path(&self) -> Result<PathBuf, ProjectError> {
        Err(ProjectError::unsupported("json_config_path", self.kind()))
    }
}

pub(crate) fn require_full_path(names: &ProjectNames) -> Result<(), ProjectError> {
    if names.full_path().as_os_str().is_empty() {
        Err(ProjectError::MissingProjectPath)
    } else {
        Ok(())
    }
}
