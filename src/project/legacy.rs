//! Projects whose package references are edited in place.
//!
//! The host never nominates a specification for these, so there is nothing to
//! reduce, walk or restore. Mutations still go through the coordinator.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::{PackageIdentity, PackageReference, PackageSpec, ProjectKind, ProjectNames};
use crate::project::{
    require_full_path, DependencyGraphProject, InstallOutcome, MutationCoordinator, PackageContent,
    ProjectError, UninstallOutcome,
};
use crate::resolver::{ProjectLookup, RestoreGraphClosure};

pub struct LegacyProject {
    names: ProjectNames,
    mutation: MutationCoordinator,
}

impl LegacyProject {
    pub fn new(names: ProjectNames, mutation: MutationCoordinator) -> Result<Self, ProjectError> {
        require_full_path(&names)?;
        Ok(LegacyProject { names, mutation })
    }
}

#[async_trait]
impl DependencyGraphProject for LegacyProject {
    fn kind(&self) -> ProjectKind {
        ProjectKind::Legacy
    }

    fn names(&self) -> &ProjectNames {
        &self.names
    }

    fn package_spec(&self) -> Option<PackageSpec> {
        None
    }

    async fn installed_packages(&self, _token: &CancellationToken) -> Result<Vec<PackageReference>, ProjectError> {
        Ok(Vec::new())
    }

    async fn project_reference_closure(
        &self,
        _lookup: &dyn ProjectLookup,
        _token: &CancellationToken,
    ) -> Result<RestoreGraphClosure, ProjectError> {
        Err(ProjectError::unsupported("project_reference_closure", self.kind()))
    }

    async fn install_package(
        &self,
        identity: &PackageIdentity,
        content: PackageContent,
        token: &CancellationToken,
    ) -> Result<InstallOutcome, ProjectError> {
        self.mutation.install(identity, content, token).await
    }

    async fn uninstall_package(
        &self,
        identity: &PackageIdentity,
        token: &CancellationToken,
    ) -> Result<UninstallOutcome, ProjectError> {
        self.mutation.uninstall(identity, token).await
    }

    async fn execute_init_script(
        &self,
        _identity: &PackageIdentity,
        _package_install_path: &Path,
        _token: &CancellationToken,
    ) -> Result<bool, ProjectError> {
        Ok(false)
    }

    fn assets_file(&self) -> Option<PathBuf> {
        None
    }
}
