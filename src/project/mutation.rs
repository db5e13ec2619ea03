//! Install and uninstall against a project's persisted reference set.
//!
//! Install is an upsert: a new entry is added, an existing one has its
//! `Version` property rewritten. Uninstall of a package that is not there
//! succeeds. Neither triggers a restore.
//!
//! Cancellation is observed up to the first write. Once the reference has
//! been added the remaining property writes always run, so a cancelled
//! install never leaves a half-configured entry behind.

use std::io::{Seek, SeekFrom};
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::core::version::display_version;
use crate::core::PackageIdentity;
use crate::project::errors::{HostError, ProjectError};
use crate::project::{DependencySetService, PackageContent, PackageMetadata, PackageMetadataReader, ReadSeek};
use crate::util::cancel::{self, cancellable};

pub const VERSION_PROPERTY: &str = "Version";
pub const PRIVATE_ASSETS_PROPERTY: &str = "PrivateAssets";
pub const PRIVATE_ASSETS_ALL: &str = "all";

/// Result of an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallOutcome {
    /// A new reference was added.
    Added,
    /// An existing reference had its version updated.
    Updated,
}

/// Result of an uninstall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UninstallOutcome {
    Removed,
    NotInstalled,
}

/// Routes install/uninstall intents into host services.
#[derive(Clone)]
pub struct MutationCoordinator {
    service: Arc<dyn DependencySetService>,
    metadata: Arc<dyn PackageMetadataReader>,
}

impl MutationCoordinator {
    pub fn new(service: Arc<dyn DependencySetService>, metadata: Arc<dyn PackageMetadataReader>) -> Self {
        MutationCoordinator { service, metadata }
    }

    pub fn service(&self) -> &Arc<dyn DependencySetService> {
        &self.service
    }

    pub fn metadata(&self) -> &Arc<dyn PackageMetadataReader> {
        &self.metadata
    }

    /// Install `identity` from `content`.
    pub async fn install(
        &self,
        identity: &PackageIdentity,
        content: PackageContent,
        token: &CancellationToken,
    ) -> Result<InstallOutcome, ProjectError> {
        let id = identity.id().as_str();

        let PackageContent::Seekable(mut stream) = content else {
            return Err(ProjectError::NonSeekableSource {
                package: id.to_string(),
            });
        };
        let version = identity.version().cloned().ok_or_else(|| ProjectError::MissingVersion {
            package: id.to_string(),
        })?;

        cancel::check(token)?;
        let metadata = self.read_metadata(stream.as_mut()).map_err(|source| ProjectError::Metadata {
            package: id.to_string(),
            source,
        })?;
        drop(stream);

        cancel::check(token)?;
        let added = self
            .service
            .add(id, &version)
            .await
            .map_err(|e| ProjectError::host("add", id, e))?;

        if !added {
            tracing::debug!("`{}` already referenced, updating version", id);
            self.set_property(id, VERSION_PROPERTY, &display_version(&version).to_string())
                .await?;
        }

        if metadata.development_dependency {
            tracing::debug!("`{}` is a development dependency", id);
            self.set_property(id, PRIVATE_ASSETS_PROPERTY, PRIVATE_ASSETS_ALL).await?;
        }

        let outcome = if added {
            InstallOutcome::Added
        } else {
            InstallOutcome::Updated
        };
        tracing::info!("installed {} ({:?})", identity, outcome);
        Ok(outcome)
    }

    /// Remove `identity`. Absence is not an error.
    pub async fn uninstall(
        &self,
        identity: &PackageIdentity,
        token: &CancellationToken,
    ) -> Result<UninstallOutcome, ProjectError> {
        let id = identity.id().as_str();
        let removed = cancellable(token, self.service.remove(id))
            .await?
            .map_err(|e| ProjectError::host("remove", id, e))?;

        if removed {
            tracing::info!("uninstalled {}", id);
            Ok(UninstallOutcome::Removed)
        } else {
            tracing::debug!("`{}` was not installed", id);
            Ok(UninstallOutcome::NotInstalled)
        }
    }

    fn read_metadata(&self, stream: &mut dyn ReadSeek) -> Result<PackageMetadata, HostError> {
        stream.seek(SeekFrom::Start(0))?;
        let metadata = self.metadata.read_stream(stream)?;
        stream.seek(SeekFrom::Start(0))?;
        Ok(metadata)
    }

    async fn set_property(&self, id: &str, key: &str, value: &str) -> Result<(), ProjectError> {
        self.service
            .set_property(id, key, value)
            .await
            .map_err(|e| ProjectError::host("update", id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use async_trait::async_trait;
    use semver::Version;

    use crate::project::DependencyEntry;
    use crate::test_support::{FailingDependencySet, InMemoryDependencySet, StaticMetadataReader};

    fn coordinator(service: Arc<dyn DependencySetService>, development: bool) -> MutationCoordinator {
        MutationCoordinator::new(service, Arc::new(StaticMetadataReader::new(development)))
    }

    fn identity(id: &str, version: &str) -> PackageIdentity {
        PackageIdentity::new(id, Some(Version::parse(version).unwrap()))
    }

    fn seekable() -> PackageContent {
        PackageContent::Seekable(Box::new(Cursor::new(b"package".to_vec())))
    }

    // ------------------------------------------------------------------------
    // Install
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_install_adds_then_updates_in_place() {
        let set = Arc::new(InMemoryDependencySet::new());
        let coordinator = coordinator(set.clone(), false);
        let token = CancellationToken::new();

        let first = coordinator.install(&identity("PackageA", "1.0.0"), seekable(), &token).await.unwrap();
        let second = coordinator.install(&identity("packagea", "1.2.0"), seekable(), &token).await.unwrap();

        assert_eq!(first, InstallOutcome::Added);
        assert_eq!(second, InstallOutcome::Updated);

        let entries = set.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "PackageA");
        assert_eq!(entries[0].property(VERSION_PROPERTY), Some("1.2.0"));
        assert_eq!(entries[0].property(PRIVATE_ASSETS_PROPERTY), None);
    }

    #[tokio::test]
    async fn test_development_dependency_gets_private_assets() {
        let set = Arc::new(InMemoryDependencySet::new());
        let coordinator = coordinator(set.clone(), true);

        coordinator
            .install(&identity("Analyzers", "2.0.0"), seekable(), &CancellationToken::new())
            .await
            .unwrap();

        let entries = set.snapshot();
        assert_eq!(entries[0].property(PRIVATE_ASSETS_PROPERTY), Some(PRIVATE_ASSETS_ALL));
    }

    #[tokio::test]
    async fn test_streaming_content_is_rejected() {
        let set = Arc::new(InMemoryDependencySet::new());
        let coordinator = coordinator(set.clone(), false);
        let content = PackageContent::Streaming(Box::new(std::io::empty()));

        let err = coordinator
            .install(&identity("PackageA", "1.0.0"), content, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ProjectError::NonSeekableSource { .. }));
        assert!(set.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_install_without_version_is_rejected() {
        let coordinator = coordinator(Arc::new(InMemoryDependencySet::new()), false);
        let err = coordinator
            .install(&PackageIdentity::new("PackageA", None), seekable(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::MissingVersion { .. }));
    }

    #[tokio::test]
    async fn test_metadata_sees_whole_stream() {
        struct LengthReader;

        impl PackageMetadataReader for LengthReader {
            fn read_stream(&self, content: &mut dyn ReadSeek) -> Result<PackageMetadata, HostError> {
                let mut buf = Vec::new();
                content.read_to_end(&mut buf)?;
                Ok(PackageMetadata {
                    development_dependency: buf == b"package",
                    tool_items: Vec::new(),
                })
            }

            fn read_folder(&self, _path: &std::path::Path) -> Result<PackageMetadata, HostError> {
                Ok(PackageMetadata::default())
            }
        }

        let set = Arc::new(InMemoryDependencySet::new());
        let coordinator = MutationCoordinator::new(set.clone(), Arc::new(LengthReader));

        let mut cursor = Cursor::new(b"package".to_vec());
        let mut skip = [0u8; 3];
        cursor.read_exact(&mut skip).unwrap();

        coordinator
            .install(
                &identity("Tool", "1.0.0"),
                PackageContent::Seekable(Box::new(cursor)),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(set.snapshot()[0].property(PRIVATE_ASSETS_PROPERTY), Some("all"));
    }

    #[tokio::test]
    async fn test_host_failure_is_surfaced() {
        let coordinator = coordinator(Arc::new(FailingDependencySet), false);
        let err = coordinator
            .install(&identity("PackageA", "1.0.0"), seekable(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ProjectError::HostService { action: "add", .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_install_cancelled() {
        let set = Arc::new(InMemoryDependencySet::new());
        let coordinator = coordinator(set.clone(), false);
        let token = CancellationToken::new();
        token.cancel();

        let err = coordinator
            .install(&identity("PackageA", "1.0.0"), seekable(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Cancelled(_)));
        assert!(set.snapshot().is_empty());
    }

    /// A reference set whose `add` cancels the install's token once it has
    /// written the entry.
    struct CancelOnAdd {
        inner: InMemoryDependencySet,
        token: CancellationToken,
    }

    #[async_trait]
    impl DependencySetService for CancelOnAdd {
        async fn add(&self, name: &str, version: &Version) -> Result<bool, HostError> {
            let added = self.inner.add(name, version).await?;
            self.token.cancel();
            Ok(added)
        }

        async fn set_property(&self, name: &str, key: &str, value: &str) -> Result<(), HostError> {
            self.inner.set_property(name, key, value).await
        }

        async fn remove(&self, name: &str) -> Result<bool, HostError> {
            self.inner.remove(name).await
        }

        async fn entries(&self) -> Result<Vec<DependencyEntry>, HostError> {
            self.inner.entries().await
        }
    }

    #[tokio::test]
    async fn test_cancel_after_add_still_completes_entry() {
        let token = CancellationToken::new();
        let set = Arc::new(CancelOnAdd {
            inner: InMemoryDependencySet::new(),
            token: token.clone(),
        });
        let coordinator = coordinator(set.clone(), true);

        let outcome = coordinator
            .install(&identity("Analyzers", "2.0.0"), seekable(), &token)
            .await
            .unwrap();

        assert!(token.is_cancelled());
        assert_eq!(outcome, InstallOutcome::Added);
        let entries = set.inner.snapshot();
        assert_eq!(entries[0].property(VERSION_PROPERTY), Some("2.0.0"));
        assert_eq!(entries[0].property(PRIVATE_ASSETS_PROPERTY), Some(PRIVATE_ASSETS_ALL));
    }

    #[tokio::test]
    async fn test_update_keeps_revision() {
        let set = Arc::new(InMemoryDependencySet::new());
        let coordinator = coordinator(set.clone(), false);
        let token = CancellationToken::new();
        let revision = crate::core::version::parse_version_lenient("4.3.0.1").unwrap();

        coordinator.install(&identity("PackageA", "1.0.0"), seekable(), &token).await.unwrap();
        coordinator
            .install(&PackageIdentity::new("PackageA", Some(revision)), seekable(), &token)
            .await
            .unwrap();

        assert_eq!(set.snapshot()[0].property(VERSION_PROPERTY), Some("4.3.0.1"));
    }

    // ------------------------------------------------------------------------
    // Uninstall
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_uninstall_is_idempotent() {
        let set = Arc::new(InMemoryDependencySet::new());
        let coordinator = coordinator(set.clone(), false);
        let token = CancellationToken::new();

        coordinator.install(&identity("PackageA", "1.0.0"), seekable(), &token).await.unwrap();

        let pkg = PackageIdentity::new("PACKAGEA", None);
        assert_eq!(coordinator.uninstall(&pkg, &token).await.unwrap(), UninstallOutcome::Removed);
        assert_eq!(coordinator.uninstall(&pkg, &token).await.unwrap(), UninstallOutcome::NotInstalled);
        assert!(set.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_uninstall_host_failure() {
        let coordinator = coordinator(Arc::new(FailingDependencySet), false);
        let err = coordinator
            .uninstall(&PackageIdentity::new("PackageA", None), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::HostService { action: "remove", .. }));
    }
}
