//! Package metadata read from a `package.toml` manifest.
//!
//! Package content handed to an install is the manifest itself; an installed
//! package folder carries it at its root.
//!
//! ```toml
//! [package]
//! id = "Tool"
//! version = "1.0.0"
//! development-dependency = true
//!
//! [[tools]]
//! framework = "any"
//! items = ["tools/init.ps1"]
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::core::TargetFramework;
use crate::project::{FrameworkItems, HostError, PackageMetadata, PackageMetadataReader, ReadSeek};
use crate::util::fs;

/// File name of the manifest inside an installed package folder.
pub const PACKAGE_MANIFEST: &str = "package.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct ManifestPackage {
    development_dependency: bool,
}

#[derive(Debug, Deserialize)]
struct ManifestToolGroup {
    framework: TargetFramework,
    #[serde(default)]
    items: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    package: ManifestPackage,
    tools: Vec<ManifestToolGroup>,
}

impl From<Manifest> for PackageMetadata {
    fn from(manifest: Manifest) -> Self {
        PackageMetadata {
            development_dependency: manifest.package.development_dependency,
            tool_items: manifest
                .tools
                .into_iter()
                .map(|group| FrameworkItems {
                    framework: group.framework,
                    items: group.items,
                })
                .collect(),
        }
    }
}

/// Reads [`PackageMetadata`] from `package.toml` manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestMetadataReader;

impl ManifestMetadataReader {
    pub fn new() -> Self {
        ManifestMetadataReader
    }

    fn parse(contents: &str, origin: &str) -> Result<PackageMetadata, HostError> {
        let manifest: Manifest = toml::from_str(contents)
            .map_err(|e| format!("invalid package manifest {}: {}", origin, e))?;
        Ok(manifest.into())
    }
}

impl PackageMetadataReader for ManifestMetadataReader {
    fn read_stream(&self, content: &mut dyn ReadSeek) -> Result<PackageMetadata, HostError> {
        let mut contents = String::new();
        content.read_to_string(&mut contents)?;
        Self::parse(&contents, "stream")
    }

    fn read_folder(&self, path: &Path) -> Result<PackageMetadata, HostError> {
        let manifest_path = path.join(PACKAGE_MANIFEST);
        if !manifest_path.is_file() {
            return Ok(PackageMetadata::default());
        }
        let contents = fs::read_to_string(&manifest_path)?;
        Self::parse(&contents, &manifest_path.display().to_string())
    }
}
