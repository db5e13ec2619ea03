//! Package specifications.
//!
//! A PackageSpec is the normalized dependency declaration of one project
//! across all of its target frameworks. The host produces it on demand; this
//! crate never caches one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::dependency::LibraryDependency;
use crate::core::framework::TargetFramework;
use crate::util::Name;

/// Dependencies declared under one target framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFrameworkInformation {
    pub framework: TargetFramework,

    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
}

impl TargetFrameworkInformation {
    pub fn new(framework: TargetFramework) -> Self {
        TargetFrameworkInformation {
            framework,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dependency: LibraryDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// Where a project lives and where its restore output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RestoreMetadata {
    /// Absolute path of the project file
    pub project_path: PathBuf,

    /// Host-unique project name
    pub project_unique_name: Option<String>,

    /// Restore output directory (holds the assets file)
    pub output_path: Option<PathBuf>,
}

/// A project's dependency specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageSpec {
    #[serde(default)]
    pub name: Name,

    #[serde(default, rename = "restore")]
    pub restore_metadata: RestoreMetadata,

    #[serde(default, rename = "frameworks")]
    pub target_frameworks: Vec<TargetFrameworkInformation>,
}

impl PackageSpec {
    pub fn new(name: impl Into<Name>, project_path: impl Into<PathBuf>) -> Self {
        PackageSpec {
            name: name.into(),
            restore_metadata: RestoreMetadata {
                project_path: project_path.into(),
                ..RestoreMetadata::default()
            },
            target_frameworks: Vec::new(),
        }
    }

    pub fn with_framework(mut self, framework: TargetFrameworkInformation) -> Self {
        self.target_frameworks.push(framework);
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.restore_metadata.output_path = Some(output_path.into());
        self
    }

    pub fn project_path(&self) -> &Path {
        &self.restore_metadata.project_path
    }

    /// All dependencies with the framework they are declared under.
    pub fn dependencies(&self) -> impl Iterator<Item = (&TargetFramework, &LibraryDependency)> {
        self.target_frameworks
            .iter()
            .flat_map(|tfi| tfi.dependencies.iter().map(move |dep| (&tfi.framework, dep)))
    }
}
