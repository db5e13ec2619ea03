//! Project identity and descriptors.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::core::spec::PackageSpec;

/// The names a host knows a project by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectNames {
    /// Display name
    pub name: String,

    /// Host-unique name (usually the solution-relative path)
    pub unique_name: String,

    /// Absolute path of the project file
    pub full_path: PathBuf,
}

impl ProjectNames {
    pub fn new(
        name: impl Into<String>,
        unique_name: impl Into<String>,
        full_path: impl Into<PathBuf>,
    ) -> Self {
        ProjectNames {
            name: name.into(),
            unique_name: unique_name.into(),
            full_path: full_path.into(),
        }
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }
}

impl fmt::Display for ProjectNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How a project's dependency declarations reach this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    /// The host pushes (nominates) a specification into a cache.
    Nominated,

    /// Package references are edited in place; no specification is nominated.
    Legacy,
}

impl Default for ProjectKind {
    fn default() -> Self {
        ProjectKind::Nominated
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Nominated => f.write_str("nominated"),
            ProjectKind::Legacy => f.write_str("legacy"),
        }
    }
}

/// A point-in-time view of a project. Rebuilt on every query.
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    pub names: ProjectNames,
    pub last_modified: SystemTime,
    pub spec: Option<PackageSpec>,
}

impl ProjectDescriptor {
    /// Whether the host has nominated a specification yet.
    pub fn is_nominated(&self) -> bool {
        self.spec.is_some()
    }
}
