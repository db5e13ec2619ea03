//! Library dependency declarations.
//!
//! A LibraryDependency names what a project requires under one target
//! framework. Its type constraint says whether the name points at an
//! external package or at a sibling project; the constraint is fixed when the
//! dependency is declared and is never guessed from the name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::version::VersionRange;
use crate::util::Name;

/// What kind of library a dependency may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyTarget {
    /// A versioned package resolved from a feed.
    Package,

    /// A sibling project resolved by path or identity.
    #[serde(alias = "project")]
    ExternalProject,
}

impl Default for DependencyTarget {
    fn default() -> Self {
        DependencyTarget::Package
    }
}

impl fmt::Display for DependencyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyTarget::Package => f.write_str("package"),
            DependencyTarget::ExternalProject => f.write_str("project"),
        }
    }
}

/// A single declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDependency {
    /// Package id or project name
    name: Name,

    /// Acceptable versions
    #[serde(default, rename = "version")]
    version_range: VersionRange,

    /// Package or project
    #[serde(default, rename = "type")]
    target: DependencyTarget,
}

impl LibraryDependency {
    /// Create a package dependency.
    pub fn package(name: impl Into<Name>, version_range: VersionRange) -> Self {
        LibraryDependency {
            name: name.into(),
            version_range,
            target: DependencyTarget::Package,
        }
    }

    /// Create a project-to-project dependency.
    pub fn project(name: impl Into<Name>) -> Self {
        LibraryDependency {
            name: name.into(),
            version_range: VersionRange::all(),
            target: DependencyTarget::ExternalProject,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn version_range(&self) -> &VersionRange {
        &self.version_range
    }

    pub fn target(&self) -> DependencyTarget {
        self.target
    }

    pub fn is_package(&self) -> bool {
        self.target == DependencyTarget::Package
    }

    pub fn is_project(&self) -> bool {
        self.target == DependencyTarget::ExternalProject
    }
}
