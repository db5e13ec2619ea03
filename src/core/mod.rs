//! Core data structures.
//!
//! This module contains the dependency record model:
//! - Target frameworks and their precedence order
//! - Version ranges
//! - Library dependencies and package specifications
//! - Package identities and project descriptors

pub mod dependency;
pub mod framework;
pub mod package;
pub mod project;
pub mod spec;
pub mod version;

pub use dependency::{DependencyTarget, LibraryDependency};
pub use framework::TargetFramework;
pub use package::{PackageIdentity, PackageReference};
pub use project::{ProjectDescriptor, ProjectKind, ProjectNames};
pub use spec::{PackageSpec, RestoreMetadata, TargetFrameworkInformation};
pub use version::VersionRange;
