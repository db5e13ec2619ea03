//! restore-graph - project dependency graph closure and restore decisions
//!
//! This crate computes the transitive project-to-project reference closure of
//! a solution, reduces multi-framework package declarations into one
//! installed-package view, decides whether a restore is owed, and routes
//! install/uninstall intents to host services.

pub mod core;
pub mod host;
pub mod ops;
pub mod project;
pub mod resolver;
pub mod restore;
pub mod util;

/// Test utilities and mocks for restore-graph unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides in-memory host services and specification fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    LibraryDependency, PackageIdentity, PackageReference, PackageSpec, ProjectDescriptor, TargetFramework,
};
pub use project::{DependencyGraphProject, ProjectError};
pub use resolver::{ClosureBuilder, ExternalProjectReference, ProjectLookup, RestoreGraphClosure};
pub use restore::{should_skip_restore, RestoreDecision, RestoreFingerprint};
pub use util::context::GlobalContext;
