//! High-level operations.
//!
//! This module contains the implementation of restore-graph commands.

pub mod install;
pub mod plan;
pub mod solution;

pub use install::{install, parse_exact_version, uninstall, InstallOptions, PackageSource};
pub use plan::{plan, FingerprintStore, PlannedProject, RestorePlan};
pub use solution::{Solution, SolutionProject, PACKAGE_REFERENCES_FILE};
