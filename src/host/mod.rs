//! File-backed host collaborators.
//!
//! These implement the service traits of [`crate::project`] on top of plain
//! files, so the engine can be driven without an IDE.

pub mod cache;
pub mod metadata;
pub mod references;

pub use cache::SolutionCache;
pub use metadata::{ManifestMetadataReader, PACKAGE_MANIFEST};
pub use references::PackageReferenceFile;
