//! Dependency views derived from package specifications.
//!
//! Everything here is pure: specifications come in, reduced values go out.
//! Host access happens only through [`ProjectLookup`].

pub mod closure;
pub mod graph;
pub mod installed;
pub mod references;

pub use closure::{ClosureBuilder, ProjectLookup, ResolvedProject};
pub use graph::{ExternalProjectReference, RestoreGraphClosure};
pub use installed::reduce_package_references;
pub use references::project_references;
