//! Command implementations

pub mod closure;
pub mod completions;
pub mod install;
pub mod installed;
pub mod plan;
pub mod references;
pub mod uninstall;
