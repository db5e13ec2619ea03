//! Shared utilities

pub mod cancel;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod fs;
pub mod name;
pub mod shell;

pub use cancel::Cancelled;
pub use config::Config;
pub use context::GlobalContext;
pub use name::{Name, NameSet};
pub use shell::{Shell, Status};
