//! Restore-skip decisions.

pub mod fingerprint;
pub mod no_op;

pub use fingerprint::RestoreFingerprint;
pub use no_op::{decide, should_skip_restore, DecisionReason, RestoreDecision};
