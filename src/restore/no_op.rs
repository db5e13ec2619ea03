//! Restore-skip decision.
//!
//! A project owes a restore whenever it has a specification. A project the
//! host has not nominated has nothing to restore. The fingerprint of the
//! current specification is computed and compared with the prior one for
//! reporting, but never turns a required restore into a skip.

use std::fmt;

use serde::Serialize;

use crate::core::ProjectDescriptor;
use crate::restore::fingerprint::RestoreFingerprint;

/// Why a restore is or is not owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionReason {
    /// The project has no specification.
    NoSpecification,

    /// The project has a specification.
    SpecificationPresent,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionReason::NoSpecification => f.write_str("no specification"),
            DecisionReason::SpecificationPresent => f.write_str("specification present"),
        }
    }
}

/// Outcome of a restore-skip check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreDecision {
    /// Whether a restore must run
    pub required: bool,

    pub reason: DecisionReason,

    /// Fingerprint of the current specification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<RestoreFingerprint>,

    /// Whether `fingerprint` equals the prior one, when both exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_matches: Option<bool>,
}

impl RestoreDecision {
    pub fn skip(&self) -> bool {
        !self.required
    }
}

/// Whether the restore for `descriptor` can be skipped.
///
/// True exactly when the descriptor has no specification.
pub fn should_skip_restore(descriptor: &ProjectDescriptor, prior: Option<&RestoreFingerprint>) -> bool {
    decide(descriptor, prior).skip()
}

/// Full restore decision for `descriptor`.
pub fn decide(descriptor: &ProjectDescriptor, prior: Option<&RestoreFingerprint>) -> RestoreDecision {
    let Some(spec) = &descriptor.spec else {
        tracing::debug!("{}: no specification, nothing to restore", descriptor.names);
        return RestoreDecision {
            required: false,
            reason: DecisionReason::NoSpecification,
            fingerprint: None,
            prior_matches: None,
        };
    };

    let fingerprint = RestoreFingerprint::compute(spec);
    let prior_matches = prior.map(|prior| *prior == fingerprint);
    tracing::debug!(
        "{}: restore required, fingerprint {}{}",
        descriptor.names,
        fingerprint,
        if prior_matches == Some(true) { " (unchanged)" } else { "" }
    );

    RestoreDecision {
        required: true,
        reason: DecisionReason::SpecificationPresent,
        fingerprint: Some(fingerprint),
        prior_matches,
    }
}
