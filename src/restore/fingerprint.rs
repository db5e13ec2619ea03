//! Content fingerprint of a package specification.
//!
//! The fingerprint covers what affects a restore: target frameworks and the
//! dependencies declared under each. Frameworks are sorted by precedence,
//! dependencies by name, and names are lower-cased, so declaration order and
//! casing do not change the result.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::PackageSpec;

/// Hex-encoded sha256 over a normalized specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestoreFingerprint(String);

impl RestoreFingerprint {
    /// Compute the fingerprint of a specification.
    pub fn compute(spec: &PackageSpec) -> Self {
        let mut frameworks: Vec<_> = spec.target_frameworks.iter().collect();
        frameworks.sort_by(|a, b| a.framework.cmp(&b.framework));

        let frameworks: Vec<serde_json::Value> = frameworks
            .into_iter()
            .map(|tfi| {
                let mut deps: Vec<_> = tfi
                    .dependencies
                    .iter()
                    .map(|dep| {
                        serde_json::json!({
                            "name": dep.name().normalized(),
                            "range": dep.version_range().to_string(),
                            "type": dep.target().to_string(),
                        })
                    })
                    .collect();
                deps.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

                serde_json::json!({
                    "framework": tfi.framework.short_name(),
                    "dependencies": deps,
                })
            })
            .collect();

        let normalized = serde_json::json!({
            "name": spec.name.normalized(),
            "frameworks": frameworks,
        });

        let hash = Sha256::digest(normalized.to_string().as_bytes());
        RestoreFingerprint(hex::encode(hash))
    }

    /// Wrap a previously recorded fingerprint.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        RestoreFingerprint(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestoreFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
