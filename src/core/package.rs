//! Package identities and installed-package references.

use std::fmt;
use std::hash::{Hash, Hasher};

use semver::Version;
use serde::Serialize;

use crate::core::framework::TargetFramework;
use crate::core::version::{self, display_version};
use crate::util::Name;

/// A package id with an optional exact version.
///
/// Identity is the id alone, compared ignoring case: two identities with the
/// same id and different versions are the same package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageIdentity {
    id: Name,
    #[serde(serialize_with = "version::serialize_optional")]
    version: Option<Version>,
}

impl PackageIdentity {
    pub fn new(id: impl Into<Name>, version: Option<Version>) -> Self {
        PackageIdentity {
            id: id.into(),
            version,
        }
    }

    pub fn id(&self) -> &Name {
        &self.id
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PackageIdentity {}

impl Hash for PackageIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.id, display_version(version)),
            None => write!(f, "{}", self.id),
        }
    }
}

/// An installed package and the framework it was first satisfied under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReference {
    identity: PackageIdentity,
    target_framework: TargetFramework,
}

impl PackageReference {
    pub fn new(identity: PackageIdentity, target_framework: TargetFramework) -> Self {
        PackageReference {
            identity,
            target_framework,
        }
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    pub fn target_framework(&self) -> &TargetFramework {
        &self.target_framework
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.identity, self.target_framework)
    }
}
