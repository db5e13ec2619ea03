//! Implementation of `restore-graph install` and `restore-graph uninstall`.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use semver::Version;
use tokio_util::sync::CancellationToken;

use crate::core::version::parse_version_lenient;
use crate::core::PackageIdentity;
use crate::ops::solution::Solution;
use crate::project::{InstallOutcome, PackageContent, UninstallOutcome};

/// Where install reads package content from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// A package manifest on disk
    File(PathBuf),
    /// Standard input (`-`)
    Stdin,
}

impl FromStr for PackageSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "-" {
            PackageSource::Stdin
        } else {
            PackageSource::File(PathBuf::from(s))
        })
    }
}

impl PackageSource {
    /// Open the content. Files are seekable; stdin is not.
    pub fn open(&self) -> Result<PackageContent> {
        match self {
            PackageSource::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open package {}", path.display()))?;
                Ok(PackageContent::Seekable(Box::new(file)))
            }
            PackageSource::Stdin => Ok(PackageContent::Streaming(Box::new(io::stdin()))),
        }
    }
}

/// Options for installing a package.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Project name, unique name or path
    pub project: String,

    /// Package id
    pub id: String,

    /// Exact version
    pub version: String,

    /// Package content; none means a package without metadata
    pub source: Option<PackageSource>,
}

/// Parse an exact package version, accepting `1` and `1.2`.
pub fn parse_exact_version(s: &str) -> Result<Version> {
    parse_version_lenient(s).with_context(|| format!("invalid package version `{}`", s))
}

/// Install a package into a project's reference set.
pub async fn install(solution: &Solution, opts: &InstallOptions, token: &CancellationToken) -> Result<InstallOutcome> {
    let member = solution.project(&opts.project)?;
    let version = parse_exact_version(&opts.version)?;
    let identity = PackageIdentity::new(opts.id.as_str(), Some(version));

    let content = match &opts.source {
        Some(source) => source.open()?,
        None => PackageContent::Seekable(Box::new(Cursor::new(Vec::new()))),
    };

    let outcome = member
        .project()
        .install_package(&identity, content, token)
        .await
        .with_context(|| format!("failed to install {} into {}", identity, member.names()))?;
    Ok(outcome)
}

/// Remove a package from a project's reference set.
pub async fn uninstall(
    solution: &Solution,
    project: &str,
    id: &str,
    token: &CancellationToken,
) -> Result<UninstallOutcome> {
    let member = solution.project(project)?;
    let identity = PackageIdentity::new(id, None);

    let outcome = member
        .project()
        .uninstall_package(&identity, token)
        .await
        .with_context(|| format!("failed to uninstall {} from {}", id, member.names()))?;
    Ok(outcome)
}
