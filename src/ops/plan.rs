//! Restore planning.
//!
//! A plan walks the reference closure of one project and, for every project
//! in it (dependencies first), records whether a restore is owed, the
//! specifications to hand to the restore, and the installed package view.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::core::{PackageReference, ProjectKind};
use crate::ops::solution::Solution;
use crate::restore::{self, RestoreDecision, RestoreFingerprint};
use crate::util::{fs, Name, NameSet};

/// Fingerprints recorded by an earlier plan, keyed by project unique name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FingerprintStore {
    #[serde(default)]
    fingerprints: BTreeMap<String, RestoreFingerprint>,
}

impl FingerprintStore {
    /// Location of the store for a solution.
    pub fn path_for(solution_root: &Path) -> PathBuf {
        solution_root.join(".restore-graph").join("fingerprints.toml")
    }

    /// Load the store, or an empty one if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FingerprintStore::default());
        }
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("failed to serialize fingerprints")?;
        fs::write_string(path, &contents)
    }

    pub fn get(&self, unique_name: &str) -> Option<&RestoreFingerprint> {
        self.fingerprints
            .iter()
            .find(|(name, _)| Name::new(name.as_str()).matches(unique_name))
            .map(|(_, fp)| fp)
    }

    pub fn insert(&mut self, unique_name: &str, fingerprint: RestoreFingerprint) {
        self.fingerprints
            .retain(|name, _| !Name::new(name.as_str()).matches(unique_name));
        self.fingerprints.insert(unique_name.to_string(), fingerprint);
    }
}

/// One project of a plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedProject {
    pub name: String,
    pub unique_name: String,
    pub path: PathBuf,
    pub kind: ProjectKind,
    pub decision: RestoreDecision,
    pub installed: Vec<PackageReference>,

    #[serde(skip)]
    pub spec_count: usize,
}

/// Restore plan for the closure of one project.
#[derive(Debug, Clone, Serialize)]
pub struct RestorePlan {
    pub root: String,

    /// Projects in restore order
    pub projects: Vec<PlannedProject>,

    pub cycles: Vec<Vec<Name>>,
    pub unresolved: NameSet,
}

impl RestorePlan {
    pub fn restore_count(&self) -> usize {
        self.projects.iter().filter(|p| p.decision.required).count()
    }

    /// Fingerprints of every project that has one.
    pub fn fingerprints(&self) -> impl Iterator<Item = (&str, &RestoreFingerprint)> {
        self.projects.iter().filter_map(|p| {
            p.decision
                .fingerprint
                .as_ref()
                .map(|fp| (p.unique_name.as_str(), fp))
        })
    }
}

/// Plan the restore of `key` and everything it references.
pub async fn plan(
    solution: &Solution,
    key: &str,
    prior: &FingerprintStore,
    token: &CancellationToken,
) -> Result<RestorePlan> {
    let root = solution.project(key)?;
    let closure = root
        .project()
        .project_reference_closure(solution.lookup(), token)
        .await?;

    let mut projects = Vec::with_capacity(closure.len());
    for reference in closure.restore_order() {
        let path = reference.unique_name().as_str();
        let member = solution
            .project(path)
            .with_context(|| format!("closure member {} is not part of the solution", path))?;
        let project = member.project();

        let descriptor = project.descriptor();
        let decision = restore::decide(&descriptor, prior.get(&descriptor.names.unique_name));
        let installed = project.installed_packages(token).await?;

        projects.push(PlannedProject {
            name: descriptor.names.name.clone(),
            unique_name: descriptor.names.unique_name.clone(),
            path: descriptor.names.full_path.clone(),
            kind: project.kind(),
            decision,
            installed,
            spec_count: project.package_specs_for_restore().len(),
        });
    }

    for cycle in closure.cycles() {
        tracing::warn!(
            "project reference cycle: {}",
            cycle.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(" -> ")
        );
    }

    Ok(RestorePlan {
        root: root.names().unique_name.clone(),
        projects,
        cycles: closure.cycles(),
        unresolved: closure.unresolved().clone(),
    })
}
