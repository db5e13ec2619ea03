//! Solution - the nomination snapshot a CLI run works against.
//!
//! `Restore.toml` lists the projects of a solution. Each entry names a
//! project, its kind, and for nominated projects the specification the host
//! has pushed so far:
//!
//! ```toml
//! [[projects]]
//! name = "App"
//! path = "src/App/App.csproj"
//!
//! [projects.spec.restore]
//! output-path = "src/App/obj"
//!
//! [[projects.spec.frameworks]]
//! framework = "net472"
//! dependencies = [
//!     { name = "Newtonsoft.Json", version = "13.0.1" },
//!     { name = "Lib", type = "project" },
//! ]
//! ```
//!
//! Relative paths resolve against the directory holding `Restore.toml`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::{PackageSpec, ProjectKind, ProjectNames};
use crate::host::{ManifestMetadataReader, PackageReferenceFile, SolutionCache};
use crate::project::{DependencyGraphProject, LegacyProject, MutationCoordinator, NominatedProject};
use crate::resolver::ProjectLookup;
use crate::util::diagnostic::suggestions;
use crate::util::{fs, Config};

/// Default name of the per-project package reference file.
pub const PACKAGE_REFERENCES_FILE: &str = "packages.toml";

#[derive(Debug, Default, Deserialize)]
struct SolutionFile {
    #[serde(default)]
    projects: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ProjectEntry {
    name: String,
    unique_name: Option<String>,
    path: PathBuf,
    #[serde(default)]
    kind: ProjectKind,
    package_references: Option<PathBuf>,
    spec: Option<PackageSpec>,
}

/// A project loaded from the solution.
pub struct SolutionProject {
    names: ProjectNames,
    references: Arc<PackageReferenceFile>,
    project: Arc<dyn DependencyGraphProject>,
}

impl SolutionProject {
    pub fn names(&self) -> &ProjectNames {
        &self.names
    }

    pub fn kind(&self) -> ProjectKind {
        self.project.kind()
    }

    /// The persisted package reference set of this project.
    pub fn references(&self) -> &PackageReferenceFile {
        &self.references
    }

    pub fn project(&self) -> &dyn DependencyGraphProject {
        self.project.as_ref()
    }
}

/// All projects of one `Restore.toml`.
pub struct Solution {
    path: PathBuf,
    root: PathBuf,
    cache: SolutionCache,
    projects: Vec<SolutionProject>,
}

impl Solution {
    /// Load a solution file.
    pub fn load(path: &Path, config: &Config) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let file: SolutionFile = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let cache = SolutionCache::new();
        let metadata = Arc::new(ManifestMetadataReader::new());
        let mut projects = Vec::with_capacity(file.projects.len());

        for entry in file.projects {
            let full_path = fs::resolve_path(&root, &entry.path);
            let unique_name = entry
                .unique_name
                .clone()
                .unwrap_or_else(|| entry.path.to_string_lossy().replace('\\', "/"));

            if cache.contains(&unique_name) {
                bail!("project `{}` is listed twice in {}", unique_name, path.display());
            }

            let names = ProjectNames::new(entry.name.clone(), unique_name.clone(), full_path.clone());
            let spec = match (entry.kind, entry.spec) {
                (ProjectKind::Nominated, Some(spec)) => Some(complete_spec(spec, &root, &names)),
                (ProjectKind::Legacy, Some(_)) => {
                    tracing::warn!("ignoring specification of legacy project `{}`", names.name);
                    None
                }
                (_, None) => None,
            };
            cache.register(names.clone(), spec);

            let references_path = match &entry.package_references {
                Some(p) => fs::resolve_path(&root, p),
                None => full_path
                    .parent()
                    .unwrap_or(&root)
                    .join(PACKAGE_REFERENCES_FILE),
            };
            let references = Arc::new(PackageReferenceFile::new(references_path));
            let mutation = MutationCoordinator::new(references.clone(), metadata.clone());

            let project: Arc<dyn DependencyGraphProject> = match entry.kind {
                ProjectKind::Nominated => Arc::new(
                    NominatedProject::new(names.clone(), cache.spec_factory(&unique_name), mutation)?
                        .with_assets_file_name(config.assets_file_name())
                        .warn_unresolved(config.warn_unresolved()),
                ),
                ProjectKind::Legacy => Arc::new(LegacyProject::new(names.clone(), mutation)?),
            };

            tracing::debug!("loaded {} project `{}` at {}", entry.kind, names.name, full_path.display());
            projects.push(SolutionProject {
                names,
                references,
                project,
            });
        }

        Ok(Solution {
            path: path.to_path_buf(),
            root,
            cache,
            projects,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the solution file.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache(&self) -> &SolutionCache {
        &self.cache
    }

    /// Lookup over every project of the solution.
    pub fn lookup(&self) -> &dyn ProjectLookup {
        &self.cache
    }

    pub fn projects(&self) -> &[SolutionProject] {
        &self.projects
    }

    /// Find a project by name, unique name or path.
    pub fn project(&self, key: &str) -> Result<&SolutionProject> {
        let resolved = self
            .cache
            .find(key)
            .or_else(|| self.cache.find(&fs::resolve_path(&self.root, Path::new(key)).to_string_lossy()));

        let Some(names) = resolved else {
            bail!(
                "no project named `{}` in {}\nhelp: {}",
                key,
                self.path.display(),
                suggestions::UNKNOWN_PROJECT
            );
        };

        self.projects
            .iter()
            .find(|p| p.names.unique_name == names.unique_name)
            .with_context(|| format!("project `{}` is not loaded", names.name))
    }
}

/// Fill in what the host would put in a nominated specification.
fn complete_spec(mut spec: PackageSpec, root: &Path, names: &ProjectNames) -> PackageSpec {
    if spec.name.is_empty() {
        spec.name = names.name.as_str().into();
    }
    spec.restore_metadata.project_path = names.full_path.clone();
    if spec.restore_metadata.project_unique_name.is_none() {
        spec.restore_metadata.project_unique_name = Some(names.unique_name.clone());
    }
    if let Some(output) = spec.restore_metadata.output_path.take() {
        spec.restore_metadata.output_path = Some(fs::resolve_path(root, &output));
    }
    spec
}
