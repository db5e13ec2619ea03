//! Projects whose specification is nominated by the host.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::{PackageIdentity, PackageReference, PackageSpec, ProjectKind, ProjectNames};
use crate::project::{
    require_full_path, DependencyGraphProject, InstallOutcome, MutationCoordinator, PackageContent,
    PackageMetadata, ProjectError, ScriptExecutor, SpecFactory, UninstallOutcome,
};
use crate::resolver::{reduce_package_references, ClosureBuilder, ProjectLookup, RestoreGraphClosure};
use crate::util::cancel;
use crate::util::config::DEFAULT_ASSETS_FILE_NAME;

const INIT_SCRIPT: &str = "tools/init.ps1";

/// A project backed by a host-nominated specification.
pub struct NominatedProject {
    names: ProjectNames,
    spec_factory: SpecFactory,
    mutation: MutationCoordinator,
    script_executor: Option<Arc<dyn ScriptExecutor>>,
    assets_file_name: String,
    warn_unresolved: bool,
}

impl NominatedProject {
    pub fn new(
        names: ProjectNames,
        spec_factory: SpecFactory,
        mutation: MutationCoordinator,
    ) -> Result<Self, ProjectError> {
        require_full_path(&names)?;
        Ok(NominatedProject {
            names,
            spec_factory,
            mutation,
            script_executor: None,
            assets_file_name: DEFAULT_ASSETS_FILE_NAME.to_string(),
            warn_unresolved: true,
        })
    }

    pub fn with_script_executor(mut self, executor: Arc<dyn ScriptExecutor>) -> Self {
        self.script_executor = Some(executor);
        self
    }

    pub fn with_assets_file_name(mut self, name: impl Into<String>) -> Self {
        self.assets_file_name = name.into();
        self
    }

    pub fn warn_unresolved(mut self, warn: bool) -> Self {
        self.warn_unresolved = warn;
        self
    }
}

#[async_trait]
impl DependencyGraphProject for NominatedProject {
    fn kind(&self) -> ProjectKind {
        ProjectKind::Nominated
    }

    fn names(&self) -> &ProjectNames {
        &self.names
    }

    fn package_spec(&self) -> Option<PackageSpec> {
        (self.spec_factory)()
    }

    async fn installed_packages(&self, token: &CancellationToken) -> Result<Vec<PackageReference>, ProjectError> {
        cancel::check(token)?;
        Ok(reduce_package_references(self.package_spec().as_ref()))
    }

    async fn project_reference_closure(
        &self,
        lookup: &dyn ProjectLookup,
        token: &CancellationToken,
    ) -> Result<RestoreGraphClosure, ProjectError> {
        let spec = self.package_spec();
        let closure = ClosureBuilder::new(lookup)
            .warn_unresolved(self.warn_unresolved)
            .build(self.names.full_path(), spec.as_ref(), token)?;
        Ok(closure)
    }

    async fn install_package(
        &self,
        identity: &PackageIdentity,
        content: PackageContent,
        token: &CancellationToken,
    ) -> Result<InstallOutcome, ProjectError> {
        self.mutation.install(identity, content, token).await
    }

    async fn uninstall_package(
        &self,
        identity: &PackageIdentity,
        token: &CancellationToken,
    ) -> Result<UninstallOutcome, ProjectError> {
        self.mutation.uninstall(identity, token).await
    }

    async fn execute_init_script(
        &self,
        identity: &PackageIdentity,
        package_install_path: &Path,
        token: &CancellationToken,
    ) -> Result<bool, ProjectError> {
        let Some(executor) = &self.script_executor else {
            return Ok(false);
        };

        cancel::check(token)?;
        let metadata = self
            .mutation
            .metadata()
            .read_folder(package_install_path)
            .map_err(|source| ProjectError::Metadata {
                package: identity.id().to_string(),
                source,
            })?;

        let Some(script) = find_init_script(&metadata) else {
            tracing::debug!("{} has no init script", identity);
            return Ok(false);
        };

        tracing::debug!("running {} for {}", script, identity);
        cancel::cancellable(token, executor.execute(identity, package_install_path, &script))
            .await?
            .map_err(|e| ProjectError::host("run init script for", identity.id().as_str(), e))
    }

    fn assets_file(&self) -> Option<PathBuf> {
        let spec = self.package_spec()?;
        let output = spec.restore_metadata.output_path?;
        Some(output.join(&self.assets_file_name))
    }
}

/// The init script of the framework-independent tool group, with `/` separators.
fn find_init_script(metadata: &PackageMetadata) -> Option<String> {
    let group = metadata.tool_items.iter().find(|group| group.framework.is_any())?;
    group
        .items
        .iter()
        .map(|item| item.replace('\\', "/"))
        .find(|item| {
            item.get(..INIT_SCRIPT.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(INIT_SCRIPT))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use semver::Version;

    use crate::core::{TargetFramework, TargetFrameworkInformation, VersionRange, LibraryDependency};
    use crate::project::FrameworkItems;
    use crate::test_support::{
        project_spec, InMemoryDependencySet, RecordingScriptExecutor, StaticLookup, StaticMetadataReader,
    };

    fn names() -> ProjectNames {
        ProjectNames::new("App", "App/App.csproj", "/src/App/App.csproj")
    }

    fn coordinator(metadata: StaticMetadataReader) -> MutationCoordinator {
        MutationCoordinator::new(Arc::new(InMemoryDependencySet::new()), Arc::new(metadata))
    }

    fn project(spec: Option<PackageSpec>) -> NominatedProject {
        let factory: SpecFactory = Arc::new(move || spec.clone());
        NominatedProject::new(names(), factory, coordinator(StaticMetadataReader::new(false))).unwrap()
    }

    fn app_spec() -> PackageSpec {
        PackageSpec::new("App", "/src/App/App.csproj")
            .with_output_path("/src/App/obj")
            .with_framework(
                TargetFrameworkInformation::new("net472".parse().unwrap())
                    .with_dependency(LibraryDependency::package("PackageA", "1.2".parse::<VersionRange>().unwrap()))
                    .with_dependency(LibraryDependency::project("Lib")),
            )
            .with_framework(
                TargetFrameworkInformation::new("net45".parse().unwrap())
                    .with_dependency(LibraryDependency::package("PackageA", "1.0".parse::<VersionRange>().unwrap())),
            )
    }

    #[test]
    fn test_missing_full_path() {
        let factory: SpecFactory = Arc::new(|| None);
        let result = NominatedProject::new(
            ProjectNames::new("App", "App", ""),
            factory,
            coordinator(StaticMetadataReader::new(false)),
        );
        assert!(matches!(result, Err(ProjectError::MissingProjectPath)));
    }

    #[test]
    fn test_spec_is_read_through_factory_every_time() {
        let current = Arc::new(Mutex::new(None::<PackageSpec>));
        let source = current.clone();
        let factory: SpecFactory = Arc::new(move || source.lock().unwrap().clone());
        let project =
            NominatedProject::new(names(), factory, coordinator(StaticMetadataReader::new(false))).unwrap();

        assert!(!project.is_restore_required(None));
        assert!(project.package_specs_for_restore().is_empty());

        *current.lock().unwrap() = Some(app_spec());
        assert!(project.is_restore_required(None));
        assert_eq!(project.package_specs_for_restore().len(), 1);
    }

    #[test]
    fn test_last_modified_is_current_time() {
        let project = project(None);
        let before = std::time::SystemTime::now();
        assert!(project.last_modified() >= before);
        assert!(project.descriptor().last_modified >= before);
    }

    #[tokio::test]
    async fn test_installed_packages_reduced() {
        let project = project(Some(app_spec()));
        let installed = project.installed_packages(&CancellationToken::new()).await.unwrap();

        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].identity().version(), Some(&Version::new(1, 0, 0)));
    }

    #[tokio::test]
    async fn test_closure_rooted_at_full_path() {
        let lookup = StaticLookup::new().with("Lib", "/src/Lib/Lib.csproj", project_spec("Lib", "/src/Lib/Lib.csproj", &[]));
        let project = project(Some(app_spec()));

        let closure = project
            .project_reference_closure(&lookup, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(closure.len(), 2);
        assert_eq!(closure.root().unwrap().unique_name().as_str(), "/src/App/App.csproj");
    }

    #[tokio::test]
    async fn test_closure_without_spec_is_empty() {
        let project = project(None);
        let closure = project
            .project_reference_closure(&StaticLookup::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(closure.is_empty());
    }

    #[test]
    fn test_assets_file() {
        assert_eq!(
            project(Some(app_spec())).assets_file(),
            Some(PathBuf::from("/src/App/obj/project.assets.json"))
        );
        assert_eq!(
            project(Some(app_spec())).with_assets_file_name("assets.json").assets_file(),
            Some(PathBuf::from("/src/App/obj/assets.json"))
        );
        assert_eq!(project(Some(PackageSpec::new("App", "/src/App/App.csproj"))).assets_file(), None);
        assert_eq!(project(None).assets_file(), None);
    }

    #[test]
    fn test_json_config_path_unsupported() {
        let err = project(None).json_config_path().unwrap_err();
        assert!(matches!(err, ProjectError::Unsupported { kind: ProjectKind::Nominated, .. }));
    }

    // ------------------------------------------------------------------------
    // Init scripts
    // ------------------------------------------------------------------------

    fn tool_metadata(groups: Vec<(TargetFramework, Vec<&str>)>) -> StaticMetadataReader {
        StaticMetadataReader::new(false).with_metadata(PackageMetadata {
            development_dependency: false,
            tool_items: groups
                .into_iter()
                .map(|(framework, items)| FrameworkItems {
                    framework,
                    items: items.into_iter().map(String::from).collect(),
                })
                .collect(),
        })
    }

    #[tokio::test]
    async fn test_init_script_runs_from_any_group() {
        let executor = Arc::new(RecordingScriptExecutor::new());
        let metadata = tool_metadata(vec![
            ("net45".parse().unwrap(), vec!["tools/net45/init.ps1"]),
            (TargetFramework::any(), vec!["tools/readme.txt", "Tools\\Init.ps1"]),
        ]);
        let factory: SpecFactory = Arc::new(|| None);
        let project = NominatedProject::new(names(), factory, coordinator(metadata))
            .unwrap()
            .with_script_executor(executor.clone());

        let identity = PackageIdentity::new("Tool", Some(Version::new(1, 0, 0)));
        let ran = project
            .execute_init_script(&identity, Path::new("/packages/tool/1.0.0"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(ran);
        assert_eq!(executor.calls(), vec!["Tools/Init.ps1".to_string()]);
    }

    #[tokio::test]
    async fn test_init_script_absent() {
        let executor = Arc::new(RecordingScriptExecutor::new());
        let metadata = tool_metadata(vec![("net45".parse().unwrap(), vec!["tools/init.ps1"])]);
        let factory: SpecFactory = Arc::new(|| None);
        let project = NominatedProject::new(names(), factory, coordinator(metadata))
            .unwrap()
            .with_script_executor(executor.clone());

        let identity = PackageIdentity::new("Tool", None);
        let ran = project
            .execute_init_script(&identity, Path::new("/packages/tool"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(!ran);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_init_script_without_executor() {
        let identity = PackageIdentity::new("Tool", None);
        let ran = project(None)
            .execute_init_script(&identity, Path::new("/packages/tool"), &CancellationToken::new())
            .await
            .unwrap();
        assert!(!ran);
    }
}
