//! Project-to-project references of a specification.

use crate::core::PackageSpec;
use crate::util::NameSet;

/// Names of the sibling projects a specification references, across all frameworks.
///
/// Per-framework granularity is dropped: the closure walk works on project
/// identity only.
pub fn project_references(spec: Option<&PackageSpec>) -> NameSet {
    spec.into_iter()
        .flat_map(PackageSpec::dependencies)
        .filter(|(_, dep)| dep.is_project())
        .map(|(_, dep)| dep.name().clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LibraryDependency, TargetFrameworkInformation, VersionRange};

    #[test]
    fn test_collects_across_frameworks_ignoring_case() {
        let spec = PackageSpec::new("P", "/p")
            .with_framework(
                TargetFrameworkInformation::new("net45".parse().unwrap())
                    .with_dependency(LibraryDependency::project("ProjectB"))
                    .with_dependency(LibraryDependency::package("PackageA", VersionRange::all())),
            )
            .with_framework(
                TargetFrameworkInformation::new("net472".parse().unwrap())
                    .with_dependency(LibraryDependency::project("projectb"))
                    .with_dependency(LibraryDependency::project("ProjectC")),
            );

        let names: Vec<_> = project_references(Some(&spec))
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["ProjectB", "ProjectC"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(project_references(None).is_empty());
        assert!(project_references(Some(&PackageSpec::new("P", "/p"))).is_empty());
    }
}
