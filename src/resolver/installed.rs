//! Installed-package view of a specification.
//!
//! A package may be declared under several target frameworks, possibly with
//! different version ranges. The installed view keeps one reference per
//! package id: the one declared under the framework that sorts first in the
//! framework precedence order.

use std::collections::HashMap;

use crate::core::{LibraryDependency, PackageIdentity, PackageReference, PackageSpec, TargetFramework};
use crate::util::Name;

/// Collapse a specification's package dependencies into one reference per package.
///
/// Groups are returned in order of first appearance. An absent specification
/// has no installed packages.
pub fn reduce_package_references(spec: Option<&PackageSpec>) -> Vec<PackageReference> {
    let Some(spec) = spec else {
        return Vec::new();
    };

    let mut references: Vec<PackageReference> = Vec::new();
    let mut by_id: HashMap<Name, usize> = HashMap::new();

    for (framework, dependency) in spec.dependencies().filter(|(_, dep)| dep.is_package()) {
        let candidate = to_package_reference(dependency, framework);
        match by_id.get(dependency.name()) {
            Some(&index) => {
                // Equal frameworks keep the earlier declaration.
                if candidate.target_framework() < references[index].target_framework() {
                    references[index] = candidate;
                }
            }
            None => {
                by_id.insert(dependency.name().clone(), references.len());
                references.push(candidate);
            }
        }
    }

    references
}

fn to_package_reference(dependency: &LibraryDependency, framework: &TargetFramework) -> PackageReference {
    let identity = PackageIdentity::new(
        dependency.name().clone(),
        dependency.version_range().min_version().cloned(),
    );
    PackageReference::new(identity, framework.clone())
}
