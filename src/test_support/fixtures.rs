//! Test fixtures for common test scenarios.
//!
//! Specification builders and sample `Restore.toml` solutions.

use std::path::{Path, PathBuf};

use crate::core::{LibraryDependency, PackageSpec, TargetFrameworkInformation};

/// A nominated solution with a three-project chain, a dangling reference and
/// a legacy project.
///
/// App references Lib (and the unknown `Missing.Project`), Lib references
/// Core, and Core has not been nominated yet.
pub const SAMPLE_SOLUTION: &str = r#"
[[projects]]
name = "App"
path = "src/App/App.csproj"

[projects.spec.restore]
output-path = "src/App/obj"

[[projects.spec.frameworks]]
framework = "net472"
dependencies = [
    { name = "Newtonsoft.Json", version = "13.0.1" },
    { name = "Lib", type = "project" },
    { name = "Missing.Project", type = "project" },
]

[[projects.spec.frameworks]]
framework = "net45"
dependencies = [{ name = "Newtonsoft.Json", version = "12.0.1" }]

[[projects]]
name = "Lib"
path = "src/Lib/Lib.csproj"

[projects.spec.restore]
output-path = "src/Lib/obj"

[[projects.spec.frameworks]]
framework = "netstandard2.0"
dependencies = [
    { name = "Serilog", version = "2.10" },
    { name = "Core", type = "project" },
]

[[projects]]
name = "Core"
path = "src/Core/Core.csproj"

[[projects]]
name = "Legacy"
path = "src/Legacy/Legacy.csproj"
kind = "legacy"
"#;

/// Two nominated projects referencing each other.
pub const CYCLIC_SOLUTION: &str = r#"
[[projects]]
name = "P"
path = "P/P.csproj"

[[projects.spec.frameworks]]
framework = "net472"
dependencies = [{ name = "Q", type = "project" }]

[[projects]]
name = "Q"
path = "Q/Q.csproj"

[[projects.spec.frameworks]]
framework = "net472"
dependencies = [{ name = "P", type = "project" }]
"#;

/// A net472 specification whose only dependencies are the given projects.
pub fn project_spec(name: &str, path: impl Into<PathBuf>, references: &[&str]) -> PackageSpec {
    let mut framework = TargetFrameworkInformation::new("net472".parse().unwrap());
    for reference in references {
        framework = framework.with_dependency(LibraryDependency::project(*reference));
    }
    PackageSpec::new(name, path).with_framework(framework)
}

/// Write [`SAMPLE_SOLUTION`] into `dir` and return the solution file path.
pub fn write_solution(dir: &Path) -> PathBuf {
    write_file(dir, SAMPLE_SOLUTION)
}

/// Write [`CYCLIC_SOLUTION`] into `dir` and return the solution file path.
pub fn write_cyclic_solution(dir: &Path) -> PathBuf {
    write_file(dir, CYCLIC_SOLUTION)
}

fn write_file(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("Restore.toml");
    std::fs::write(&path, contents).unwrap();
    path
}
