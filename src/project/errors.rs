//! Project operation errors.

use std::error::Error as StdError;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::ProjectKind;
use crate::util::cancel::Cancelled;
use crate::util::diagnostic::Diagnostic;

/// Boxed error returned by a host service.
pub type HostError = Box<dyn StdError + Send + Sync>;

/// Error from a project operation.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ProjectError {
    #[error("package content for `{package}` is not seekable")]
    #[diagnostic(
        code(restore_graph::install::non_seekable),
        help("Pass the package as a file path instead of `-`")
    )]
    NonSeekableSource { package: String },

    #[error("no version given for `{package}`")]
    #[diagnostic(
        code(restore_graph::install::missing_version),
        help("Install an exact package version")
    )]
    MissingVersion { package: String },

    #[error("project has no full path")]
    #[diagnostic(
        code(restore_graph::project::missing_path),
        help("Set `path` for the project in Restore.toml")
    )]
    MissingProjectPath,

    #[error("`{operation}` is not supported for {kind} projects")]
    #[diagnostic(
        code(restore_graph::project::unsupported),
        help("{kind} projects do not nominate a specification")
    )]
    Unsupported {
        operation: &'static str,
        kind: ProjectKind,
    },

    #[error("failed to {action} `{package}`")]
    #[diagnostic(code(restore_graph::host::service))]
    HostService {
        action: &'static str,
        package: String,
        #[source]
        source: HostError,
    },

    #[error("failed to read metadata for `{package}`")]
    #[diagnostic(code(restore_graph::host::metadata))]
    Metadata {
        package: String,
        #[source]
        source: HostError,
    },

    #[error(transparent)]
    #[diagnostic(code(restore_graph::cancelled))]
    Cancelled(#[from] Cancelled),
}

impl ProjectError {
    pub(crate) fn host(action: &'static str, package: impl Into<String>, source: impl Into<HostError>) -> Self {
        ProjectError::HostService {
            action,
            package: package.into(),
            source: source.into(),
        }
    }

    pub(crate) fn unsupported(operation: &'static str, kind: ProjectKind) -> Self {
        ProjectError::Unsupported { operation, kind }
    }

    /// Whether the caller may retry the operation later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProjectError::HostService { .. } | ProjectError::Metadata { .. })
    }

    /// The `help` text of this error's diagnostic.
    pub fn suggestion(&self) -> Option<String> {
        MietteDiagnostic::help(self).map(|help| help.to_string())
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());
        if let Some(help) = self.suggestion() {
            diag = diag.with_suggestion(help);
        }
        match self {
            ProjectError::HostService { source, .. } | ProjectError::Metadata { source, .. } => {
                diag.with_context(source.to_string())
            }
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_keeps_source() {
        let err = ProjectError::host("add", "PackageA", anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "failed to add `PackageA`");
        assert!(err.is_recoverable());
        assert_eq!(StdError::source(&err).map(|s| s.to_string()), Some("disk full".to_string()));

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("disk full"));
    }

    #[test]
    fn test_unsupported_names_kind() {
        let err = ProjectError::unsupported("json_config_path", ProjectKind::Legacy);
        assert_eq!(err.to_string(), "`json_config_path` is not supported for legacy projects");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_diagnostic_uses_help() {
        let errors = [
            ProjectError::NonSeekableSource {
                package: "PackageA".to_string(),
            },
            ProjectError::MissingVersion {
                package: "PackageA".to_string(),
            },
            ProjectError::MissingProjectPath,
            ProjectError::unsupported("json_config_path", ProjectKind::Legacy),
            ProjectError::host("add", "PackageA", "disk full"),
        ];

        for err in &errors {
            let help = MietteDiagnostic::help(err).map(|h| h.to_string());
            assert_eq!(err.to_diagnostic().suggestions, help.into_iter().collect::<Vec<_>>());
        }

        let output = errors[0].to_diagnostic().format(false);
        assert!(output.contains("instead of `-`"));
        assert_eq!(
            errors[3].suggestion().as_deref(),
            Some("legacy projects do not nominate a specification")
        );
        assert!(errors[4].suggestion().is_none());
    }

    #[test]
    fn test_cancelled_is_transparent() {
        let err: ProjectError = Cancelled.into();
        assert_eq!(err.to_string(), "operation cancelled");
    }
}
