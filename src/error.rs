use std::path::PathBuf;
use thiserror::Error;

use crate::ops::RunReport;

#[derive(Debug, Error)]
pub enum ReplacerError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Configuration root must be a mapping, found {found}")]
    RootNotMapping { found: &'static str },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("No config file given; call .config_file() on the builder")]
    NoConfigFile,

    #[error("error getting variable {name}: Not found")]
    UnresolvedVariable { name: String },

    #[error("Unsupported value for '{key}': {kind} values cannot be substituted")]
    UnsupportedValueKind { key: String, kind: &'static str },

    #[error("Duplicate key '{0}' after flattening")]
    DuplicateKey(String),

    #[error("Invalid override '{0}' (expected key=value)")]
    InvalidOverride(String),

    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    #[error("Output for {path} would overwrite the template (does the name contain the marker?)")]
    OutputOverwritesTemplate { path: PathBuf },

    #[error("Output name for {path} is empty once the marker is removed")]
    EmptyOutputName { path: PathBuf },

    #[error("Output name '{name}' for {path} must be a plain file name")]
    InvalidOutputName { path: PathBuf, name: String },

    #[error("{output} is produced by both {first} and {second}")]
    OutputConflict {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        source: Box<ReplacerError>,
    },

    #[error("{failed} template(s) failed")]
    TemplatesFailed { failed: usize, report: RunReport },
}

impl ReplacerError {
    /// Attach the offending file's path to a failure.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ReplacerError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The variable name behind an unresolved-variable failure, looking
    /// through any file context.
    pub fn unresolved_name(&self) -> Option<&str> {
        match self {
            ReplacerError::UnresolvedVariable { name } => Some(name),
            ReplacerError::File { source, .. } => source.unresolved_name(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_variable_formats() {
        let err = ReplacerError::UnresolvedVariable {
            name: "database.url".into(),
        };
        assert!(err.to_string().contains("database.url"));
    }

    #[test]
    fn template_context_includes_path() {
        let err = ReplacerError::UnresolvedVariable {
            name: "port".into(),
        }
        .in_file("/srv/app/nginx.conf.template");
        let msg = err.to_string();
        assert!(msg.contains("nginx.conf.template"));
        assert!(msg.contains("port"));
        assert_eq!(err.unresolved_name(), Some("port"));
    }

    #[test]
    fn root_not_mapping_names_kind() {
        let err = ReplacerError::RootNotMapping { found: "sequence" };
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn output_conflict_names_both_templates() {
        let err = ReplacerError::OutputConflict {
            output: "foo".into(),
            first: "foo.template".into(),
            second: "{{x}}.template".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("foo.template") && msg.contains("{{x}}.template"), "{msg}");
    }

    #[test]
    fn no_config_file_formats() {
        let err = ReplacerError::NoConfigFile;
        assert!(err.to_string().contains("config_file"));
    }
}
