//! Config loading and template discovery.
//!
//! # Loading
//!
//! [`load_config`] reads one document and parses it according to its
//! [`ConfigFormat`]. Several documents can be layered by the caller with
//! [`deep_merge`](crate::merge::deep_merge); later files win.
//!
//! # Discovery
//!
//! [`discover_templates`] walks the workspace recursively and returns every
//! file whose name contains the marker. Entries are visited sorted by file
//! name so runs are reproducible. Symlinks are not followed: a symlinked
//! template or directory is skipped, so a run never writes outside the
//! workspace through a link. Everything else is logged at debug level and
//! skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ReplacerError;
use crate::types::ConfigFormat;
use crate::value::Value;

/// Read and parse a config document.
pub fn load_config(path: &Path) -> Result<Value, ReplacerError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReplacerError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&content, ConfigFormat::from_path(path)).map_err(|e| match e {
        ReplacerError::Parse { reason, .. } => ReplacerError::Parse {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Parse config text in the given format. No I/O happens here.
///
/// Parse errors carry an empty path; [`load_config`] fills it in.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Value, ReplacerError> {
    let parse_err = |reason: String| ReplacerError::Parse {
        path: PathBuf::new(),
        reason,
    };

    match format {
        ConfigFormat::Toml => {
            let table: toml::Table =
                toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            Value::try_from(toml::Value::Table(table))
        }
        ConfigFormat::Yaml => {
            if content.trim().is_empty() {
                return Ok(Value::default());
            }
            let doc: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            // A document with no content (blank or comments only) is null.
            if doc.is_null() {
                return Ok(Value::default());
            }
            Value::try_from(doc)
        }
        ConfigFormat::Json => {
            let doc: serde_json::Value =
                serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            Value::try_from(doc)
        }
    }
}

/// Find every template under `workspace`.
pub fn discover_templates(workspace: &Path, marker: &str) -> Result<Vec<PathBuf>, ReplacerError> {
    let mut found = Vec::new();

    let walker = WalkDir::new(workspace)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| ReplacerError::Walk {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| workspace.to_path_buf()),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_template(&name, marker) {
            tracing::debug!(path = %entry.path().display(), "found template");
            found.push(entry.into_path());
        } else {
            tracing::debug!(path = %entry.path().display(), "skipped");
        }
    }

    Ok(found)
}

/// A file is a template when its name contains the marker.
pub fn is_template(file_name: &str, marker: &str) -> bool {
    !marker.is_empty() && file_name.contains(marker)
}

/// Write rendered output. Parent directories must already exist.
pub fn write_output(path: &Path, content: &str) -> Result<(), ReplacerError> {
    std::fs::write(path, content).map_err(|e| ReplacerError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use crate::value::Scalar;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vars.yml");
        fs::write(&path, "app:\n  port: 3000\n").unwrap();
        let flat = flatten(&load_config(&path).unwrap()).unwrap();
        assert_eq!(flat["app.port"], Scalar::Integer(3000));
    }

    #[test]
    fn load_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vars.toml");
        fs::write(&path, "[app]\nport = 3000\nrate = 0.25\n").unwrap();
        let flat = flatten(&load_config(&path).unwrap()).unwrap();
        assert_eq!(flat["app.port"], Scalar::Integer(3000));
        assert_eq!(flat["app.rate"], Scalar::Float(0.25));
    }

    #[test]
    fn load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vars.json");
        fs::write(&path, r#"{"app": {"name": "demo", "debug": true}}"#).unwrap();
        let flat = flatten(&load_config(&path).unwrap()).unwrap();
        assert_eq!(flat["app.name"], Scalar::String("demo".into()));
        assert_eq!(flat["app.debug"], Scalar::Boolean(true));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("absent.yml"));
        assert!(matches!(result, Err(ReplacerError::Io { .. })));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        match load_config(&path) {
            Err(ReplacerError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_yaml_is_empty_mapping() {
        assert_eq!(parse_config("  \n", ConfigFormat::Yaml).unwrap(), Value::default());
    }

    #[test]
    fn comment_only_yaml_is_empty_mapping() {
        let content = "# nothing here yet\n# port: 80\n";
        let value = parse_config(content, ConfigFormat::Yaml).unwrap();
        assert_eq!(value, Value::default());
        assert!(flatten(&value).unwrap().is_empty());
    }

    #[test]
    fn yaml_scalar_root_loads_but_fails_flatten() {
        let value = parse_config("just a string", ConfigFormat::Yaml).unwrap();
        assert!(matches!(
            flatten(&value),
            Err(ReplacerError::RootNotMapping { found: "string" })
        ));
    }

    #[test]
    fn discovers_templates_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("conf").join("nginx");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("app.env.template"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::write(nested.join("site.template.conf"), "").unwrap();
        fs::write(nested.join("mime.types"), "").unwrap();

        let found = discover_templates(dir.path(), ".template").unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("app.env.template"),
                nested.join("site.template.conf"),
            ]
        );
    }

    #[test]
    fn directories_with_marker_are_not_templates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("x.template")).unwrap();
        let found = discover_templates(dir.path(), ".template").unwrap();
        assert!(found.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_templates_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("shared.template");
        fs::write(&target, "").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.template")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked_dir")).unwrap();
        fs::write(dir.path().join("real.template"), "").unwrap();

        let found = discover_templates(dir.path(), ".template").unwrap();
        assert_eq!(found, vec![dir.path().join("real.template")]);
    }

    #[test]
    fn missing_workspace_is_walk_error() {
        let dir = TempDir::new().unwrap();
        let result = discover_templates(&dir.path().join("nope"), ".template");
        assert!(matches!(result, Err(ReplacerError::Walk { .. })));
    }

    #[test]
    fn empty_marker_matches_nothing() {
        assert!(!is_template("anything", ""));
        assert!(is_template("a.template", ".template"));
    }
}
