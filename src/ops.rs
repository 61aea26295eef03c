//! Run results and variable listing.
//!
//! Provides [`RunReport`] (what a run did to each template) and the
//! [`ConfigResult`] enum that callers use to display results.

use std::fmt;
use std::path::PathBuf;

use crate::error::ReplacerError;
use crate::flatten::FlatMap;

/// What happened to one template.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Output written.
    Created { template: PathBuf, output: PathBuf },
    /// Dry run: output rendered but not written.
    WouldCreate { template: PathBuf, output: PathBuf },
    /// Rendering failed; only recorded when the run keeps going.
    Failed { template: PathBuf, error: String },
}

/// Outcomes of a run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub outcomes: Vec<Outcome>,
}

impl RunReport {
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Failed { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created { output, .. } => write!(f, "Created {}", output.display()),
            Outcome::WouldCreate { output, .. } => write!(f, "Would create {}", output.display()),
            Outcome::Failed { template, error } => {
                write!(f, "Failed {}: {error}", template.display())
            }
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}

/// Result of an operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// Templates processed by a run.
    Report(RunReport),
    /// All flattened variables as `key = value` pairs.
    Listing { entries: Vec<(String, String)> },
    /// All flattened variables as a JSON object.
    Json(String),
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Report(report) => write!(f, "{report}"),
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::Json(json) => write!(f, "{json}"),
        }
    }
}

/// List flattened variables in the same form they are substituted.
pub fn list_values(vars: &FlatMap) -> ConfigResult {
    let entries = vars
        .iter()
        .map(|(key, value)| (key.clone(), value.render()))
        .collect();
    ConfigResult::Listing { entries }
}

/// List flattened variables as pretty-printed JSON with native value types.
pub fn list_json(vars: &FlatMap) -> Result<ConfigResult, ReplacerError> {
    let json = serde_json::to_string_pretty(vars).map_err(|e| ReplacerError::InvalidConfig {
        reason: e.to_string(),
    })?;
    Ok(ConfigResult::Json(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{SERVICE_YAML, yaml};
    use crate::flatten::flatten;

    fn service_vars() -> FlatMap {
        flatten(&yaml(SERVICE_YAML)).unwrap()
    }

    #[test]
    fn list_values_includes_all_scalar_keys() {
        match list_values(&service_vars()) {
            ConfigResult::Listing { entries } => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(
                    keys,
                    vec![
                        "database.host",
                        "service.name",
                        "service.port",
                        "service.timeout",
                        "service.tls"
                    ]
                );
            }
            other => panic!("Expected Listing, got {other:?}"),
        }
    }

    #[test]
    fn listing_shows_rendered_values() {
        let display = list_values(&service_vars()).to_string();
        assert!(display.contains("service.port = 8443"));
        assert!(display.contains("service.timeout = 2.5E+00"));
        assert!(display.contains("service.tls = true"));
    }

    #[test]
    fn json_listing_keeps_types() {
        let result = list_json(&service_vars()).unwrap();
        let ConfigResult::Json(json) = result else {
            panic!("Expected Json");
        };
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["service.port"], serde_json::json!(8443));
        assert_eq!(parsed["service.tls"], serde_json::json!(true));
        assert_eq!(parsed["service.timeout"], serde_json::json!(2.5));
    }

    #[test]
    fn report_display_format() {
        let report = RunReport {
            outcomes: vec![
                Outcome::Created {
                    template: "a.template".into(),
                    output: "a".into(),
                },
                Outcome::WouldCreate {
                    template: "b.template".into(),
                    output: "b".into(),
                },
                Outcome::Failed {
                    template: "c.template".into(),
                    error: "error getting variable x: Not found".into(),
                },
            ],
        };
        assert_eq!(
            report.to_string(),
            "Created a\nWould create b\nFailed c.template: error getting variable x: Not found"
        );
        assert_eq!(report.failed(), 1);
    }
}
