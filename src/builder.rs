use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::env;
use crate::error::ReplacerError;
use crate::file;
use crate::flatten::FlatMap;
use crate::ops::{self, ConfigResult, Outcome, RunReport};
use crate::resolve::{self, ResolveInput};
use crate::template;
use crate::types::{Action, ArrayPolicy, ChunkMode, DEFAULT_MARKER, FailurePolicy};
use crate::value::Value;

/// Entry point for building a replacer run.
pub struct Replacer;

impl Replacer {
    pub fn builder() -> ReplacerBuilder {
        ReplacerBuilder::new()
    }
}

/// Builder collecting where variables come from, where templates live, and
/// how failures are handled.
///
/// Variable layers, lowest priority first:
///
/// - **Config files**: [`config_file()`](Self::config_file), in call order.
/// - **Environment**: [`env_prefix()`](Self::env_prefix), off unless set.
/// - **Overrides**: [`set()`](Self::set) and [`overrides()`](Self::overrides).
#[derive(Debug, Clone)]
pub struct ReplacerBuilder {
    config_files: Vec<PathBuf>,
    workspace: PathBuf,
    marker: String,
    array_policy: ArrayPolicy,
    chunk_mode: ChunkMode,
    failure_policy: FailurePolicy,
    env_prefix: Option<String>,
    overrides: Vec<(String, Value)>,
    dry_run: bool,
}

impl ReplacerBuilder {
    fn new() -> Self {
        Self {
            config_files: Vec::new(),
            workspace: PathBuf::from("."),
            marker: DEFAULT_MARKER.to_string(),
            array_policy: ArrayPolicy::default(),
            chunk_mode: ChunkMode::default(),
            failure_policy: FailurePolicy::default(),
            env_prefix: None,
            overrides: Vec::new(),
            dry_run: false,
        }
    }

    /// Add a config document. Later files override earlier ones key-by-key.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_files.push(path.into());
        self
    }

    /// Directory searched recursively for templates (default: `.`).
    pub fn workspace(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace = dir.into();
        self
    }

    /// File-name marker identifying templates (default: `.template`).
    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    pub fn array_policy(mut self, policy: ArrayPolicy) -> Self {
        self.array_policy = policy;
        self
    }

    pub fn chunk_mode(mut self, mode: ChunkMode) -> Self {
        self.chunk_mode = mode;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Read `{PREFIX}__SECTION__KEY` environment variables as a layer above
    /// the config files.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Set a single dotted key at the highest priority.
    pub fn set<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    /// Add several overrides. Later entries take precedence.
    pub fn overrides(mut self, entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.overrides.extend(entries);
        self
    }

    /// Render everything but write nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build the `ResolveInput` from current builder state.
    fn build_input(&self) -> Result<ResolveInput, ReplacerError> {
        let documents = self
            .config_files
            .iter()
            .map(|path| Ok((path.clone(), file::load_config(path)?)))
            .collect::<Result<Vec<_>, ReplacerError>>()?;
        let env_vars = match self.env_prefix {
            Some(_) => env::utf8_vars(std::env::vars_os()),
            None => Vec::new(),
        };

        Ok(ResolveInput {
            documents,
            env_vars,
            env_prefix: self.env_prefix.clone(),
            overrides: self.overrides.clone(),
            array_policy: self.array_policy,
        })
    }

    /// Load every layer and flatten it into the variables templates see.
    pub fn load_variables(&self) -> Result<FlatMap, ReplacerError> {
        let vars = resolve::resolve(self.build_input()?)?;
        tracing::debug!(count = vars.len(), "variables loaded");
        Ok(vars)
    }

    /// The flattened variables, as `key = value` lines or a JSON object.
    pub fn list(&self, json: bool) -> Result<ConfigResult, ReplacerError> {
        let vars = self.load_variables()?;
        if json {
            ops::list_json(&vars)
        } else {
            Ok(ops::list_values(&vars))
        }
    }

    /// Render every template under the workspace.
    ///
    /// With [`FailurePolicy::Abort`] the first failure is returned with the
    /// template's path attached. With [`FailurePolicy::KeepGoing`] failures
    /// are collected and reported through
    /// [`ReplacerError::TemplatesFailed`].
    pub fn run(&self) -> Result<RunReport, ReplacerError> {
        let vars = self.load_variables()?;
        self.run_with(&vars)
    }

    /// Like [`run`](Self::run) but with variables the caller already loaded.
    pub fn run_with(&self, vars: &FlatMap) -> Result<RunReport, ReplacerError> {
        let templates = file::discover_templates(&self.workspace, &self.marker)?;
        tracing::info!(
            workspace = %self.workspace.display(),
            templates = templates.len(),
            "rendering templates"
        );

        let mut report = RunReport::default();
        // output → template that produced it
        let mut outputs = HashMap::new();
        for path in templates {
            match self.process(vars, &path, &mut outputs) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => match self.failure_policy {
                    FailurePolicy::Abort => return Err(e.in_file(path)),
                    FailurePolicy::KeepGoing => {
                        tracing::warn!(template = %path.display(), error = %e, "template failed");
                        report.outcomes.push(Outcome::Failed {
                            template: path,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        let failed = report.failed();
        if failed > 0 {
            return Err(ReplacerError::TemplatesFailed { failed, report });
        }
        Ok(report)
    }

    fn process(
        &self,
        vars: &FlatMap,
        path: &Path,
        outputs: &mut HashMap<PathBuf, PathBuf>,
    ) -> Result<Outcome, ReplacerError> {
        let rendered = template::render_file(vars, path, &self.marker, self.chunk_mode)?;
        if let Some(first) = outputs.get(&rendered.output) {
            return Err(ReplacerError::OutputConflict {
                output: rendered.output,
                first: first.clone(),
                second: rendered.template,
            });
        }
        outputs.insert(rendered.output.clone(), rendered.template.clone());

        if self.dry_run {
            tracing::info!(output = %rendered.output.display(), "would create");
            return Ok(Outcome::WouldCreate {
                template: rendered.template,
                output: rendered.output,
            });
        }

        file::write_output(&rendered.output, &rendered.content)?;
        tracing::info!(output = %rendered.output.display(), "created");
        Ok(Outcome::Created {
            template: rendered.template,
            output: rendered.output,
        })
    }

    /// Handle an [`Action`] and print the result to stdout.
    pub fn handle_and_print(&self, action: &Action) -> Result<(), ReplacerError> {
        let result = self.handle(action)?;
        if !matches!(&result, ConfigResult::Report(r) if r.is_empty()) {
            println!("{result}");
        }
        Ok(())
    }

    /// Handle an [`Action`] (run / list).
    pub fn handle(&self, action: &Action) -> Result<ConfigResult, ReplacerError> {
        match action {
            Action::Run => self.run().map(ConfigResult::Report),
            Action::List { json } => self.list(*json),
        }
    }
}
