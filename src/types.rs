//! Policy knobs for a replacer run.
//!
//! Each enum controls one independent axis. Defaults reproduce the behavior of
//! the classic tool: YAML config, line-by-line substitution, arrays dropped
//! with a warning, and the first failure aborting the run.

use std::path::Path;

/// The file-name marker identifying templates, stripped from output names.
pub const DEFAULT_MARKER: &str = ".template";

/// What flattening does with a sequence (array) value.
///
/// Arrays are never addressable from a template. The policy only decides how
/// loudly that is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ArrayPolicy {
    /// Drop the key and log a warning naming it.
    #[default]
    Warn,
    /// Drop the key silently.
    Skip,
    /// Fail with [`UnsupportedValueKind`](crate::ReplacerError::UnsupportedValueKind).
    Error,
}

/// How template content is handed to the substitution engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkMode {
    /// Substitute each line on its own. Placeholders cannot span lines, every
    /// output line ends with `\n`, and `\r\n` becomes `\n`.
    #[default]
    Lines,
    /// Substitute the whole file as one block. Placeholders may span lines and
    /// the content is otherwise preserved byte for byte.
    Whole,
}

/// What a run does when one template fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing template.
    #[default]
    Abort,
    /// Record the failure, continue with the remaining templates, and fail at
    /// the end.
    KeepGoing,
}

/// An operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Render every template in the workspace.
    Run,
    /// Print the flattened variables instead of rendering.
    List { json: bool },
}

/// Config document syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension. Anything unrecognized is read
    /// as YAML.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}
