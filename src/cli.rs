//! Clap adapter for replacer.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`ReplacerArgs`] is the full command line of the `replacer` binary; it can
//! also be flattened into another clap derive.
//!
//! The bridge to the core is [`ReplacerArgs::into_builder()`] plus
//! [`ReplacerArgs::action()`]. From there all logic flows through the
//! clap-free [`ReplacerBuilder::handle()`](crate::ReplacerBuilder::handle) API.

use std::path::PathBuf;

use clap::Args;

use crate::builder::{Replacer, ReplacerBuilder};
use crate::error::ReplacerError;
use crate::overrides::parse_override;
use crate::types::{Action, ArrayPolicy, ChunkMode, DEFAULT_MARKER, FailurePolicy};

/// Clap-derived args for a replacer run.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     replacer: ReplacerArgs,
/// }
/// ```
#[derive(Debug, Args)]
pub struct ReplacerArgs {
    /// Configuration file with the values to substitute. Repeat to layer
    /// several files; later files win.
    #[arg(short = 'f', long = "config", required = true, value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Workspace directory searched for templates.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub workspace: PathBuf,

    /// File-name marker identifying templates.
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// What to do with array values in the configuration.
    #[arg(long, value_enum, default_value_t = ArrayPolicy::Warn)]
    pub arrays: ArrayPolicy,

    /// Substitute each file as a whole instead of line by line.
    #[arg(long)]
    pub whole_file: bool,

    /// Continue past failing templates and report them at the end.
    #[arg(long)]
    pub keep_going: bool,

    /// Show what would be created without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Also read PREFIX__SECTION__KEY environment variables.
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,

    /// Override a value (e.g. --set database.port=5433). Highest priority.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Print the flattened variables instead of rendering templates.
    #[arg(long)]
    pub list: bool,

    /// With --list, print a JSON object.
    #[arg(long, requires = "list")]
    pub json: bool,

    /// More logging (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl ReplacerArgs {
    /// Convert parsed args into a configured builder.
    ///
    /// Fails if a `--set` argument is not `key=value`.
    pub fn into_builder(self) -> Result<ReplacerBuilder, ReplacerError> {
        let overrides = self
            .set
            .iter()
            .map(|raw| parse_override(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = self
            .config
            .into_iter()
            .fold(Replacer::builder(), |b, path| b.config_file(path))
            .workspace(self.workspace)
            .marker(&self.marker)
            .array_policy(self.arrays)
            .chunk_mode(if self.whole_file {
                ChunkMode::Whole
            } else {
                ChunkMode::Lines
            })
            .failure_policy(if self.keep_going {
                FailurePolicy::KeepGoing
            } else {
                FailurePolicy::Abort
            })
            .overrides(overrides)
            .dry_run(self.dry_run);
        if let Some(prefix) = &self.env_prefix {
            builder = builder.env_prefix(prefix);
        }
        Ok(builder)
    }

    /// The framework-agnostic [`Action`] selected by the flags.
    pub fn action(&self) -> Action {
        if self.list {
            Action::List { json: self.json }
        } else {
            Action::Run
        }
    }

    /// Default log filter for the verbosity flags. `RUST_LOG` takes
    /// precedence when set.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, _) => "debug",
        }
    }
}
