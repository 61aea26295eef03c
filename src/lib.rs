//! Render `{{dotted.key}}` templates from layered configuration.
//!
//! Replacer reads one or more configuration documents, flattens them into a
//! map of dotted keys, finds every file in a workspace whose name contains a
//! marker (`.template` by default), and writes a rendered copy next to it
//! with the marker removed from the name.
//!
//! ```ignore
//! let report = Replacer::builder()
//!     .config_file("deploy.yml")
//!     .workspace("./k8s")
//!     .run()?;
//! println!("{report}");
//! ```
//!
//! Given `deploy.yml`:
//!
//! ```yaml
//! service:
//!   name: billing
//!   port: 8443
//! ```
//!
//! the template `k8s/{{service.name}}.env.template` containing
//! `PORT={{service.port}}` becomes `k8s/billing.env` containing `PORT=8443`.
//!
//! # Variables
//!
//! Nested mappings are flattened with `.` as the separator, so
//! `service.port` addresses `port` inside `service`. Scalars render as:
//!
//! - strings verbatim
//! - booleans as `true` / `false`
//! - integers in decimal
//! - floats in exponent notation with at least two exponent digits
//!   (`3.14` renders `3.14E+00`)
//!
//! Arrays are never addressable; [`ArrayPolicy`] decides whether they are
//! dropped with a warning, dropped silently, or rejected. Nulls are dropped.
//!
//! # Placeholders
//!
//! A placeholder is `{{`, one or more characters other than `{`, `}` and
//! `;`, then `}}`. The identifier is looked up literally. A placeholder
//! wrapped in further braces on both sides (`{{{{a}}}}`) is left as-is.
//! Values are inserted once and never scanned again. An identifier missing
//! from the map fails the template.
//!
//! # Layer precedence
//!
//! ```text
//! Config files          .config_file(), later files win
//!        ↑ overridden by
//! Environment vars      PREFIX__SECTION__KEY (only with .env_prefix())
//!        ↑ overridden by
//! Overrides             .set() / --set key=value
//! ```
//!
//! Config files may be TOML (`.toml`), JSON (`.json`) or YAML (anything
//! else). Every layer is sparse and merged key-by-key before flattening.
//!
//! # CLI
//!
//! The `clap` Cargo feature (on by default) provides [`ReplacerArgs`] and the
//! `replacer` binary:
//!
//! ```text
//! replacer -f deploy.yml -w ./k8s
//! replacer -f base.yml -f prod.toml --set service.port=9000 --dry-run
//! replacer -f deploy.yml --list --json
//! ```

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod file;
mod flatten;
pub(crate) mod merge;
mod ops;
mod overrides;
mod resolve;
mod substitute;
mod template;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::{Replacer, ReplacerBuilder};
#[cfg(feature = "clap")]
pub use cli::ReplacerArgs;
pub use error::ReplacerError;
pub use flatten::{FlatMap, flatten, flatten_with};
pub use ops::{ConfigResult, Outcome, RunReport};
pub use overrides::parse_override;
pub use substitute::{placeholders, substitute};
pub use template::{output_name, render};
pub use types::{Action, ArrayPolicy, ChunkMode, ConfigFormat, FailurePolicy};
pub use value::{Scalar, Value};
