//! Rendering a single template: its content and its output file name.

use std::path::{Component, Path, PathBuf};

use crate::error::ReplacerError;
use crate::flatten::FlatMap;
use crate::substitute::substitute;
use crate::types::ChunkMode;

/// A template rendered in memory, not yet written.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub template: PathBuf,
    pub output: PathBuf,
    pub content: String,
}

/// Substitute template content.
///
/// In [`ChunkMode::Lines`] every line is substituted on its own and written
/// back with a trailing `\n`, so a file without a final newline gains one.
pub fn render(vars: &FlatMap, content: &str, mode: ChunkMode) -> Result<String, ReplacerError> {
    match mode {
        ChunkMode::Whole => substitute(vars, content),
        ChunkMode::Lines => {
            let mut out = String::with_capacity(content.len());
            for line in content.lines() {
                out.push_str(&substitute(vars, line)?);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Output file name: placeholders resolved, then every occurrence of the
/// marker removed.
///
/// `{{service.name}}.conf.template` → `billing.conf`
pub fn output_name(vars: &FlatMap, file_name: &str, marker: &str) -> Result<String, ReplacerError> {
    let resolved = substitute(vars, file_name)?;
    if marker.is_empty() {
        return Ok(resolved);
    }
    Ok(resolved.replace(marker, ""))
}

/// Render a template file from disk into memory. The output path sits in the
/// template's own directory.
pub fn render_file(
    vars: &FlatMap,
    template: &Path,
    marker: &str,
    mode: ChunkMode,
) -> Result<Rendered, ReplacerError> {
    let file_name = template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let new_name = output_name(vars, &file_name, marker)?;
    if new_name.is_empty() {
        return Err(ReplacerError::EmptyOutputName {
            path: template.to_path_buf(),
        });
    }
    if new_name == file_name {
        return Err(ReplacerError::OutputOverwritesTemplate {
            path: template.to_path_buf(),
        });
    }
    if !is_plain_file_name(&new_name) {
        return Err(ReplacerError::InvalidOutputName {
            path: template.to_path_buf(),
            name: new_name,
        });
    }
    let output = template.with_file_name(&new_name);

    let content = std::fs::read_to_string(template).map_err(|e| ReplacerError::Io {
        path: template.to_path_buf(),
        source: e,
    })?;
    let content = render(vars, &content, mode)?;

    Ok(Rendered {
        template: template.to_path_buf(),
        output,
        content,
    })
}

/// Exactly one normal path component: no separators, no `.` or `..`.
fn is_plain_file_name(name: &str) -> bool {
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
