//! Loading grouped shop results from JSON or YAML files.

use std::path::Path;

use thiserror::Error;

use crate::validate::{validate_grouped, RawGroupedResults, Validated};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON input {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML input {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Read a `{ company: [shop, ...] }` file and validate its records.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML; anything else as
/// JSON. Company order follows the file.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read or parsed. Individual
/// malformed records are not errors; they land in [`Validated::rejected`].
pub fn load_grouped(path: &Path) -> Result<Validated, InputError> {
    let path_display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| InputError::Io {
        path: path_display.clone(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let raw: RawGroupedResults = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| InputError::Yaml {
            path: path_display.clone(),
            source: e,
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| InputError::Json {
            path: path_display.clone(),
            source: e,
        })?
    };

    tracing::debug!(
        path = %path_display,
        companies = raw.len(),
        records = raw.record_count(),
        "loaded grouped shop input"
    );

    Ok(validate_grouped(raw))
}
