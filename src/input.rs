//! Loading values from JSON and TOML files.

use chrono::{DateTime, Utc};
use deepmix_core::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognised as layer files.
const LAYER_EXTENSIONS: &[&str] = &["json", "toml"];

/// Errors for reading input values
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Load a value from a file.
///
/// `.toml` files are parsed as TOML; everything else is parsed as JSON.
pub fn load_value(path: &Path) -> Result<Value, InputError> {
    let contents = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value = if has_extension(path, "toml") {
        parse_toml(&contents).map_err(|source| InputError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        parse_json(&contents).map_err(|source| InputError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    log::debug!("loaded {} ({})", path.display(), deepmix_core::classify(&value));
    Ok(value)
}

/// Parse JSON text into a value
pub fn parse_json(text: &str) -> Result<Value, serde_json::Error> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(Value::from(json))
}

/// Parse a TOML document into a value
pub fn parse_toml(text: &str) -> Result<Value, toml::de::Error> {
    let table: toml::Value = toml::from_str(text)?;
    Ok(toml_to_value(table))
}

fn toml_to_value(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Boolean(b),
        toml::Value::Datetime(dt) => {
            // Only offset date-times name an instant; local dates stay text.
            let text = dt.to_string();
            match DateTime::parse_from_rfc3339(&text) {
                Ok(instant) => Value::Date(instant.with_timezone(&Utc)),
                Err(_) => Value::String(text),
            }
        }
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_value(v)))
                .collect::<Map>(),
        ),
    }
}

/// Collect `.json` and `.toml` files under `dir`, sorted by path.
pub fn collect_layer_files(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if LAYER_EXTENSIONS.iter().any(|ext| has_extension(path, ext)) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
