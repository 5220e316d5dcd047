//! Rendering values for output.

use deepmix_core::Value;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How values are printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Indented JSON (ignored when `canonical` is set)
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// RFC 8785 canonical JSON
    #[serde(default)]
    pub canonical: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            canonical: false,
        }
    }
}

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JCS serialization failed: {0}")]
    Canonical(String),
}

/// Render a value as JSON text
pub fn render(value: &Value, settings: &OutputSettings) -> Result<String, OutputError> {
    let json = value.to_json();
    if settings.canonical {
        let bytes = canonical_bytes(&json)?;
        return String::from_utf8(bytes).map_err(|e| OutputError::Canonical(e.to_string()));
    }
    if settings.pretty {
        Ok(serde_json::to_string_pretty(&json)?)
    } else {
        Ok(serde_json::to_string(&json)?)
    }
}

/// SHA-256 hex digest of the value's canonical JSON form.
///
/// Equal values digest equally regardless of map insertion order.
pub fn digest(value: &Value) -> Result<String, OutputError> {
    let bytes = canonical_bytes(&value.to_json())?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn canonical_bytes(json: &serde_json::Value) -> Result<Vec<u8>, OutputError> {
    serde_json_canonicalizer::to_vec(json).map_err(|e| OutputError::Canonical(e.to_string()))
}
