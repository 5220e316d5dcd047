//! Built-in defaults (layer 1)

use crate::namespace::OperationKind;
use crate::output::OutputSettings;
use deepmix_core::Value;
use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Identifier for the is-object check (default: "isObject")
    pub is_object_name: String,

    /// Identifier for classify (default: "getType")
    pub classify_name: String,

    /// Identifier for clone (default: "clone")
    pub clone_name: String,

    /// Identifier for mixin (default: "mixin")
    pub mixin_name: String,

    /// Output settings (default: pretty, not canonical)
    pub output: OutputSettings,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            is_object_name: OperationKind::IsObject.default_identifier().to_string(),
            classify_name: OperationKind::Classify.default_identifier().to_string(),
            clone_name: OperationKind::Clone.default_identifier().to_string(),
            mixin_name: OperationKind::Mixin.default_identifier().to_string(),
            output: OutputSettings::default(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a value for merging
    pub fn to_value(&self) -> Value {
        Value::from(serde_json::json!({
            "namespace": {
                "is_object": self.is_object_name,
                "classify": self.classify_name,
                "clone": self.clone_name,
                "mixin": self.mixin_name
            },
            "output": {
                "pretty": self.output.pretty,
                "canonical": self.output.canonical
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.is_object_name, "isObject");
        assert_eq!(defaults.classify_name, "getType");
        assert_eq!(defaults.clone_name, "clone");
        assert_eq!(defaults.mixin_name, "mixin");
        assert!(defaults.output.pretty);
        assert!(!defaults.output.canonical);
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();
        assert_eq!(value.pointer("namespace.classify"), Some(&Value::from("getType")));
        assert_eq!(value.pointer("output.pretty"), Some(&Value::Boolean(true)));
    }
}
