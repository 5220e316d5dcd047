//! Namespace of named operations.
//!
//! A [`Namespace`] binds the four value operations (is-object check,
//! classify, clone, mixin) to caller-chosen identifiers and dispatches calls
//! by identifier. Rebinding validates the whole new set first and then swaps
//! every binding at once, so a failed [`Namespace::configure`] leaves the
//! previous bindings active.

mod identifier;

pub use identifier::is_valid_identifier;

use deepmix_core::{classify, deep_clone, is_object, mixin, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The operations a namespace can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    IsObject,
    Classify,
    Clone,
    Mixin,
}

impl OperationKind {
    /// All operations in binding order
    pub const ALL: [OperationKind; 4] = [
        OperationKind::IsObject,
        OperationKind::Classify,
        OperationKind::Clone,
        OperationKind::Mixin,
    ];

    /// Identifier installed when no name is configured
    pub fn default_identifier(&self) -> &'static str {
        match self {
            OperationKind::IsObject => "isObject",
            OperationKind::Classify => "getType",
            OperationKind::Clone => "clone",
            OperationKind::Mixin => "mixin",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::IsObject => "is_object",
            OperationKind::Classify => "classify",
            OperationKind::Clone => "clone",
            OperationKind::Mixin => "mixin",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested identifiers; `None` keeps the default identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceNames {
    #[serde(
        default,
        alias = "isObject",
        alias = "classifyIsObject",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_object: Option<String>,

    #[serde(default, alias = "getType", skip_serializing_if = "Option::is_none")]
    pub classify: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixin: Option<String>,
}

impl NamespaceNames {
    /// Identifier requested for `kind`, falling back to its default
    pub fn identifier_for(&self, kind: OperationKind) -> &str {
        let requested = match kind {
            OperationKind::IsObject => &self.is_object,
            OperationKind::Classify => &self.classify,
            OperationKind::Clone => &self.clone,
            OperationKind::Mixin => &self.mixin,
        };
        requested.as_deref().unwrap_or(kind.default_identifier())
    }
}

/// Namespace errors
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error("Invalid identifier {identifier:?} for {operation}: {reason}")]
    InvalidIdentifier {
        operation: OperationKind,
        identifier: String,
        reason: &'static str,
    },

    #[error("No operation bound to {0:?}")]
    UnknownOperation(String),

    #[error(transparent)]
    Operation(#[from] deepmix_core::Error),
}

/// Active identifier bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    identifiers: [String; 4],
    bindings: HashMap<String, OperationKind>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    /// Namespace with the default identifiers installed
    pub fn new() -> Self {
        let identifiers = OperationKind::ALL.map(|kind| kind.default_identifier().to_string());
        Self::install(identifiers)
    }

    /// Build a namespace from requested names
    pub fn with_names(names: &NamespaceNames) -> Result<Self, NamespaceError> {
        let mut namespace = Self::new();
        namespace.configure(names)?;
        Ok(namespace)
    }

    /// Rebind every operation.
    ///
    /// All identifiers are checked before anything changes; on error the
    /// current bindings stay in place.
    pub fn configure(&mut self, names: &NamespaceNames) -> Result<(), NamespaceError> {
        let identifiers = OperationKind::ALL.map(|kind| names.identifier_for(kind).to_string());

        for (i, kind) in OperationKind::ALL.iter().enumerate() {
            let identifier = &identifiers[i];
            if !is_valid_identifier(identifier) {
                return Err(NamespaceError::InvalidIdentifier {
                    operation: *kind,
                    identifier: identifier.clone(),
                    reason: "must start with a letter or underscore and contain only letters, digits, hyphens and underscores",
                });
            }
            if identifiers[..i].contains(identifier) {
                return Err(NamespaceError::InvalidIdentifier {
                    operation: *kind,
                    identifier: identifier.clone(),
                    reason: "already bound to another operation",
                });
            }
        }

        log::debug!(
            "rebinding namespace: {:?} -> {:?}",
            self.identifiers,
            identifiers
        );
        *self = Self::install(identifiers);
        Ok(())
    }

    fn install(identifiers: [String; 4]) -> Self {
        let bindings = identifiers
            .iter()
            .cloned()
            .zip(OperationKind::ALL)
            .collect();
        Self {
            identifiers,
            bindings,
        }
    }

    /// Operation bound to `identifier`, if any
    pub fn resolve(&self, identifier: &str) -> Option<OperationKind> {
        self.bindings.get(identifier).copied()
    }

    /// Identifier currently bound to `kind`
    pub fn identifier_for(&self, kind: OperationKind) -> &str {
        let index = OperationKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.identifiers[index]
    }

    /// All bindings in operation order
    pub fn bindings(&self) -> impl Iterator<Item = (OperationKind, &str)> {
        OperationKind::ALL
            .into_iter()
            .zip(self.identifiers.iter().map(String::as_str))
    }

    /// Invoke the operation bound to `identifier`.
    ///
    /// Missing arguments are `Undefined`. Mixin takes the base first and the
    /// sources after it.
    pub fn invoke(&self, identifier: &str, args: &[Value]) -> Result<Value, NamespaceError> {
        let kind = self
            .resolve(identifier)
            .ok_or_else(|| NamespaceError::UnknownOperation(identifier.to_string()))?;
        log::trace!("invoking {} as {:?} with {} argument(s)", kind, identifier, args.len());

        let undefined = Value::Undefined;
        let first = args.first().unwrap_or(&undefined);
        let result = match kind {
            OperationKind::IsObject => Value::Boolean(is_object(first)),
            OperationKind::Classify => Value::String(classify(first).as_str().to_string()),
            OperationKind::Clone => deep_clone(first)?,
            OperationKind::Mixin => {
                let sources = args.get(1..).unwrap_or(&[]);
                mixin(first, sources)?
            }
        };
        Ok(result)
    }
}
