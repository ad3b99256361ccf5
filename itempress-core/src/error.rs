//! Error types for the core data model.

use std::fmt;

use thiserror::Error;

/// One structured diagnostic produced by local schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiagnostic {
    /// JSON-path-like location of the offending field.
    pub path: String,
    /// What was wrong with it.
    pub message: String,
}

impl SchemaDiagnostic {
    /// Build a diagnostic for a field path.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

fn join_diagnostics(diagnostics: &[SchemaDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while parsing or validating raw structured input.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The raw JSON did not deserialize against the published contract.
    #[error("input does not match the item contract: {0}")]
    Contract(#[from] serde_json::Error),

    /// The JSON deserialized but violated semantic rules.
    #[error("item failed local validation: {}", join_diagnostics(.diagnostics))]
    Invalid {
        /// Every rule violation found, in field order.
        diagnostics: Vec<SchemaDiagnostic>,
    },
}

impl SchemaError {
    /// The structured diagnostics, when present.
    #[must_use]
    pub fn diagnostics(&self) -> &[SchemaDiagnostic] {
        match self {
            Self::Contract(_) => &[],
            Self::Invalid { diagnostics } => diagnostics,
        }
    }
}
