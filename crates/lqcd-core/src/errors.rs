//! Structured error types shared across lqcd crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LatticeError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (site indices, extents, residuals, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the lqcd toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LatticeError {
    /// A link matrix failed the gauge-group membership check.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(ErrorInfo),
    /// A direction index lies outside the valid axis set.
    #[error("invalid direction: {0}")]
    InvalidDirection(ErrorInfo),
    /// An observable or payload disagrees with the lattice shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(ErrorInfo),
    /// An iterative solve exceeded its iteration or tolerance budget.
    #[error("convergence failure: {0}")]
    Convergence(ErrorInfo),
    /// A dataset write attempted to overwrite an existing key.
    #[error("duplicate key: {0}")]
    DuplicateKey(ErrorInfo),
    /// Configuration validation failed at construction.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization, schema, or I/O errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl LatticeError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LatticeError::InvalidMatrix(info)
            | LatticeError::InvalidDirection(info)
            | LatticeError::ShapeMismatch(info)
            | LatticeError::Convergence(info)
            | LatticeError::DuplicateKey(info)
            | LatticeError::Config(info)
            | LatticeError::Serde(info) => info,
        }
    }
}
