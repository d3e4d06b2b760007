//! Structured error types shared across MSD crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`DesignError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (positions, lengths, mode names, etc.).
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

/// Canonical error type for the design engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum DesignError {
    /// Dot-bracket structure errors.
    #[error("structure error: {0}")]
    Structure(ErrorInfo),
    /// Sequence constraint and sequence validation errors.
    #[error("constraint error: {0}")]
    Constraint(ErrorInfo),
    /// Dependency graph construction and bookkeeping errors.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Graph construction exceeded its deadline.
    #[error("timeout: {0}")]
    Timeout(ErrorInfo),
    /// Invalid sampling mode or inconsistent resample.
    #[error("sampler error: {0}")]
    Sampler(ErrorInfo),
    /// Energy evaluation errors.
    #[error("fold error: {0}")]
    Fold(ErrorInfo),
    /// Malformed structure/constraint input files or streams.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Serialization, configuration and output errors.
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

impl DesignError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            DesignError::Structure(info)
            | DesignError::Constraint(info)
            | DesignError::Graph(info)
            | DesignError::Timeout(info)
            | DesignError::Sampler(info)
            | DesignError::Fold(info)
            | DesignError::Input(info)
            | DesignError::Serde(info) => info,
        }
    }

    /// Returns true when the error was produced by a construction deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DesignError::Timeout(_))
    }
}
