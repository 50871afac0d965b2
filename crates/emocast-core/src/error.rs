// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Emocast pipeline.
//!
//! [`EmocastError`] is used inside the workspace. At the API facade every error
//! is re-expressed as a [`CallerError`], which only carries one of three
//! caller-visible kinds, a human-readable message, and the logical endpoint.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// The primary error type used across all Emocast crates.
#[derive(Debug, Error)]
pub enum EmocastError {
    /// Configuration errors (invalid TOML, missing API key, bad URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected before any gateway call was attempted.
    #[error("invalid {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    /// The completion provider could not produce a usable answer
    /// (transport error, non-2xx status, or empty body).
    #[error("upstream call failed: {message}")]
    UpstreamCallFailed { message: String },

    /// A completion arrived but could not be decoded into the stage's shape.
    #[error("malformed {stage} completion")]
    Malformed { stage: String },

    /// A referenced record needed to compose a stage does not exist.
    #[error("{kind} `{id}` not found")]
    DependencyNotFound { kind: String, id: String },

    /// A record requested by id does not exist (or is inactive).
    #[error("{kind} `{id}` not found")]
    NotFound { kind: String, id: String },

    /// Ledger read or write failure.
    #[error("persistence error: {source}")]
    PersistenceFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A stage ran to completion without a usable result.
    #[error("compute failed: {message}")]
    ComputeFailed { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EmocastError {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing dependency of `kind` with identifier `id`.
    pub fn dependency(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DependencyNotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Shorthand for a record lookup miss.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Shorthand for a stage that finished without a usable result.
    pub fn compute(message: impl Into<String>) -> Self {
        Self::ComputeFailed {
            message: message.into(),
        }
    }

    /// Classifies this error into one of the caller-visible kinds.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ValidationFailed { .. } => FailureKind::BadRequest,
            Self::DependencyNotFound { .. } | Self::NotFound { .. } => FailureKind::NotFound,
            Self::Config(_)
            | Self::UpstreamCallFailed { .. }
            | Self::Malformed { .. }
            | Self::PersistenceFailed { .. }
            | Self::ComputeFailed { .. }
            | Self::Internal(_) => FailureKind::InternalServer,
        }
    }

    /// Re-expresses this error as a [`CallerError`] for the given endpoint.
    ///
    /// Upstream and malformed-completion errors never leak their provider
    /// detail to the caller; they collapse into a generic compute failure.
    pub fn at(self, endpoint: &str) -> CallerError {
        let kind = self.kind();
        let message = match &self {
            Self::UpstreamCallFailed { .. } | Self::Malformed { .. } => {
                "compute failed: no usable result from the completion provider".to_string()
            }
            Self::PersistenceFailed { .. } => "compute failed: ledger unavailable".to_string(),
            other => other.to_string(),
        };
        CallerError {
            kind,
            message,
            endpoint: endpoint.to_string(),
        }
    }
}

/// Caller-visible error classes, one per HTTP status family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum FailureKind {
    BadRequest,
    NotFound,
    InternalServer,
}

/// The only error shape that crosses the API facade.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message} ({endpoint})")]
pub struct CallerError {
    #[serde(skip)]
    pub kind: FailureKind,
    pub message: String,
    pub endpoint: String,
}
