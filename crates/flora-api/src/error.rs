//! User-visible error model for the explorer
//!
//! Every handled failure is converted into an [`AppError`] at the operation
//! boundary that caught it:
//! - Stable error codes for front-end handling
//! - User-facing messages
//! - Optional internal detail for logs
//! - Retry hint

use serde::{Deserialize, Serialize};
use std::fmt;

use flora_core::CatalogueError;

use crate::config::ConfigError;
use crate::remote::RemoteError;

/// Error categories for grouping and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad configuration or catalogue input
    Validation,
    /// Simulated remote failure
    Network,
    /// Unknown species id
    NotFound,
    /// Diagnostic-only data problems
    Data,
    /// Unexpected state
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Network => write!(f, "network"),
            Self::NotFound => write!(f, "not_found"),
            Self::Data => write!(f, "data"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Stable error codes. Format: CATEGORY_SPECIFIC_ERROR
pub struct ErrorCode;

impl ErrorCode {
    pub const VALIDATION_INVALID_CONFIG: &'static str = "VALIDATION_INVALID_CONFIG";
    pub const VALIDATION_INVALID_CATALOGUE: &'static str = "VALIDATION_INVALID_CATALOGUE";

    pub const NETWORK_REMOTE_UNAVAILABLE: &'static str = "NETWORK_REMOTE_UNAVAILABLE";

    pub const NOT_FOUND_SPECIES: &'static str = "NOT_FOUND_SPECIES";

    pub const DATA_INVALID_SEQUENCE: &'static str = "DATA_INVALID_SEQUENCE";

    pub const INTERNAL_ERROR: &'static str = "INTERNAL_ERROR";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub code: String,
    pub message: String,
    /// Internal detail for logs, not for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub retryable: bool,
    pub category: ErrorCategory,
}

impl AppError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        category: ErrorCategory,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail: None,
            retryable: false,
            category,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    #[must_use]
    pub fn species_not_found(id: &str) -> Self {
        Self::new(
            ErrorCode::NOT_FOUND_SPECIES,
            format!("Species record not found: {id}"),
            ErrorCategory::NotFound,
        )
    }

    /// Retryable by triggering the search again; nothing retries automatically.
    #[must_use]
    pub fn remote_unavailable(status: u16, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NETWORK_REMOTE_UNAVAILABLE,
            format!("Remote service unavailable (status {status})"),
            ErrorCategory::Network,
        )
        .with_detail(detail)
        .retryable()
    }

    #[must_use]
    pub fn invalid_sequence(id: &str, preview: &str) -> Self {
        Self::new(
            ErrorCode::DATA_INVALID_SEQUENCE,
            format!("Genetic sequence for {id} contains symbols outside A/T/C/G/N"),
            ErrorCategory::Data,
        )
        .with_detail(format!("preview={preview}"))
    }

    #[must_use]
    pub fn invalid_config(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::VALIDATION_INVALID_CONFIG,
            "Explorer configuration is invalid",
            ErrorCategory::Validation,
        )
        .with_detail(detail)
    }

    #[must_use]
    pub fn invalid_catalogue(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::VALIDATION_INVALID_CATALOGUE,
            "Species catalogue is invalid",
            ErrorCategory::Validation,
        )
        .with_detail(detail)
    }

    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, "An internal error occurred", ErrorCategory::Internal)
            .with_detail(detail)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        Self::remote_unavailable(err.status, err.message)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl From<CatalogueError> for AppError {
    fn from(err: CatalogueError) -> Self {
        Self::invalid_catalogue(err.to_string())
    }
}
