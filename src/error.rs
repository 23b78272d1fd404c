/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-Get error types so handlers, the upstream
    client, and the process entry point share one taxonomy.

  Security / Safety Notes:
    Upstream failures carry the status code and a short
    context label only; tokens never reach error messages.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate failures, classify them
    into wire error codes, and derive process exit codes.

  Revision History:
    2026-10-17 COD  Established Syn-Get error taxonomy.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Syn-Get operations.
pub type Result<T> = std::result::Result<T, SynGetError>;

/// Enumerates high-level error domains surfaced by Syn-Get.
#[derive(Debug, Error)]
pub enum SynGetError {
    #[error("{0}")]
    NotFound(String),
    /// Malformed client input; search bodies are read leniently instead.
    #[allow(dead_code)]
    #[error("{0}")]
    BadRequest(String),
    #[error("{context} error: {status}")]
    Upstream { context: String, status: u16 },
    #[error("Network: {0}")]
    Network(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Wire-level error classification returned to package-manager clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    NotFound,
    BadRequest,
    ServerError,
}

impl ApiErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiErrorCode::NotFound => "NotFound",
            ApiErrorCode::BadRequest => "BadRequest",
            ApiErrorCode::ServerError => "ServerError",
        }
    }

    pub fn status(self) -> u16 {
        match self {
            ApiErrorCode::NotFound => 404,
            ApiErrorCode::BadRequest => 400,
            ApiErrorCode::ServerError => 500,
        }
    }
}

impl SynGetError {
    /// Whether this is an upstream rejection with the given status.
    pub fn is_upstream_status(&self, code: u16) -> bool {
        matches!(self, SynGetError::Upstream { status, .. } if *status == code)
    }

    /// Classify the error for the HTTP error envelope.
    pub fn api_code(&self) -> ApiErrorCode {
        match self {
            SynGetError::NotFound(_) => ApiErrorCode::NotFound,
            SynGetError::BadRequest(_) => ApiErrorCode::BadRequest,
            _ => ApiErrorCode::ServerError,
        }
    }

    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SynGetError::NotFound(_) | SynGetError::BadRequest(_) => ExitCode::from(12),
            SynGetError::Config(_) => ExitCode::from(20),
            SynGetError::Upstream { .. } | SynGetError::Network(_) => ExitCode::from(30),
            SynGetError::Serialization(_) => ExitCode::from(31),
            SynGetError::Filesystem(_) => ExitCode::from(40),
            SynGetError::Io(_) => ExitCode::from(41),
            SynGetError::Runtime(_) => ExitCode::from(50),
        }
    }
}
