//! Error taxonomy shared by every jq-backed operation.
//!
//! Three families:
//!
//! - **Validation** ([`JqError::MissingParam`], [`JqError::UnknownOperation`],
//!   [`JqError::InvalidPath`]) — raised before any subprocess is spawned.
//! - **Interpreter** ([`JqError::Interpreter`]) — jq exited non-zero with
//!   error output; carries the exit code and raw stderr for diagnosis.
//! - **Environment** ([`JqError::Unavailable`], [`JqError::Spawn`],
//!   [`JqError::Timeout`]) — the jq binary could not be run to completion.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type JqResult<T> = Result<T, JqError>;

/// Structured failure for a jq-backed operation.
#[derive(Debug, Error)]
pub enum JqError {
    /// A required parameter was absent. The message names the missing field.
    #[error("{tool}: {field} parameter required")]
    MissingParam {
        /// Tool or operation category that rejected the call.
        tool: &'static str,
        /// Name of the absent field.
        field: &'static str,
    },

    /// Operation name outside the closed enumeration for its category.
    #[error("{tool}: unknown operation '{operation}'")]
    UnknownOperation {
        /// Tool or operation category that rejected the call.
        tool: &'static str,
        /// The unrecognized operation name.
        operation: String,
    },

    /// A path expression could not be parsed into segments.
    #[error("extract: invalid path '{path}'")]
    InvalidPath {
        /// The path text as supplied by the caller.
        path: String,
    },

    /// jq exited non-zero and wrote to stderr.
    #[error("{message}")]
    Interpreter {
        /// Human-readable message including the category name and raw stderr.
        message: String,
        /// The subprocess exit code.
        code: i64,
        /// Raw stderr text, trimmed.
        stderr: String,
    },

    /// The jq binary was not found on the search path.
    #[error("jq executable not found on PATH")]
    Unavailable,

    /// The jq process could not be spawned or awaited.
    #[error("failed to run jq: {0}")]
    Spawn(#[source] std::io::Error),

    /// The configured deadline expired before jq exited.
    #[error("jq did not exit within {ms}ms")]
    Timeout {
        /// Deadline in milliseconds.
        ms: u64,
    },
}

impl JqError {
    /// Validation failure for an absent required field.
    pub fn missing(tool: &'static str, field: &'static str) -> Self {
        Self::MissingParam { tool, field }
    }

    /// Validation failure for an operation name outside the closed set.
    pub fn unknown_operation(tool: &'static str, operation: &str) -> Self {
        Self::UnknownOperation {
            tool,
            operation: operation.to_string(),
        }
    }

    /// True for failures raised before any subprocess was spawned.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParam { .. } | Self::UnknownOperation { .. } | Self::InvalidPath { .. }
        )
    }
}
