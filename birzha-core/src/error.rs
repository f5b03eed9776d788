use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the birzha workspace.
///
/// This wraps capability mismatches, argument validation errors,
/// connector-tagged transport failures, data-shape issues, and the
/// empty-result condition that a combined load must surface explicitly.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BirzhaError {
    /// The requested capability is not implemented by any registered connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "candle_history").
        capability: String,
    },

    /// Issues with the returned or expected data (malformed documents, bad fields).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument, detected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A connector failed at the transport level (connection error, body read).
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A connector received a non-success HTTP status.
    #[error("{connector} returned HTTP status {status}")]
    Status {
        /// Connector name that received the status.
        connector: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Every selected instrument produced zero rows for the requested range.
    #[error("no data for the selected instruments in the requested range")]
    NoData,

    /// Writing the spreadsheet output failed.
    #[error("export failed: {0}")]
    Export(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl BirzhaError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Status` error with the connector name and HTTP status code.
    pub fn status(connector: impl Into<String>, status: u16) -> Self {
        Self::Status {
            connector: connector.into(),
            status,
        }
    }

    /// Returns true when the error indicates bad user input rather than a
    /// runtime failure. Callers can use this to pick an exit path before any
    /// background work is started.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidArg(_) | Self::Unsupported { .. })
    }
}
