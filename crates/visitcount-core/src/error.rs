//! Shared error type across visitcount crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Missing or invalid configuration.
    Config,
    /// Counter store unreachable or failed the write.
    StoreUnavailable,
    /// Store answered, but the row does not hold a usable count.
    MalformedRecord,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Config => "CONFIG",
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::MalformedRecord => "MALFORMED_RECORD",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, VisitCountError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum VisitCountError {
    #[error("config: {0}")]
    Config(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl VisitCountError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            VisitCountError::Config(_) => ClientCode::Config,
            VisitCountError::StoreUnavailable(_) => ClientCode::StoreUnavailable,
            VisitCountError::MalformedRecord(_) => ClientCode::MalformedRecord,
            VisitCountError::Internal(_) => ClientCode::Internal,
        }
    }
}

impl From<std::io::Error> for VisitCountError {
    fn from(e: std::io::Error) -> Self {
        VisitCountError::StoreUnavailable(e.to_string())
    }
}
