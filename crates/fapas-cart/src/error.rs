//! # Cart Error Types
//!
//! What callers of the controller see when an operation fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cart Controller                    │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                     │
//! │                                  ├──► CartError ──► screen             │
//! │  sqlx::Error ──────► DbError ────┘                                     │
//! │                                                                         │
//! │  Swallowed (logged, unchanged view returned):                          │
//! │    InvalidInput / NotFound on add, increment, decrement, remove        │
//! │                                                                         │
//! │  Returned:                                                              │
//! │    NotFound on checkout, NotPriceable, PersistenceFailure              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use fapas_core::CoreError;
use fapas_db::DbError;

/// Cart controller errors.
#[derive(Debug, Error)]
pub enum CartError {
    // =========================================================================
    // Domain
    // =========================================================================
    /// A cart rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Persistence
    // =========================================================================
    /// The store could not be read or written.
    ///
    /// ## When This Occurs
    /// - SQLite file unavailable or disk full
    /// - Pool acquire timeout
    /// - Stored cart bytes are unreadable
    ///
    /// The in-memory snapshot is left at the last durable state.
    #[error("Cart could not be saved: {0}")]
    Persistence(#[from] DbError),

    // =========================================================================
    // Configuration
    // =========================================================================
    /// Configuration values failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load configuration: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save configuration: {0}")]
    ConfigSaveFailed(String),
}

/// Machine-readable error category for the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    NotPriceable,
    PersistenceFailure,
    ConfigError,
}

impl CartError {
    /// Returns the category used by screens to pick a message.
    pub fn code(&self) -> ErrorCode {
        match self {
            CartError::Core(e) if e.is_invalid_input() => ErrorCode::InvalidInput,
            CartError::Core(CoreError::NotFound { .. }) => ErrorCode::NotFound,
            CartError::Core(_) => ErrorCode::NotPriceable,
            CartError::Persistence(_) => ErrorCode::PersistenceFailure,
            CartError::InvalidConfig(_)
            | CartError::ConfigLoadFailed(_)
            | CartError::ConfigSaveFailed(_) => ErrorCode::ConfigError,
        }
    }

    /// Returns true if the error must be shown to the user.
    ///
    /// Invalid input is only logged; everything else is surfaced.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self.code(), ErrorCode::InvalidInput)
    }

    /// Returns true if the store rejected a read or write.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, CartError::Persistence(_))
    }
}

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CartError {
    fn from(err: toml::ser::Error) -> Self {
        CartError::ConfigSaveFailed(err.to_string())
    }
}

/// Result type for cart controller operations.
pub type CartResult<T> = Result<T, CartError>;
