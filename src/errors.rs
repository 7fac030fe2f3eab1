/*!
 * Error types for the lingolink library.
 *
 * This module contains custom error types for the different boundaries of
 * the application, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::content::RecordId;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting or quota
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised by a content store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    /// The record does not exist
    #[error("Record {0} not found")]
    NotFound(RecordId),

    /// The backing storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored data could not be decoded
    #[error("Corrupt stored value for record {record_id}: {message}")]
    Corrupt {
        /// Record carrying the value
        record_id: RecordId,
        /// Decoder message
        message: String,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(error: anyhow::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Errors that can occur while translating and linking a record
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Missing or invalid input, nothing was written
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Source or target record is missing, nothing was written
    #[error("Not found: {0}")]
    NotFound(String),

    /// The translation provider failed, nothing was written
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A content store write failed; fan-out writes already applied are kept
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Another request holds the lease for the same record and locale
    #[error("A translation of record {record_id} into '{locale}' is already in progress")]
    SlotBusy {
        /// Source record of the in-flight request
        record_id: RecordId,
        /// Target locale of the in-flight request
        locale: String,
    },
}

impl From<StoreError> for TranslationError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(format!("record {} does not exist", id)),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a configuration file or value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller lacks the capability for the action
    #[error("Insufficient permissions.")]
    Unauthorized,

    /// The anti-replay token is missing, expired or forged
    #[error("Invalid or expired security token.")]
    InvalidNonce,

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the content store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Config(error.to_string())
    }
}
