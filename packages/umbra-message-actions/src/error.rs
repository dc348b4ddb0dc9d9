//! # Error Handling
//!
//! Error types for message actions.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Precondition Errors (abort before any mutation)                   │
//! │  │   ├── OffUiThread             - Called off the UI thread            │
//! │  │   ├── MissingInputSurface     - No input toolbar to quote into      │
//! │  │   ├── MissingSessionContext   - No pan slot for interactive push    │
//! │  │   ├── InvalidInteraction      - Wrong message variant for action    │
//! │  │   ├── MessageNotFound         - Reference no longer resolves        │
//! │  │   ├── NotOutgoing             - Remote delete of a non-outgoing msg │
//! │  │   ├── RemoteDeleteNotEligible - Eligibility predicate said no      │
//! │  │   └── NoQuotableContent       - Nothing to build a quote from       │
//! │  │                                                                      │
//! │  ├── Storage Errors (transaction rolled back)                          │
//! │  │   ├── DatabaseError           - SQLite failure                      │
//! │  │   └── SerializationError      - Payload (de)serialization           │
//! │  │                                                                      │
//! │  ├── Delivery Errors                                                   │
//! │  │   └── EnqueueFailed           - Outbound job could not be queued    │
//! │  │                                                                      │
//! │  └── Internal Errors                                                   │
//! │      └── Internal                - Should not happen                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Declining a confirmation prompt is not an error; it is a normal abort.

use thiserror::Error;

/// Result type alias for message action operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for message actions
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Precondition Errors (100-199)
    // ========================================================================

    /// An action was invoked off the thread that owns the conversation view
    #[error("Message actions must run on the UI thread.")]
    OffUiThread,

    /// The conversation has no input surface to place a quote in
    #[error("Missing input surface.")]
    MissingInputSurface,

    /// The conversation context has no pan slot for an interactive push
    #[error("Missing session context for conversation {0}.")]
    MissingSessionContext(String),

    /// The message variant does not support the requested action
    #[error("Invalid interaction: {0}")]
    InvalidInteraction(String),

    /// The referenced message no longer exists
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Remote deletion was requested for a message we did not send
    #[error("Message {0} is not an outgoing message.")]
    NotOutgoing(String),

    /// Remote deletion was requested for a message that is not eligible
    #[error("Message {0} cannot be deleted for everyone.")]
    RemoteDeleteNotEligible(String),

    /// No quote could be derived from the message
    #[error("Could not build quoted reply for message {0}.")]
    NoQuotableContent(String),

    // ========================================================================
    // Storage Errors (400-499)
    // ========================================================================

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ========================================================================
    // Delivery Errors (700-799)
    // ========================================================================

    /// The outbound queue rejected the job
    #[error("Failed to enqueue outbound message: {0}")]
    EnqueueFailed(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Preconditions
    /// - 400-499: Storage
    /// - 700-799: Delivery
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Preconditions (100-199)
            Error::OffUiThread => 100,
            Error::MissingInputSurface => 101,
            Error::MissingSessionContext(_) => 102,
            Error::InvalidInteraction(_) => 103,
            Error::MessageNotFound(_) => 104,
            Error::NotOutgoing(_) => 105,
            Error::RemoteDeleteNotEligible(_) => 106,
            Error::NoQuotableContent(_) => 107,

            // Storage (400-499)
            Error::DatabaseError(_) => 400,
            Error::SerializationError(_) => 401,

            // Delivery (700-799)
            Error::EnqueueFailed(_) => 700,

            // Internal (900-999)
            Error::Internal(_) => 900,
        }
    }

    /// Check if this is a precondition failure
    ///
    /// Precondition failures happen before any mutation; the caller can
    /// recover by re-invoking with valid input.
    pub fn is_precondition(&self) -> bool {
        (100..200).contains(&self.code())
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

// ============================================================================
// REPORTING
// ============================================================================

/// Log a failed action and hand the error back to the caller.
///
/// With `assert_on_failure` set this also trips a debug assertion, so
/// development builds stop at the failure. Release builds only log.
pub(crate) fn report(action: &'static str, err: Error, assert_on_failure: bool) -> Error {
    tracing::error!(action, code = err.code(), "{}", err);
    if assert_on_failure {
        debug_assert!(false, "{action} failed: {err}");
    }
    err
}

// ============================================================================
// TESTS
// ============================================================================
