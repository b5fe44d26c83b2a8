//! # Error Handling
//!
//! Error types for the command-handle bridge.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (bridge lifecycle, returned to the host)                         │
//! │  ├── NotInitialized        - no registry installed                      │
//! │  ├── AlreadyInitialized    - a registry is already installed            │
//! │  └── SerializationError    - stats snapshot could not be encoded        │
//! │                                                                         │
//! │  NativeError (handed to the one callback that owns the handle)          │
//! │  └── code + optional message resolved through ErrorMessageSource        │
//! │                                                                         │
//! │  CompletionError (seen by `completion::Completion` futures)             │
//! │  ├── Native(NativeError)                                                │
//! │  └── Abandoned             - callback dropped without being invoked     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown handles and shape mismatches are never errors from the native
//! layer's point of view. They are logged and counted by the registry and
//! the completion is dropped.

use thiserror::Error;

/// Numeric error type used by libvcx (`vcx_error_t`).
pub type VcxErrorCode = u32;

/// The error code libvcx reports on success.
pub const SUCCESS: VcxErrorCode = 0;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bridge lifecycle errors
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Lifecycle Errors (100-199)
    // ========================================================================

    /// No registry has been installed for the native callbacks
    #[error("Bridge has not been initialized. Call vcx_bridge_init() first.")]
    NotInitialized,

    /// A registry is already installed
    #[error("Bridge has already been initialized.")]
    AlreadyInitialized,

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Get the error code for FFI
    ///
    /// - 100-199: Lifecycle
    /// - 900-999: Internal
    pub fn code(&self) -> u32 {
        match self {
            Error::NotInitialized => 100,
            Error::AlreadyInitialized => 101,
            Error::SerializationError(_) => 902,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

// ============================================================================
// NATIVE ERRORS
// ============================================================================

/// A non-zero error code reported by libvcx for one command.
///
/// The bridge does not interpret specific codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("libvcx call failed with code {}{}", .code, .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct NativeError {
    /// Error code as reported by the native library
    pub code: VcxErrorCode,
    /// Human-readable message, when the native layer supplies one
    pub message: Option<String>,
}

impl NativeError {
    /// Create an error carrying only the numeric code
    pub fn new(code: VcxErrorCode) -> Self {
        Self {
            code,
            message: None,
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Outcome of awaiting a [`crate::completion::Completion`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The native call reported an error
    #[error(transparent)]
    Native(#[from] NativeError),

    /// The callback was dropped without being invoked (handle removed or
    /// registry drained)
    #[error("command was abandoned before completion")]
    Abandoned,
}

// ============================================================================
// MESSAGE LOOKUP
// ============================================================================

/// Resolves human-readable messages for native error codes.
///
/// libvcx exposes this as `vcx_error_c_message`, which the host passes to
/// `ffi::vcx_bridge_init`.
pub trait ErrorMessageSource: Send + Sync {
    /// Message for `code`, if the source knows one
    fn message_for(&self, code: VcxErrorCode) -> Option<String>;
}

impl<F> ErrorMessageSource for F
where
    F: Fn(VcxErrorCode) -> Option<String> + Send + Sync,
{
    fn message_for(&self, code: VcxErrorCode) -> Option<String> {
        self(code)
    }
}

// ============================================================================
// TESTS
// ============================================================================
