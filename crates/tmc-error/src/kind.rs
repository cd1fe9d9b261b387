//! Error kinds for tmc operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// This enum categorizes errors to help users write clear error handling logic.
/// Users can match on ErrorKind to decide how to handle specific error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration or parameters
    ConfigInvalid,

    // =========================================================================
    // AST errors
    // =========================================================================
    /// An AST structural invariant was violated (self-cycle, parent
    /// mismatch, duplicate id, empty kind)
    Structural,

    /// Failed to decode a serialized AST tree
    ParseFailed,

    // =========================================================================
    // IR build errors
    // =========================================================================
    /// A record references a non-existent suite, data set, or target
    Reference,

    /// Two distinct raw targets produced the same deterministic id
    IdCollision,

    /// An IR document failed schema validation
    SchemaValidation,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Serialization failed
    SerializationFailed,

    /// Deserialization failed
    DeserializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
