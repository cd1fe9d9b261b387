//! The main Error type for tmc.
//!
//! Every error here is fatal for the current pipeline invocation; the
//! non-fatal path is the diagnostics accumulator in the extraction
//! layer. What matters on an error is what happened (`ErrorKind`),
//! where (`operation`), and the key/value context that locates it.

use crate::ErrorKind;
use std::fmt;

/// Unified error type for all tmc operations.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Get the source error (if any).
    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_ref().map(|e| e.as_ref())
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.kind, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl Error {
    /// Create an Unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create a Structural error
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structural, message)
    }

    /// Create a ParseFailed error
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    /// Create a Reference error for a dangling suite/data/target reference
    pub fn reference(referent: impl Into<String>) -> Self {
        let referent = referent.into();
        Self::new(
            ErrorKind::Reference,
            format!("reference to unknown '{}'", referent),
        )
        .with_context("referent", referent)
    }

    /// Create an IdCollision error
    pub fn id_collision(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(
            ErrorKind::IdCollision,
            format!("deterministic id '{}' produced twice", id),
        )
        .with_context("id", id)
    }

    /// Create a SchemaValidation error
    pub fn schema_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaValidation, message)
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a FileNotFound error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorKind::FileNotFound,
            format!("file '{}' not found", path),
        )
        .with_context("path", path)
    }

    /// Create a SerializationFailed error
    pub fn serialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationFailed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::Structural, "parent mismatch");
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.message(), "parent mismatch");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::new(ErrorKind::Reference, "not found")
            .with_operation("ir::link")
            .with_context("suite", "LoginSuite")
            .with_context("file", "LoginTest.java");

        assert_eq!(err.operation(), "ir::link");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("suite", "LoginSuite".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::new(ErrorKind::SchemaValidation, "failed")
            .with_operation("ir::validate_doc")
            .with_operation("ir::build");

        assert_eq!(err.operation(), "ir::build");
        assert_eq!(err.context().len(), 1);
        assert_eq!(err.context()[0], ("called", "ir::validate_doc".to_string()));
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::Structural, "node is its own child")
            .with_operation("ast::attach")
            .with_context("node_id", "n7");

        let display = format!("{}", err);
        assert!(display.contains("Structural"));
        assert!(display.contains("ast::attach"));
        assert!(display.contains("node_id: n7"));
        assert!(display.contains("node is its own child"));
    }

    #[test]
    fn test_convenience_constructors() {
        let err = Error::reference("SUITE_Login");
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(err.message().contains("SUITE_Login"));

        let err = Error::id_collision("a1b2c3d4e5f6");
        assert_eq!(err.kind(), ErrorKind::IdCollision);

        let err = Error::config_invalid("projectName is required");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_io_error_kind_mapping() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert_eq!(err.kind(), ErrorKind::FileNotFound);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_set_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::new(ErrorKind::FileNotFound, "config.json not found").set_source(io_err);

        assert!(err.source_ref().is_some());
    }
}
