//! The error type shared by every viewkit crate.
//!
//! A view aborts with a [`ViewError`]; the dispatcher answers with
//! [`ViewError::status_code`]. Form validation failures are not errors:
//! they are reported on the form and re-rendered.

use thiserror::Error;

/// Everything a view, store or template can fail with.
#[derive(Error, Debug)]
pub enum ViewError {
    // ── HTTP errors ──────────────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 404 Not Found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 405 Method Not Allowed.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// HTTP 500 Internal Server Error.
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    // ── Document store errors ────────────────────────────────────────

    /// A lookup expected exactly one result but found none.
    #[error("Object does not exist: {0}")]
    DoesNotExist(String),

    /// A lookup expected exactly one result but found multiple.
    #[error("Multiple objects returned when one expected: {0}")]
    MultipleObjectsReturned(String),

    /// A slice was requested outside the valid range of a result set.
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    /// Any other store failure.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A record rejected a field name or value handed to `set_field`.
    #[error("Cannot set {field}: {message}")]
    FieldError { field: String, message: String },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A view is missing a required piece of configuration.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Templates ────────────────────────────────────────────────────

    /// A template contains invalid syntax or failed to render.
    #[error("Template syntax error: {0}")]
    TemplateSyntaxError(String),

    /// The requested template was not found.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    // ── Serialization ────────────────────────────────────────────────

    /// A value could not be serialized (e.g. no JSON encoding for a type).
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ViewError {
    /// The status a view answers with.
    ///
    /// Failed lookups (`DoesNotExist`, `IndexOutOfRange`) become 404 so
    /// views can propagate store errors with `?`. Several matches for a
    /// single-record lookup is a 500.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) | Self::DoesNotExist(_) | Self::IndexOutOfRange(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::InternalServerError(_)
            | Self::MultipleObjectsReturned(_)
            | Self::DatabaseError(_)
            | Self::FieldError { .. }
            | Self::ConfigurationError(_)
            | Self::ImproperlyConfigured(_)
            | Self::TemplateSyntaxError(_)
            | Self::TemplateDoesNotExist(_)
            | Self::SerializationError(_)
            | Self::IoError(_) => 500,
        }
    }

    /// Returns `true` for errors answered with 404.
    pub const fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// `Result` with [`ViewError`].
pub type ViewResult<T> = Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_error_status_codes() {
        assert_eq!(ViewError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(ViewError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ViewError::DoesNotExist("x".into()).status_code(), 404);
        assert_eq!(ViewError::IndexOutOfRange("x".into()).status_code(), 404);
        assert_eq!(ViewError::MethodNotAllowed("x".into()).status_code(), 405);
        assert_eq!(ViewError::DatabaseError("x".into()).status_code(), 500);
        assert_eq!(
            ViewError::MultipleObjectsReturned("x".into()).status_code(),
            500
        );
        let field = ViewError::FieldError {
            field: "age".into(),
            message: "expected an integer".into(),
        };
        assert_eq!(field.status_code(), 500);
        assert_eq!(field.to_string(), "Cannot set age: expected an integer");
        assert_eq!(ViewError::ImproperlyConfigured("x".into()).status_code(), 500);
        assert_eq!(ViewError::TemplateDoesNotExist("x".into()).status_code(), 500);
    }

    #[test]
    fn test_is_not_found() {
        assert!(ViewError::NotFound("page".into()).is_not_found());
        assert!(ViewError::DoesNotExist("doc".into()).is_not_found());
        assert!(!ViewError::BadRequest("page".into()).is_not_found());
    }

    #[test]
    fn test_view_error_display() {
        let err = ViewError::NotFound("page".into());
        assert_eq!(err.to_string(), "Not found: page");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ViewError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ViewError = json_err.into();
        assert!(matches!(err, ViewError::SerializationError(_)));
    }
}
