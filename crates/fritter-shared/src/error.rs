use thiserror::Error;

/// Rejection produced when user-supplied text fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be at least one character long")]
    Empty { field: &'static str },

    #[error("{field} must be no more than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}
