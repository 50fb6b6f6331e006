//! Error type shared by every layout operation.

use thiserror::Error;

/// Coarse classification of a [`LayoutError`], for callers that map failures
/// onto transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Decode,
    Internal,
}

#[derive(Error, Debug)]
pub enum LayoutError {
    /// Configuration is malformed or out of range.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// An input buffer is not valid pixel data.
    #[error("Decode failed: {0}")]
    Decode(String),
    /// Composition or encoding failed unexpectedly.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LayoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            LayoutError::validation("bad grid").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            LayoutError::Decode("garbage".into()).kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            LayoutError::Internal("oops".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn display_includes_message() {
        let err = LayoutError::validation("grid_size must be between 1 and 26");
        assert_eq!(
            err.to_string(),
            "Validation failed: grid_size must be between 1 and 26"
        );
    }
}
