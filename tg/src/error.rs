//! User-facing error taxonomy
//!
//! Every failure that reaches the user is one of four kinds. Each carries a
//! human-readable message and is returned by value, never raised.

use std::fmt;

use thiserror::Error;

/// The category of a user-facing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or unusable credential/configuration
    ConfigInvalid,
    /// The startup probe call failed
    ConnectionFailed,
    /// A generation call failed
    GenerationFailed,
    /// The user supplied an empty destination or an invalid duration
    ValidationFailed,
}

impl ErrorKind {
    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigInvalid => "configuration invalid",
            Self::ConnectionFailed => "connection failed",
            Self::GenerationFailed => "generation failed",
            Self::ValidationFailed => "validation failed",
        }
    }

    /// Whether this failure should stop the program instead of re-showing the form
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigInvalid | Self::ConnectionFailed)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors surfaced to the user by the itinerary pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuideError {
    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Error generating itinerary: {0}")]
    GenerationFailed(String),

    #[error("Please provide a valid destination and trip duration: {0}")]
    ValidationFailed(String),
}

impl GuideError {
    /// Build an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::ConfigInvalid => Self::ConfigInvalid(message),
            ErrorKind::ConnectionFailed => Self::ConnectionFailed(message),
            ErrorKind::GenerationFailed => Self::GenerationFailed(message),
            ErrorKind::ValidationFailed => Self::ValidationFailed(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigInvalid(_) => ErrorKind::ConfigInvalid,
            Self::ConnectionFailed(_) => ErrorKind::ConnectionFailed,
            Self::GenerationFailed(_) => ErrorKind::GenerationFailed,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
        }
    }

    /// The underlying message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigInvalid(m) | Self::ConnectionFailed(m) | Self::GenerationFailed(m) | Self::ValidationFailed(m) => {
                m
            }
        }
    }
}
