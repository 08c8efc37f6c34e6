use miette::{Diagnostic, Result};
use thiserror::Error;

use crate::components::schedule::models::MeetingId;
use crate::components::schedule::validate::InvalidMeeting;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Meeting rejected: {0}")]
    #[diagnostic(code(kokous::validation))]
    Validation(#[from] InvalidMeeting),

    #[error("Meeting {0} not found")]
    #[diagnostic(code(kokous::not_found))]
    NotFound(MeetingId),

    #[error("Meeting {0} already has a notification")]
    #[diagnostic(code(kokous::already_notified))]
    AlreadyNotified(MeetingId),

    #[error("Storage error: {0}")]
    #[diagnostic(code(kokous::storage))]
    Storage(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(kokous::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(kokous::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(kokous::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(kokous::serialization))]
    Serialization(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(kokous::component))]
    Component(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Redis failures are opaque storage errors as far as the engine is concerned
impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Storage(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid or missing environment variable: {}", var))
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}
