//! Error types for Ember

use thiserror::Error;

/// The main error type for Ember operations
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid direction: ({x}, {y}, {z}) cannot be normalized")]
    InvalidDirection { x: f32, y: f32, z: f32 },

    #[error("Invalid time step: {0} (must be finite and non-negative)")]
    InvalidTimeStep(f64),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Image error: {0}")]
    Image(String),
}

/// Result type alias for Ember operations
pub type Result<T> = std::result::Result<T, EmberError>;

impl EmberError {
    /// Shorthand for a `Configuration` error
    pub fn config(msg: impl Into<String>) -> Self {
        EmberError::Configuration(msg.into())
    }
}

impl From<toml::de::Error> for EmberError {
    fn from(err: toml::de::Error) -> Self {
        EmberError::TomlParse(err.to_string())
    }
}
