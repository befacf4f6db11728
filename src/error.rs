//! Error types for themed-print

use thiserror::Error;

/// Result type alias for themed-print operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid style {definition:?}: {reason}")]
    InvalidStyle { definition: String, reason: String },

    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("No spinner called {0:?}")]
    UnknownSpinner(String),

    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn invalid_style(definition: &str, reason: impl Into<String>) -> Self {
        Error::InvalidStyle {
            definition: definition.to_string(),
            reason: reason.into(),
        }
    }
}
