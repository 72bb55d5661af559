//! Error types for taskbrew.
//!
//! Defines the main error enum used throughout the application. Messages are
//! kept free of category prefixes because handlers print them verbatim after
//! `Error: `; use [`BrewError::category`] when a label is wanted.

use thiserror::Error;

/// Main error type for taskbrew operations.
#[derive(Error, Debug)]
pub enum BrewError {
    /// Configuration errors (invalid config file, bad paths, etc.)
    #[error("{0}")]
    Config(String),

    /// Record store errors (SQLite failures, missing records, constraint violations).
    #[error("{0}")]
    Store(String),

    /// A field value or command argument the user got wrong.
    #[error("{0}")]
    Input(String),

    /// Prompt engine misuse (a question asked while another is pending).
    #[error("{0}")]
    Prompt(String),

    /// Terminal setup and I/O errors in the interactive console.
    #[error("{0}")]
    Console(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("{0}")]
    Internal(String),
}

impl BrewError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a store error with the given message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates an input error with the given message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Creates a prompt error with the given message.
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Creates a console error with the given message.
    pub fn console(msg: impl Into<String>) -> Self {
        Self::Console(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Store(_) => "Store Error",
            Self::Input(_) => "Input Error",
            Self::Prompt(_) => "Prompt Error",
            Self::Console(_) => "Console Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<crate::commands::schema::FieldError> for BrewError {
    fn from(err: crate::commands::schema::FieldError) -> Self {
        Self::Input(err.message)
    }
}

/// Result type alias using BrewError.
pub type Result<T> = std::result::Result<T, BrewError>;
