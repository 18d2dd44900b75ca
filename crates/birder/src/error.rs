// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the bot runtime

use thiserror::Error;
use x_api::XApiError;

/// Errors raised while starting or running the bot
#[derive(Error, Debug)]
pub enum BirderError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// The X client failed
    #[error(transparent)]
    Client(#[from] XApiError),

    /// Reading messages or writing replies failed
    #[error("I/O error: {source}")]
    Io {
        /// Underlying IO error
        #[from]
        source: std::io::Error,
    },

    /// A reply could not be serialized
    #[error("Failed to encode reply: {source}")]
    Encode {
        /// Underlying serde error
        #[from]
        source: serde_json::Error,
    },
}

impl From<config::ConfigError> for BirderError {
    fn from(error: config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

/// Result type alias for runtime operations
pub type BirderResult<T> = Result<T, BirderError>;
