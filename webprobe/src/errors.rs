use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Target could not be resolved against the base URL
    #[error("invalid target '{target}'")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    /// No action is registered under the given name
    #[error("unknown action '{name}'")]
    UnknownAction { name: String },

    /// Selected file could not be read from disk
    #[error("failed to read {}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is inconsistent or incomplete
    #[error("Config validation: {message}")]
    InvalidConfig { message: String },

    /// Request dispatch or response read failed
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Describe the error together with every underlying cause, outermost first.
    ///
    /// Transport errors from reqwest keep the interesting part (connection refused, DNS
    /// failure) in their source chain, so the top-level message alone is not useful.
    pub fn describe(&self) -> String {
        let mut description = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let message = cause.to_string();
            if !description.contains(&message) {
                description.push_str(": ");
                description.push_str(&message);
            }
            source = cause.source();
        }
        description
    }
}

/// Type alias for probe results
pub type Result<T> = std::result::Result<T, Error>;
