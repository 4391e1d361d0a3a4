//! Domain errors for git-digger.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the scan and extraction stages.
#[derive(Error, Debug)]
pub enum DiggerError {
    /// The since date did not match `DD/MM/YYYY` or names a day that does not exist.
    #[error("Invalid since date '{value}': expected DD/MM/YYYY ({reason})")]
    InvalidSinceDate {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The scan root does not exist or cannot be read.
    #[error("Cannot read scan root {}", path.display())]
    RootNotFound {
        /// The configured root.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A settings value could not be interpreted.
    #[error("Invalid value '{value}' for setting '{key}'")]
    InvalidSetting {
        /// Setting name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}
