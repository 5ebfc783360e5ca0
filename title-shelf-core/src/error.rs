use std::path::PathBuf;

use thiserror::Error;

/// Errors a scanner reports for a single candidate package.
///
/// These never escape a library scan; they are logged and collected in the
/// scan summary.
#[derive(Debug, Error)]
pub enum ScanError {
    /// I/O error while reading the package
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a package the scanner recognizes, or it is corrupt
    #[error("Invalid package format: {0}")]
    InvalidFormat(String),

    /// Recognized container, but a variant the scanner cannot read
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// Parsing took longer than the configured limit
    #[error("Parsing {} timed out after {secs}s", path.display())]
    Timeout { path: PathBuf, secs: u64 },

    /// Parsed, but the record could not be turned into a library entry
    #[error("Rejected record: {0}")]
    Rejected(String),

    /// Generic scan error with message
    #[error("{0}")]
    Other(String),
}

impl ScanError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedVariant(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
