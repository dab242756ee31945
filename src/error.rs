//! Error types for geto

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for inventory parsing and validation
#[derive(Debug, Error)]
pub enum GetoError {
    /// Configuration file does not exist (or is not a regular file)
    #[error("No configuration file: {}", path.display())]
    NotFound { path: PathBuf },

    /// IO error while reading the configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax error in the configuration text
    #[error("Malformed configuration at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A required section is absent
    #[error("Section not found: \"{section}\"")]
    SectionNotFound { section: String },

    /// A required key is absent from a section
    #[error("Option \"{key}\" not found in section \"{section}\"")]
    KeyNotFound { section: String, key: String },

    /// The `[hosts]` section is absent
    #[error("Could not find \"hosts\" section")]
    MissingHostsSection,

    /// A host listed in `[hosts]` has no section of its own
    #[error("Could not find \"{host}\" section")]
    MissingHostSection { host: String },

    /// A host key in `[hosts]` has no address value
    #[error("Failed to read address for host \"{host}\"")]
    MissingAddress { host: String },

    /// A host section has no `username`
    #[error("Failed to parse \"username\" option for \"{host}\" section")]
    MissingUsername { host: String },

    /// The `[hosts]` section lists no hosts
    #[error("Config must have at least one host")]
    NoHostsConfigured,

    /// A host has no password and no global private key is configured
    #[error("Host \"{host}\" has no password and no privkey_path is configured")]
    MissingCredential { host: String },

    /// SSH private key could not be read or parsed
    #[error("SSH key error: {0}")]
    SshKey(String),

    /// Invalid command line settings
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using GetoError
pub type Result<T> = std::result::Result<T, GetoError>;

impl GetoError {
    /// Create a not-found error for a path
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        GetoError::NotFound { path: path.into() }
    }

    /// Create a malformed-input error for a 1-based line number
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        GetoError::Malformed {
            line,
            reason: reason.into(),
        }
    }

    /// Create an SSH key error from a string
    pub fn ssh_key(msg: impl Into<String>) -> Self {
        GetoError::SshKey(msg.into())
    }

    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        GetoError::Config(msg.into())
    }
}
