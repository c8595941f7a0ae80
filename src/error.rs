//! Error types for the bibkeep crate

use thiserror::Error;

/// Result type for bibkeep operations
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for bibkeep
#[derive(Error, Debug)]
pub enum Error {
    /// Parse error with location information
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        /// Line number (1-indexed)
        line: usize,
        /// Column number (1-indexed)
        column: usize,
        /// Error message
        message: String,
        /// Optional source snippet
        snippet: Option<String>,
    },

    /// Field map contains a key outside the type's schema
    #[error("Input contains extra fields for '{entry_type}'")]
    ExtraFields {
        /// The entry type whose schema was violated
        entry_type: String,
    },

    /// A mandatory field is absent or empty
    #[error("Missing mandatory field '{field}'")]
    MissingField {
        /// The missing field
        field: String,
    },

    /// Year is not exactly four digits
    #[error("Year must be YYYY, got '{0}'")]
    YearFormat(String),

    /// Month is neither 1-12 nor an English month name
    #[error("Month '{0}' is not valid")]
    MonthFormat(String),

    /// Volume is not digits only
    #[error("Volume '{0}' needs to be a number")]
    VolumeFormat(String),

    /// Pages is not a page number or a page range
    #[error("Page numbers '{0}' are not valid")]
    PagesFormat(String),

    /// Save with a citation key that is already present
    #[error("Reference key '{0}' already exists")]
    KeyAlreadyExists(String),

    /// Lookup or delete of an absent citation key
    #[error("Reference key '{0}' does not exist")]
    KeyNotFound(String),

    /// A stored type discriminant that matches no known variant
    #[error("Invalid reference type '{0}'")]
    InvalidReferenceType(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Relational store error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
