//! Error types for the Lexis library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`LexisError`] enum. Variants are grouped by who is expected to react to
//! them: user-facing outcomes (`NotFound`, `NoSimilarWord`, `BadResource`,
//! `AlreadyExists`), startup conditions (`Uninitialized`) and internal faults
//! (`Consistency`, `Storage`).
//!
//! # Examples
//!
//! ```
//! use lexis::error::{LexisError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexisError::bad_resource("Entry has empty word, type or definition"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lexis operations.
#[derive(Error, Debug)]
pub enum LexisError {
    /// I/O errors (dictionary files, config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The durable entry store failed or is unavailable
    #[error("Storage error: {0}")]
    Storage(String),

    /// The request carried an invalid entry or definition
    #[error("{0}")]
    BadResource(String),

    /// An identical entry is already stored
    #[error("{0}")]
    AlreadyExists(String),

    /// A requested entry or word does not exist
    #[error("{0}")]
    NotFound(String),

    /// Fuzzy fallback found nothing close enough to the query
    #[error("No similar word found for request \"{query}\"")]
    NoSimilarWord { query: String },

    /// The word index has not been built yet
    #[error("Word index is not initialized: {0}")]
    Uninitialized(String),

    /// The word index disagrees with the entry store
    #[error("Index consistency fault: {0}")]
    Consistency(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LexisError.
pub type Result<T> = std::result::Result<T, LexisError>;

impl LexisError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LexisError::Storage(msg.into())
    }

    /// Create a new bad resource error.
    pub fn bad_resource<S: Into<String>>(msg: S) -> Self {
        LexisError::BadResource(msg.into())
    }

    /// Create a new already-exists error.
    pub fn already_exists<S: Into<String>>(msg: S) -> Self {
        LexisError::AlreadyExists(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        LexisError::NotFound(msg.into())
    }

    /// Create a new no-similar-word error carrying the original query.
    pub fn no_similar_word<S: Into<String>>(query: S) -> Self {
        LexisError::NoSimilarWord {
            query: query.into(),
        }
    }

    /// Create a new uninitialized index error.
    pub fn uninitialized<S: Into<String>>(msg: S) -> Self {
        LexisError::Uninitialized(msg.into())
    }

    /// Create a new consistency fault.
    pub fn consistency<S: Into<String>>(msg: S) -> Self {
        LexisError::Consistency(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        LexisError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LexisError::Other(msg.into())
    }

    /// Whether this error is an expected "nothing there" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LexisError::NotFound(_) | LexisError::NoSimilarWord { .. }
        )
    }

    /// HTTP-equivalent status class for the API layer.
    pub fn status_code(&self) -> u16 {
        match self {
            LexisError::NotFound(_) | LexisError::NoSimilarWord { .. } => 404,
            LexisError::BadResource(_) => 400,
            LexisError::AlreadyExists(_) => 409,
            LexisError::Uninitialized(_) | LexisError::Storage(_) => 503,
            _ => 500,
        }
    }
}
