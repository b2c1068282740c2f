//! # Lexis
//!
//! Dictionary entries with word autocompletion and "did you mean" lookup.
//!
//! ## Features
//!
//! - Entry storage behind the [`store::EntryStore`] trait, with an in-memory
//!   backend that persists to a JSON file
//! - A concurrent word index counting entries per distinct word
//! - Prefix suggestions ranked by how many entries a word has
//! - Fuzzy fallback ranked by a 0-100 similarity score
//! - A service layer that keeps store and index in step

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod lexicon;
pub mod service;
pub mod store;

pub mod prelude {
    pub use crate::config::ServiceConfig;
    pub use crate::entry::{Entry, NewEntry, Page};
    pub use crate::error::{LexisError, Result};
    pub use crate::lexicon::Lexicon;
    pub use crate::service::{DictionaryService, LookupOutcome};
    pub use crate::store::EntryStore;
    pub use crate::store::memory::MemoryEntryStore;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
