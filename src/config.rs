//! Configuration for the dictionary service.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LexisError, Result};

/// Default page size for entry listings.
pub const DEFAULT_ENTRIES_PER_PAGE: usize = 10;

/// Configuration for [`DictionaryService`](crate::service::DictionaryService).
///
/// Suggestion and fuzzy-search limits are fixed constants of the lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Number of entries per page for listing and lookup operations.
    pub entries_per_page: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            entries_per_page: DEFAULT_ENTRIES_PER_PAGE,
        }
    }
}

impl ServiceConfig {
    /// Load and validate a JSON configuration file. Missing keys take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: ServiceConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.entries_per_page == 0 {
            return Err(LexisError::invalid_config(
                "entries_per_page must be greater than zero",
            ));
        }
        Ok(())
    }
}
