//! Command line argument parsing for the Lexis CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Lexis - dictionary entries with prefix suggestions and fuzzy lookup
#[derive(Parser, Debug, Clone)]
#[command(name = "lexis")]
#[command(about = "Dictionary entries with prefix suggestions and fuzzy lookup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LexisArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Dictionary file (JSON array of entries); created on first write
    #[arg(
        short,
        long,
        env = "LEXIS_DICTIONARY",
        default_value = "dictionary.json",
        value_name = "FILE"
    )]
    pub dictionary: PathBuf,

    /// Service configuration file (JSON)
    #[arg(short, long, env = "LEXIS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexisArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a new entry
    Add(AddArgs),

    /// Replace an entry's word, type and definition
    Update(UpdateArgs),

    /// Replace an entry's definition only
    Define(DefineArgs),

    /// Delete an entry
    Delete(IdArgs),

    /// Show one entry
    Get(IdArgs),

    /// List entries, optionally by first letter or word type
    List(ListArgs),

    /// Look up a word, suggesting similar words when it is unknown
    Lookup(LookupArgs),

    /// Autocomplete a word prefix
    Suggest(SuggestArgs),

    /// Find words similar to a query
    Similar(SimilarArgs),

    /// Import entries from a JSON Lines file
    Import(ImportArgs),

    /// Show dictionary statistics
    Stats,
}

/// Arguments for adding an entry
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Headword
    pub word: String,

    /// Word type, e.g. "n." or "v."
    pub word_type: String,

    /// Definition text
    pub definition: String,
}

/// Arguments for replacing an entry
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Entry id
    pub id: u64,

    /// New headword
    pub word: String,

    /// New word type
    pub word_type: String,

    /// New definition
    pub definition: String,
}

/// Arguments for replacing a definition
#[derive(Parser, Debug, Clone)]
pub struct DefineArgs {
    /// Entry id
    pub id: u64,

    /// New definition
    pub definition: String,
}

/// Arguments for commands addressing one entry
#[derive(Parser, Debug, Clone)]
pub struct IdArgs {
    /// Entry id
    pub id: u64,
}

/// Arguments for listing entries
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Only entries whose word starts with this letter
    #[arg(short, long, conflicts_with = "word_type")]
    pub letter: Option<char>,

    /// Only entries of this word type
    #[arg(short = 't', long = "type")]
    pub word_type: Option<String>,

    /// Zero-based page number
    #[arg(short, long, default_value = "0")]
    pub page: usize,
}

/// Arguments for word lookup
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Word to look up
    pub word: String,

    /// Only entries of this word type (no fuzzy fallback)
    #[arg(short = 't', long = "type")]
    pub word_type: Option<String>,

    /// Zero-based page number
    #[arg(short, long, default_value = "0")]
    pub page: usize,
}

/// Arguments for prefix suggestions
#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    /// Word prefix (case-sensitive)
    pub prefix: String,

    /// Show entry counts next to each word
    #[arg(long)]
    pub counts: bool,
}

/// Arguments for similarity search
#[derive(Parser, Debug, Clone)]
pub struct SimilarArgs {
    /// Possibly misspelled word
    pub query: String,

    /// Show similarity scores next to each word
    #[arg(long)]
    pub scores: bool,
}

/// Arguments for bulk import
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// JSON Lines file, one {"word", "wordtype", "definition"} object per line
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
