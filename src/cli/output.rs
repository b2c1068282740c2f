//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{LexisArgs, OutputFormat};
use crate::entry::{Entry, Page};
use crate::error::Result;
use crate::lexicon::{FuzzyMatch, WordSuggestion};
use crate::service::{DictionaryStats, LookupOutcome};

/// Result structure for entry mutations.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResult {
    pub action: String,
    pub id: u64,
}

/// Result structure for bulk imports.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

/// Result structure for suggestion and similarity queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct WordListResult {
    pub query: String,
    pub words: Vec<String>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

fn render_entry(entry: &Entry) -> String {
    format!(
        "#{} {} ({}): {}",
        entry.id, entry.word, entry.word_type, entry.definition
    )
}

impl HumanOutput for Entry {
    fn render_human(&self) -> String {
        render_entry(self)
    }
}

impl HumanOutput for Page<Entry> {
    fn render_human(&self) -> String {
        let mut lines: Vec<String> = self.content.iter().map(render_entry).collect();
        lines.push(format!(
            "page {} of {} ({} entries)",
            self.page + 1,
            self.total_pages().max(1),
            self.total_elements
        ));
        lines.join("\n")
    }
}

impl HumanOutput for LookupOutcome {
    fn render_human(&self) -> String {
        match self {
            LookupOutcome::Found(page) => page.render_human(),
            LookupOutcome::NotFoundFallback { query, suggestions } => format!(
                "No entries for \"{query}\". Did you mean:\n  {}",
                suggestions.join("\n  ")
            ),
            LookupOutcome::NotFoundNoSuggestions { query } => {
                format!("No entries for \"{query}\" and no similar word found")
            }
        }
    }
}

impl HumanOutput for WordListResult {
    fn render_human(&self) -> String {
        if self.words.is_empty() {
            return format!("No words for \"{}\"", self.query);
        }
        self.words.join("\n")
    }
}

impl HumanOutput for Vec<WordSuggestion> {
    fn render_human(&self) -> String {
        self.iter()
            .map(|s| format!("{:<25} {}", s.word, s.count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HumanOutput for Vec<FuzzyMatch> {
    fn render_human(&self) -> String {
        self.iter()
            .map(|m| format!("{:<25} {}", m.word, m.score))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HumanOutput for MutationResult {
    fn render_human(&self) -> String {
        format!("{} entry #{}", self.action, self.id)
    }
}

impl HumanOutput for ImportResult {
    fn render_human(&self) -> String {
        format!(
            "Imported {} entries ({} skipped) in {} ms",
            self.imported, self.skipped, self.duration_ms
        )
    }
}

impl HumanOutput for DictionaryStats {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("Distinct words: {}", self.distinct_words),
            format!("Entries:        {}", self.total_entries),
        ];
        if !self.top_words.is_empty() {
            lines.push("Top words:".to_string());
            for (word, count) in &self.top_words {
                lines.push(format!("  {word:<25} {count}"));
            }
        }
        lines.join("\n")
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &LexisArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            println!("{}", result.render_human());
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{json}");
        }
    }
    Ok(())
}
