//! Command implementations for the Lexis CLI.
//!
//! Each invocation loads the dictionary file into a memory store, builds the
//! service (which rebuilds the word index), runs one command and writes the
//! file back if the command changed anything.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ServiceConfig;
use crate::entry::{Entry, NewEntry};
use crate::error::{LexisError, Result};
use crate::service::{DictionaryService, LookupOutcome};
use crate::store::memory::MemoryEntryStore;

/// Execute a CLI command.
pub fn execute_command(args: LexisArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    let store = Arc::new(MemoryEntryStore::load_or_default(&args.dictionary)?);
    let service = DictionaryService::new(store.clone(), config);
    let words = service.initialize()?;
    debug!(
        "loaded {} with {words} distinct words",
        args.dictionary.display()
    );

    let mutated = match &args.command {
        Command::Add(add_args) => add_entry(&service, add_args, &args)?,
        Command::Update(update_args) => update_entry(&service, update_args, &args)?,
        Command::Define(define_args) => define_entry(&service, define_args, &args)?,
        Command::Delete(id_args) => delete_entry(&service, id_args, &args)?,
        Command::Get(id_args) => get_entry(&service, id_args, &args)?,
        Command::List(list_args) => list_entries(&service, list_args, &args)?,
        Command::Lookup(lookup_args) => lookup_word(&service, lookup_args, &args)?,
        Command::Suggest(suggest_args) => suggest_words(&service, suggest_args, &args)?,
        Command::Similar(similar_args) => similar_words(&service, similar_args, &args)?,
        Command::Import(import_args) => import_entries(&service, import_args, &args)?,
        Command::Stats => show_stats(&service, &args)?,
    };

    if mutated {
        store.save(&args.dictionary)?;
        info!("saved {}", args.dictionary.display());
    }
    Ok(())
}

fn add_entry(service: &DictionaryService, args: &AddArgs, cli_args: &LexisArgs) -> Result<bool> {
    let stored = service.add_entry(NewEntry::new(
        args.word.as_str(),
        args.word_type.as_str(),
        args.definition.as_str(),
    ))?;
    output_result(
        "Entry added",
        &MutationResult {
            action: "Added".to_string(),
            id: stored.id,
        },
        cli_args,
    )?;
    Ok(true)
}

fn update_entry(
    service: &DictionaryService,
    args: &UpdateArgs,
    cli_args: &LexisArgs,
) -> Result<bool> {
    let current = service.find_by_id(args.id)?;
    service.update_entry(Entry {
        word: args.word.clone(),
        word_type: args.word_type.clone(),
        definition: args.definition.clone(),
        ..current
    })?;
    output_result(
        "Entry updated",
        &MutationResult {
            action: "Updated".to_string(),
            id: args.id,
        },
        cli_args,
    )?;
    Ok(true)
}

fn define_entry(
    service: &DictionaryService,
    args: &DefineArgs,
    cli_args: &LexisArgs,
) -> Result<bool> {
    service.update_definition(args.id, &args.definition)?;
    output_result(
        "Definition updated",
        &MutationResult {
            action: "Redefined".to_string(),
            id: args.id,
        },
        cli_args,
    )?;
    Ok(true)
}

fn delete_entry(service: &DictionaryService, args: &IdArgs, cli_args: &LexisArgs) -> Result<bool> {
    service.delete_by_id(args.id)?;
    output_result(
        "Entry deleted",
        &MutationResult {
            action: "Deleted".to_string(),
            id: args.id,
        },
        cli_args,
    )?;
    Ok(true)
}

fn get_entry(service: &DictionaryService, args: &IdArgs, cli_args: &LexisArgs) -> Result<bool> {
    let entry = service.find_by_id(args.id)?;
    output_result("Entry", &entry, cli_args)?;
    Ok(false)
}

fn list_entries(
    service: &DictionaryService,
    args: &ListArgs,
    cli_args: &LexisArgs,
) -> Result<bool> {
    let page = match (&args.letter, &args.word_type) {
        (Some(letter), _) => service.find_by_letter(*letter, args.page)?,
        (None, Some(word_type)) => service.find_by_type(word_type, args.page)?,
        (None, None) => service.find_all(args.page)?,
    };
    output_result("Entries", &page, cli_args)?;
    Ok(false)
}

fn lookup_word(
    service: &DictionaryService,
    args: &LookupArgs,
    cli_args: &LexisArgs,
) -> Result<bool> {
    let outcome = match &args.word_type {
        Some(word_type) => LookupOutcome::Found(service.find_by_word_and_type(
            &args.word,
            word_type,
            args.page,
        )?),
        None => service.lookup_word(&args.word, args.page)?,
    };
    output_result(&format!("Lookup of \"{}\"", args.word), &outcome, cli_args)?;

    if outcome.is_found() {
        Ok(false)
    } else {
        // Mirror the 404 of the lookup endpoint through the exit status.
        Err(LexisError::not_found(format!(
            "Entries not found with word \"{}\"",
            args.word
        )))
    }
}

fn suggest_words(
    service: &DictionaryService,
    args: &SuggestArgs,
    cli_args: &LexisArgs,
) -> Result<bool> {
    let message = format!("Suggestions for \"{}\"", args.prefix);
    if args.counts {
        output_result(&message, &service.suggest_ranked(&args.prefix)?, cli_args)?;
    } else {
        let result = WordListResult {
            query: args.prefix.clone(),
            words: service.suggest(&args.prefix)?,
        };
        output_result(&message, &result, cli_args)?;
    }
    Ok(false)
}

fn similar_words(
    service: &DictionaryService,
    args: &SimilarArgs,
    cli_args: &LexisArgs,
) -> Result<bool> {
    let message = format!("Words similar to \"{}\"", args.query);
    if args.scores {
        let matches = service.lexicon().fuzzy_engine().find_scored(&args.query)?;
        output_result(&message, &matches, cli_args)?;
    } else {
        let result = WordListResult {
            query: args.query.clone(),
            words: service.fuzzy_find(&args.query)?,
        };
        output_result(&message, &result, cli_args)?;
    }
    Ok(false)
}

fn read_jsonl(path: &Path) -> Result<Vec<(usize, std::result::Result<NewEntry, String>)>> {
    let reader = BufReader::new(File::open(path)?);
    let mut parsed = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str::<NewEntry>(&line).map_err(|e| e.to_string());
        parsed.push((line_num + 1, entry));
    }
    Ok(parsed)
}

fn import_entries(
    service: &DictionaryService,
    args: &ImportArgs,
    cli_args: &LexisArgs,
) -> Result<bool> {
    let start_time = Instant::now();
    let mut imported = 0;
    let mut skipped = 0;

    for (line_num, parsed) in read_jsonl(&args.file)? {
        let outcome = parsed.map_err(LexisError::bad_resource).and_then(|entry| {
            service.add_entry(entry)
        });
        match outcome {
            Ok(_) => imported += 1,
            Err(e @ (LexisError::BadResource(_) | LexisError::AlreadyExists(_))) => {
                warn!("line {line_num}: skipped: {e}");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    output_result(
        "Import finished",
        &ImportResult {
            imported,
            skipped,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )?;
    Ok(imported > 0)
}

fn show_stats(service: &DictionaryService, cli_args: &LexisArgs) -> Result<bool> {
    output_result("Dictionary statistics", &service.stats()?, cli_args)?;
    Ok(false)
}
