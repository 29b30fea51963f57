use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kotoba::audio::playback;
use kotoba::cli::{Cli, Command, PlayArgs, PracticeArgs, RecognizerArgs, SearchArgs};
use kotoba::config::AppConfig;
use kotoba::pronunciation::{FeedbackSink, PracticeSession, Severity};
use kotoba::transcription::{Transcriber, TranscriptionRequest, WhisperTranscriber};
use kotoba::types::VocabularyEntry;
use kotoba::vocabulary::VocabularyStore;

struct ConsoleSink;

impl FeedbackSink for ConsoleSink {
    fn emit(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => println!("{message}"),
            Severity::Success => println!("✓ {message}"),
            Severity::Error => println!("✗ {message}"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_override(cli.assets_path.clone())?;
    let store = load_store(&config);

    let mut sink = ConsoleSink;
    match cli.command {
        Command::List => run_list(&store),
        Command::Search(args) => run_search(&store, &args, &mut sink),
        Command::Play(args) => run_play(&store, &config, &args),
        Command::Practice(args) => run_practice(&store, &args, &mut sink),
    }
}

/// A failed load is reported and leaves the list empty; every command then
/// prints its empty-state message instead of aborting.
fn load_store(config: &AppConfig) -> VocabularyStore {
    match VocabularyStore::load(&config.vocabulary_file()) {
        Ok(store) => store,
        Err(err) => {
            warn!(error = ?err, "vocabulary load failed");
            println!("✗ Could not load vocabulary data: {err:#}");
            VocabularyStore::from_entries(Vec::new())
                .expect("empty vocabulary store is always valid")
        }
    }
}

fn run_list(store: &VocabularyStore) -> Result<()> {
    if store.is_empty() {
        println!("No vocabulary entries found.");
        return Ok(());
    }
    for entry in store.entries() {
        print_card(entry);
    }
    println!("{} entries.", store.len());
    Ok(())
}

fn run_search(store: &VocabularyStore, args: &SearchArgs, sink: &mut ConsoleSink) -> Result<()> {
    let term = match (&args.term, args.voice) {
        (Some(term), _) => term.clone(),
        (None, true) => match voice_search_term(&args.recognizer, sink)? {
            Some(term) => term,
            None => return Ok(()),
        },
        (None, false) => bail!("no search term provided"), // Should not happen due to validation
    };

    let matches = store.search(&term);
    if matches.is_empty() {
        println!("No vocabulary entries match '{}'.", term.trim());
        return Ok(());
    }
    for entry in matches {
        print_card(entry);
    }
    Ok(())
}

/// Capture one Indonesian utterance and use it as the search term.
fn voice_search_term(
    recognizer: &RecognizerArgs,
    sink: &mut ConsoleSink,
) -> Result<Option<String>> {
    let mut transcriber = WhisperTranscriber::new(recognizer.to_settings()?);
    if !transcriber.is_available() {
        sink.emit(
            "Speech recognition is not available in this environment.",
            Severity::Error,
        );
        return Ok(None);
    }
    sink.emit(
        "Listening... say the word you want to find.",
        Severity::Info,
    );
    match transcriber.transcribe_once(&TranscriptionRequest::voice_search()) {
        Ok(term) => {
            info!(term = %term, "voice search transcribed");
            Ok(Some(term))
        }
        Err(err) => {
            sink.emit(&format!("Error: {}", err.describe()), Severity::Error);
            Ok(None)
        }
    }
}

fn run_play(store: &VocabularyStore, config: &AppConfig, args: &PlayArgs) -> Result<()> {
    let entry = store
        .get(args.id)
        .with_context(|| format!("no vocabulary entry with id {}", args.id))?;
    ensure!(
        !entry.audio.is_empty(),
        "entry {} has no pronunciation clip",
        args.id
    );
    println!("{}", entry.display_form());
    playback::play_file(&config.resolve_clip(&entry.audio))
}

fn run_practice(store: &VocabularyStore, args: &PracticeArgs, sink: &mut ConsoleSink) -> Result<()> {
    let entry = match args.id {
        Some(id) => store
            .get(id)
            .with_context(|| format!("no vocabulary entry with id {id}"))?,
        None => store
            .pick_random()
            .context("no vocabulary entries are available to practice")?,
    };
    print_card(entry);

    let transcriber = WhisperTranscriber::new(args.recognizer.to_settings()?);
    let mut session = PracticeSession::new(transcriber);
    let outcome = session.run(entry, sink);
    info!(outcome = ?outcome, "practice attempt finished");
    Ok(())
}

fn print_card(entry: &VocabularyEntry) {
    println!("{}", entry.display_form());
    println!("  romaji:  {}", entry.romaji);
    println!("  meaning: {}", entry.meaning);
    if !entry.category.is_empty() || !entry.level.is_empty() {
        println!("  category: {}  level: {}", entry.category, entry.level);
    }
    println!();
}
