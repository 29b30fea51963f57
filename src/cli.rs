use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand};

use crate::transcription::RecognizerSettings;

#[derive(Parser, Debug)]
#[command(
    name = "kotoba",
    about = "Japanese vocabulary trainer with pronunciation practice"
)]
pub struct Cli {
    /// Optional override for the assets directory (contains data/ and audio/).
    #[arg(long = "assets-path", global = true)]
    pub assets_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every vocabulary card.
    List,
    /// Filter cards by a search term, or by one spoken utterance.
    Search(SearchArgs),
    /// Play the recorded pronunciation clip for an entry.
    Play(PlayArgs),
    /// Run one pronunciation practice attempt.
    Practice(PracticeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Term matched against kanji, hiragana, romaji, and meaning.
    #[arg(value_name = "TERM", required_unless_present = "voice")]
    pub term: Option<String>,

    /// Capture the search term from the microphone instead.
    #[arg(long, conflicts_with = "term")]
    pub voice: bool,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Vocabulary entry id.
    #[arg(value_name = "ID")]
    pub id: u32,
}

#[derive(Args, Debug, Clone)]
pub struct PracticeArgs {
    /// Practice a specific entry instead of a random one.
    #[arg(long)]
    pub id: Option<u32>,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RecognizerArgs {
    /// Optional input device name.
    #[arg(long)]
    pub device: Option<String>,

    /// Seconds of audio to record for one utterance.
    #[arg(long = "listen-seconds", default_value_t = 4.0)]
    pub listen_seconds: f32,

    /// Whisper model path (defaults to WHISPER_MODEL_PATH).
    #[arg(long = "model-path")]
    pub model_path: Option<PathBuf>,
}

impl RecognizerArgs {
    pub fn to_settings(&self) -> Result<RecognizerSettings> {
        ensure!(
            self.listen_seconds > 0.0,
            "listen-seconds must be positive, got {}",
            self.listen_seconds
        );
        let mut settings = RecognizerSettings::from_env();
        if let Some(model) = &self.model_path {
            settings.model_path = model.clone();
        }
        settings.device_name = self.device.clone();
        settings.utterance_seconds = self.listen_seconds;
        Ok(settings)
    }
}
