//! Speech transcription port and engines.
//!
//! The practice session and voice search only see the [`Transcriber`] trait:
//! one availability probe plus one blocking single-utterance transcription.
//! [`WhisperTranscriber`] records from the microphone and runs whisper;
//! [`ScriptedTranscriber`] is the deterministic stand-in used by tests.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::capture::{self, CaptureSettings};

/// Sample rate the whisper engine expects.
pub const RECOGNIZER_SAMPLE_RATE: u32 = 16_000;

const DEFAULT_MODEL_PATH: &str = "./models/ggml-base.bin";
const DEFAULT_UTTERANCE_SECONDS: f32 = 4.0;

/// Recognition language preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    /// Pronunciation practice target language.
    pub const JAPANESE: Locale = Locale { code: "ja" };
    /// Voice search input language.
    pub const INDONESIAN: Locale = Locale { code: "id" };

    pub fn code(&self) -> &'static str {
        self.code
    }
}

/// Parameters for one transcription attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub locale: Locale,
    pub max_alternatives: u32,
}

impl TranscriptionRequest {
    /// Preset used by the pronunciation practice session.
    pub fn practice() -> Self {
        Self {
            locale: Locale::JAPANESE,
            max_alternatives: 5,
        }
    }

    /// Preset used by search-by-voice.
    pub fn voice_search() -> Self {
        Self {
            locale: Locale::INDONESIAN,
            max_alternatives: 1,
        }
    }
}

/// Service-side failure taxonomy for one recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    NoSpeech,
    AudioCapture(String),
    NotAllowed,
    Network,
    Aborted,
    Engine(String),
}

impl TranscriptionError {
    /// Short human-readable form surfaced to the user.
    pub fn describe(&self) -> String {
        match self {
            Self::NoSpeech => {
                "no speech was detected; try again closer to the microphone".to_string()
            }
            Self::AudioCapture(detail) => format!("microphone capture failed: {detail}"),
            Self::NotAllowed => "microphone access was denied".to_string(),
            Self::Network => "the recognition service could not be reached".to_string(),
            Self::Aborted => "the recognition attempt was cancelled".to_string(),
            Self::Engine(detail) => format!("speech engine error: {detail}"),
        }
    }
}

impl Display for TranscriptionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl Error for TranscriptionError {}

/// Environment-provided speech-to-text capability.
pub trait Transcriber {
    fn is_available(&self) -> bool;

    /// Block for at most one utterance and return its transcript.
    fn transcribe_once(
        &mut self,
        request: &TranscriptionRequest,
    ) -> Result<String, TranscriptionError>;
}

/// Configuration for the whisper-backed engine.
#[derive(Debug, Clone)]
pub struct RecognizerSettings {
    pub model_path: PathBuf,
    pub device_name: Option<String>,
    pub utterance_seconds: f32,
}

impl RecognizerSettings {
    /// Model path from `WHISPER_MODEL_PATH`, falling back to the bundled
    /// default location.
    pub fn from_env() -> Self {
        let model_path = std::env::var("WHISPER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH));
        Self {
            model_path,
            device_name: None,
            utterance_seconds: DEFAULT_UTTERANCE_SECONDS,
        }
    }
}

/// Records one utterance from the microphone and transcribes it with whisper.
pub struct WhisperTranscriber {
    settings: RecognizerSettings,
}

impl WhisperTranscriber {
    pub fn new(settings: RecognizerSettings) -> Self {
        Self { settings }
    }
}

impl Transcriber for WhisperTranscriber {
    fn is_available(&self) -> bool {
        self.settings.model_path.is_file()
    }

    fn transcribe_once(
        &mut self,
        request: &TranscriptionRequest,
    ) -> Result<String, TranscriptionError> {
        let capture_settings = CaptureSettings {
            device_name: self.settings.device_name.clone(),
            sample_rate: RECOGNIZER_SAMPLE_RATE,
            duration: Duration::from_secs_f32(self.settings.utterance_seconds),
        };
        info!(
            locale = request.locale.code(),
            seconds = self.settings.utterance_seconds,
            "recording one utterance"
        );
        let samples = capture::record_utterance(&capture_settings)
            .map_err(|err| TranscriptionError::AudioCapture(err.to_string()))?;
        debug!(samples = samples.len(), "utterance captured");
        transcribe_samples(&self.settings.model_path, &samples, request)
    }
}

fn transcribe_samples(
    model_path: &Path,
    samples: &[f32],
    request: &TranscriptionRequest,
) -> Result<String, TranscriptionError> {
    let model = model_path.to_string_lossy();
    let ctx = WhisperContext::new_with_params(model.as_ref(), WhisperContextParameters::default())
        .map_err(|err| TranscriptionError::Engine(err.to_string()))?;

    let mut params = FullParams::new(sampling_strategy(request.max_alternatives));
    params.set_language(Some(request.locale.code()));
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    let mut state = ctx
        .create_state()
        .map_err(|err| TranscriptionError::Engine(err.to_string()))?;
    state
        .full(params, samples)
        .map_err(|err| TranscriptionError::Engine(err.to_string()))?;

    let mut text = String::new();
    for segment in state.as_iter() {
        let piece = segment
            .to_str()
            .map_err(|err| TranscriptionError::Engine(err.to_string()))?;
        text.push_str(piece);
    }

    let transcript = text.trim().to_string();
    if transcript.is_empty() {
        return Err(TranscriptionError::NoSpeech);
    }
    info!(transcript = %transcript, "utterance transcribed");
    Ok(transcript)
}

fn sampling_strategy(max_alternatives: u32) -> SamplingStrategy {
    if max_alternatives > 1 {
        SamplingStrategy::BeamSearch {
            beam_size: max_alternatives as std::os::raw::c_int,
            patience: -1.0,
        }
    } else {
        SamplingStrategy::Greedy { best_of: 1 }
    }
}

/// Deterministic in-memory transcriber for tests.
pub struct ScriptedTranscriber {
    available: bool,
    results: VecDeque<Result<String, TranscriptionError>>,
    requests: Vec<TranscriptionRequest>,
}

impl ScriptedTranscriber {
    /// A transcriber whose capability probe reports unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            results: VecDeque::new(),
            requests: Vec::new(),
        }
    }

    /// An available transcriber that yields `result` on the next attempt.
    pub fn with_result(result: Result<String, TranscriptionError>) -> Self {
        let mut results = VecDeque::new();
        results.push_back(result);
        Self {
            available: true,
            results,
            requests: Vec::new(),
        }
    }

    pub fn push_result(&mut self, result: Result<String, TranscriptionError>) {
        self.results.push_back(result);
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> &[TranscriptionRequest] {
        &self.requests
    }
}

impl Transcriber for ScriptedTranscriber {
    fn is_available(&self) -> bool {
        self.available
    }

    fn transcribe_once(
        &mut self,
        request: &TranscriptionRequest,
    ) -> Result<String, TranscriptionError> {
        self.requests.push(*request);
        self.results
            .pop_front()
            .unwrap_or(Err(TranscriptionError::Aborted))
    }
}
