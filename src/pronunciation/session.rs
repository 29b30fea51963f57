//! Single-attempt pronunciation practice session.
//!
//! One session drives one practice attempt: probe the transcription
//! capability, prompt for the target reading, wait for exactly one
//! transcript, compare, and report a structured outcome. A finished session
//! stays in its terminal state; retries are a fresh session constructed by
//! the caller.

use tracing::{debug, info, warn};

use super::{hiragana, matcher, FeedbackSink, Severity};
use crate::transcription::{Transcriber, TranscriptionRequest};
use crate::types::VocabularyEntry;

/// Progression of one practice attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingCapability,
    Listening,
    Evaluating,
    Done,
    Failed,
}

/// Structured result of one practice attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeOutcome {
    Correct {
        spoken: String,
    },
    Incorrect {
        spoken: String,
        expected: String,
        romaji: String,
    },
    Unsupported,
    SystemError {
        detail: String,
    },
}

pub struct PracticeSession<T> {
    transcriber: T,
    state: SessionState,
}

impl<T: Transcriber> PracticeSession<T> {
    pub fn new(transcriber: T) -> Self {
        Self {
            transcriber,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcriber(&self) -> &T {
        &self.transcriber
    }

    /// Run the attempt for `entry`, emitting one prompt (unless the
    /// capability probe fails) and one outcome message to `sink`.
    pub fn run(&mut self, entry: &VocabularyEntry, sink: &mut dyn FeedbackSink) -> PracticeOutcome {
        if self.state != SessionState::Idle {
            warn!(state = ?self.state, "practice session reused after completion");
            return PracticeOutcome::SystemError {
                detail: "practice session already finished; start a new attempt".to_string(),
            };
        }

        self.state = SessionState::AwaitingCapability;
        if !self.transcriber.is_available() {
            info!("transcription capability unavailable");
            self.state = SessionState::Failed;
            sink.emit(
                "Speech recognition is not available in this environment.",
                Severity::Error,
            );
            return PracticeOutcome::Unsupported;
        }

        self.state = SessionState::Listening;
        let target = hiragana::extract_reading(&entry.hiragana).to_string();
        sink.emit(
            &format!("Say: {} ({})", target, entry.romaji),
            Severity::Info,
        );
        info!(reading = %target, romaji = %entry.romaji, "listening for one utterance");

        let request = TranscriptionRequest::practice();
        match self.transcriber.transcribe_once(&request) {
            Ok(transcript) => {
                self.state = SessionState::Evaluating;
                let spoken = transcript.trim().to_string();
                debug!(spoken = %spoken, "evaluating transcript");
                if matcher::matches_reading(&spoken, &target) {
                    self.state = SessionState::Done;
                    sink.emit(
                        &format!("Correct! You said: {spoken}"),
                        Severity::Success,
                    );
                    PracticeOutcome::Correct { spoken }
                } else {
                    self.state = SessionState::Done;
                    sink.emit(
                        &format!(
                            "Not quite. You said: {spoken}. Expected: {target} ({})",
                            entry.romaji
                        ),
                        Severity::Error,
                    );
                    PracticeOutcome::Incorrect {
                        spoken,
                        expected: target,
                        romaji: entry.romaji.clone(),
                    }
                }
            }
            Err(err) => {
                self.state = SessionState::Failed;
                let detail = err.describe();
                warn!(detail = %detail, "transcription attempt failed");
                sink.emit(&format!("Error: {detail}"), Severity::Error);
                PracticeOutcome::SystemError { detail }
            }
        }
    }
}
