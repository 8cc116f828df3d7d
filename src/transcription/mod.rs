//! Transcription backend seam.
//!
//! The rest of the service only sees the [`Transcriber`] trait: a capability
//! that turns an audio file on disk into text. The production implementation
//! is [`WhisperTranscriber`]; tests substitute a mock. Keeping the model
//! behind an injected trait object makes the shared-resource contention
//! explicit and the orchestrator testable without a real model.

pub mod audio;
pub mod service;
pub mod whisper;

pub use service::TranscriptionService;
pub use whisper::WhisperTranscriber;

use anyhow::Result;
use std::path::Path;

/// Raw backend output, before any normalization by the invoker.
///
/// `text` is optional: a backend that produced no output is reported as
/// `None` and normalized to the empty string, not treated as an error.
#[derive(Debug, Clone)]
pub struct RawTranscription {
    pub text: Option<String>,
}

/// An opaque speech-to-text capability.
pub trait Transcriber: Send + Sync {
    /// Identifier of the loaded model ("tiny", "base", ...).
    fn model_name(&self) -> &str;

    /// Transcribe the audio file at `audio_path`, decoding in `language`.
    fn transcribe(&self, audio_path: &Path, language: &str) -> Result<RawTranscription>;
}
