//! Transcription invoker.
//!
//! Wraps a single call into the [`Transcriber`] capability: fixes the decode
//! language, translates backend failures into the service error taxonomy,
//! and normalizes the output (trimmed text, absent output becomes empty).

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::transcription::Transcriber;

pub struct TranscriptionService {
    transcriber: Arc<dyn Transcriber>,
    /// Decode language, forced on every call (no auto-detection)
    language: String,
}

impl TranscriptionService {
    pub fn new(transcriber: Arc<dyn Transcriber>, language: impl Into<String>) -> Self {
        Self {
            transcriber,
            language: language.into(),
        }
    }

    /// Identifier of the model behind this service.
    pub fn model_name(&self) -> &str {
        self.transcriber.model_name()
    }

    /// Transcribe the audio file at `path`.
    ///
    /// Backend failures never propagate unwrapped: each one is re-signaled
    /// as [`AppError::Transcription`] carrying the underlying message.
    pub fn transcribe_file(&self, path: &Path) -> AppResult<String> {
        debug!(path = %path.display(), language = %self.language, "invoking transcriber");
        let raw = self
            .transcriber
            .transcribe(path, &self.language)
            .map_err(|err| AppError::Transcription(err.to_string()))?;
        Ok(raw.text.unwrap_or_default().trim().to_string())
    }
}
