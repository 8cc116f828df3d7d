//! Whisper-backed [`Transcriber`] implementation.
//!
//! Loads a ggml model file once at startup via whisper-rs and serves
//! transcription calls for the rest of the process lifetime. whisper.cpp
//! gives no concurrency guarantee for a context, so all inference runs
//! under a single mutex: concurrent requests queue here.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::ModelConfig;
use crate::transcription::{audio, RawTranscription, Transcriber};

pub struct WhisperTranscriber {
    /// Loaded model context; the lock serializes all calls into it
    ctx: Mutex<WhisperContext>,
    name: String,
    threads: i32,
}

impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("name", &self.name)
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

impl WhisperTranscriber {
    /// Load the named model configuration. Called once at startup; a failure
    /// here is fatal to the process.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        if config.threads == 0 {
            return Err(anyhow!("model threads must be > 0"));
        }
        let threads = i32::try_from(config.threads)
            .map_err(|_| anyhow!("thread count too large (max: {})", i32::MAX))?;

        info!(
            model = %config.name,
            path = %config.path,
            threads = config.threads,
            "loading whisper model"
        );
        let ctx = WhisperContext::new_with_params(&config.path, WhisperContextParameters::default())
            .map_err(|err| {
                anyhow!(
                    "failed to load whisper model \"{}\" from {}: {err:?}",
                    config.name,
                    config.path
                )
            })?;
        info!(model = %config.name, "whisper model loaded");

        Ok(Self {
            ctx: Mutex::new(ctx),
            name: config.name.clone(),
            threads,
        })
    }
}

impl Transcriber for WhisperTranscriber {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn transcribe(&self, audio_path: &Path, language: &str) -> Result<RawTranscription> {
        let samples = audio::read_samples(audio_path)?;
        debug!(samples = samples.len(), "audio decoded, starting inference");

        // Held across the whole inference: one request in the model at a time
        let ctx = self
            .ctx
            .lock()
            .map_err(|err| anyhow!("whisper context lock poisoned: {err}"))?;
        let mut state = ctx
            .create_state()
            .map_err(|err| anyhow!("failed to create whisper state: {err:?}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.threads);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_language(Some(language));
        params.set_translate(false);

        let start = Instant::now();
        state
            .full(params, &samples)
            .context("whisper inference failed")?;

        let mut text = String::new();
        for segment in state.as_iter() {
            text.push_str(&segment.to_string());
        }

        debug!(
            segments = state.full_n_segments(),
            text_len = text.len(),
            inference_ms = start.elapsed().as_millis(),
            "inference finished"
        );

        Ok(RawTranscription { text: Some(text) })
    }
}
