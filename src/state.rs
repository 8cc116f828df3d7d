//! # Application State Management
//!
//! Shared state handed to every HTTP request handler. The interesting part
//! is the model lifecycle: rather than an ambient global whose load status
//! is implied by startup ordering, the loaded transcriber travels inside an
//! explicit [`ModelState`] value. The health endpoint and the orchestrator
//! both read the *same* state, so readiness reporting can never drift from
//! what requests actually use.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::transcription::TranscriptionService;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "Whisper Transcription API";

/// Explicit lifecycle state for the process-wide model handle.
///
/// In normal operation only `Ready` is ever observed: startup aborts before
/// the server binds when the model fails to load. The other variants keep
/// the lifecycle honest and testable.
#[derive(Clone)]
pub enum ModelState {
    Uninitialized,
    Ready(Arc<TranscriptionService>),
    Failed(String),
}

#[derive(Clone)]
pub struct AppState {
    config: AppConfig,
    model: ModelState,
    start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, model: ModelState) -> Self {
        Self {
            config,
            model,
            start_time: Instant::now(),
        }
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }

    /// The transcription service, or an error if no model is ready.
    pub fn transcription(&self) -> AppResult<Arc<TranscriptionService>> {
        match &self.model {
            ModelState::Ready(service) => Ok(Arc::clone(service)),
            ModelState::Uninitialized | ModelState::Failed(_) => Err(AppError::ModelUnavailable),
        }
    }

    /// Directory for scoped temp artifacts.
    pub fn temp_dir(&self) -> PathBuf {
        self.config
            .upload
            .temp_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::mock::MockTranscriber;

    fn ready_state() -> ModelState {
        let mock = MockTranscriber::returning("ok");
        ModelState::Ready(Arc::new(TranscriptionService::new(mock, "en")))
    }

    #[test]
    fn test_transcription_available_when_ready() {
        let state = AppState::new(AppConfig::default(), ready_state());
        let service = state.transcription().unwrap();
        assert_eq!(service.model_name(), "mock");
    }

    #[test]
    fn test_transcription_unavailable_when_not_ready() {
        for model in [
            ModelState::Uninitialized,
            ModelState::Failed("boom".to_string()),
        ] {
            let state = AppState::new(AppConfig::default(), model);
            assert!(matches!(
                state.transcription(),
                Err(AppError::ModelUnavailable)
            ));
        }
    }

    #[test]
    fn test_temp_dir_defaults_to_system_temp() {
        let state = AppState::new(AppConfig::default(), ModelState::Uninitialized);
        assert_eq!(state.temp_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_temp_dir_honors_config_override() {
        let mut config = AppConfig::default();
        config.upload.temp_dir = Some("/var/spool/uploads".to_string());
        let state = AppState::new(config, ModelState::Uninitialized);
        assert_eq!(state.temp_dir(), PathBuf::from("/var/spool/uploads"));
    }
}
