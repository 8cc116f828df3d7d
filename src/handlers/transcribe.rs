//! `POST /transcribe` — the request orchestrator.
//!
//! Per-request pipeline: read the multipart upload, validate the filename
//! against the allow-list, persist the bytes to a scoped temp artifact,
//! invoke the transcriber, and respond. The artifact is dropped at the end
//! of the blocking closure, which removes the file whether the invocation
//! succeeded or failed. Validation rejects before anything touches disk.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt as _;
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::artifact::TempArtifact;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::transcription::TranscriptionService;
use crate::upload;

pub async fn transcribe(state: web::Data<AppState>, payload: Multipart) -> AppResult<HttpResponse> {
    let service = state.transcription()?;
    let (filename, contents) = read_upload(payload).await?;
    let extension = upload::validate_filename(&filename)?;

    info!(filename = %filename, bytes = contents.len(), "processing upload");

    let temp_dir = state.temp_dir();
    let text = web::block(move || run_transcription(&service, &temp_dir, &extension, &contents))
        .await
        .map_err(|err| AppError::Io(format!("transcription task failed: {err}")))??;

    info!(chars = text.len(), "transcription completed");

    Ok(HttpResponse::Ok().json(json!({ "text": text })))
}

/// Pull the `file` part out of the multipart stream: original filename plus
/// the full byte buffer. A part without a filename yields an empty name and
/// fails extension validation downstream.
async fn read_upload(mut payload: Multipart) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = payload.next().await {
        let mut field = field?;
        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_owned),
                cd.get_filename().map(str::to_owned),
            ),
            None => (None, None),
        };
        if name.as_deref() != Some("file") {
            continue;
        }

        let mut contents = Vec::new();
        while let Some(chunk) = field.next().await {
            contents.extend_from_slice(&chunk?);
        }
        return Ok((filename.unwrap_or_default(), contents));
    }
    Err(AppError::BadRequest(
        "Multipart field \"file\" is missing".to_string(),
    ))
}

/// The blocking half of the pipeline: persist, transcribe, clean up.
fn run_transcription(
    service: &TranscriptionService,
    temp_dir: &Path,
    extension: &str,
    contents: &[u8],
) -> AppResult<String> {
    let artifact = TempArtifact::create(temp_dir, extension)
        .map_err(|err| AppError::Io(format!("Failed to create temp file: {err}")))?;
    artifact
        .write(contents)
        .map_err(|err| AppError::Io(format!("Failed to write upload: {err}")))?;
    service.transcribe_file(artifact.path())
    // artifact dropped here: temp file removed on success and failure alike
}
