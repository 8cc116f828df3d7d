use crate::state::{AppState, ModelState, SERVICE_NAME};
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::debug;

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!(uptime_seconds = state.uptime_seconds(), "health check");
    match state.model() {
        ModelState::Ready(service) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "model": service.model_name(),
        })),
        ModelState::Uninitialized => HttpResponse::ServiceUnavailable().json(json!({
            "status": "starting",
            "service": SERVICE_NAME,
        })),
        ModelState::Failed(reason) => HttpResponse::ServiceUnavailable().json(json!({
            "status": "unavailable",
            "service": SERVICE_NAME,
            "detail": reason,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::transcription::mock::MockTranscriber;
    use crate::transcription::TranscriptionService;
    use actix_web::{test, App};
    use std::sync::Arc;

    async fn health_response(model: ModelState) -> (u16, serde_json::Value) {
        let state = AppState::new(AppConfig::default(), model);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/", web::get().to(health_check)),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let status = resp.status().as_u16();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_healthy_only_when_model_ready() {
        let service = Arc::new(TranscriptionService::new(
            MockTranscriber::returning("ok"),
            "en",
        ));
        let (status, body) = health_response(ModelState::Ready(service)).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["model"], "mock");
    }

    #[actix_web::test]
    async fn test_unavailable_before_model_load() {
        let (status, body) = health_response(ModelState::Uninitialized).await;
        assert_eq!(status, 503);
        assert_eq!(body["status"], "starting");
    }

    #[actix_web::test]
    async fn test_unavailable_after_failed_load() {
        let (status, body) =
            health_response(ModelState::Failed("model file missing".to_string())).await;
        assert_eq!(status, 503);
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["detail"], "model file missing");
    }
}
