//! Request logging middleware.
//!
//! Tags every request with a generated id and logs start and completion with
//! the outcome and duration, so per-request log lines (including the
//! processing logs emitted by handlers) can be correlated.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    time::Instant,
};
use tracing::{error, info};
use uuid::Uuid;

pub struct RequestLogging;

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingMiddleware { service }))
    }
}

pub struct RequestLoggingMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let method = req.method().to_string();
        let uri = req.uri().to_string();

        info!(%request_id, method = %method, uri = %uri, "request started");

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let duration_ms = started.elapsed().as_millis();

            match &result {
                Ok(response) => {
                    info!(
                        %request_id,
                        method = %method,
                        uri = %uri,
                        status = response.status().as_u16(),
                        duration_ms,
                        "request completed"
                    );
                }
                Err(err) => {
                    error!(
                        %request_id,
                        method = %method,
                        uri = %uri,
                        duration_ms,
                        error = %err,
                        "request failed"
                    );
                }
            }

            result
        })
    }
}
