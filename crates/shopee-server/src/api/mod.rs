mod product;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use shopee_scraper::ProductFetcher;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{handle_panic, request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn ProductFetcher>,
}

/// `{error, message, status}` body returned for every non-2xx response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    pub status: u16,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: String,
}

impl ErrorEnvelope {
    /// Builds an envelope whose `error` is the status's reason phrase
    /// (`"Bad Request"`, `"Internal Server Error"`, ...).
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: message.into(),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn security_header(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/shopee", get(product::get_product))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(security_header("x-content-type-options", "nosniff"))
                .layer(security_header("x-frame-options", "SAMEORIGIN"))
                .layer(security_header("referrer-policy", "no-referrer"))
                .layer(security_header("x-dns-prefetch-control", "off"))
                .layer(axum::middleware::from_fn(request_id))
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

async fn not_found() -> ErrorEnvelope {
    ErrorEnvelope::new(StatusCode::NOT_FOUND, "Route not found")
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
