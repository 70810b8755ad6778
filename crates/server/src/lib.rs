//! HTTP front door: accept a thread URL, extract it, deliver it, remember it.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

use inkdrop_core::{
    Delivery, InkDropError, PageFetcher, Pipeline, ReadabilityPass, SentLedger, check_source_url,
};

/// Pipeline with its collaborators chosen at startup.
pub type SharedPipeline = Pipeline<Box<dyn PageFetcher>, Box<dyn ReadabilityPass>>;

pub struct AppState {
    pub pipeline: SharedPipeline,
    pub ledger: SentLedger,
    pub delivery: Box<dyn Delivery>,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub title: String,
    pub message: String,
}

/// An error response rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

impl From<InkDropError> for ApiError {
    fn from(err: InkDropError) -> Self {
        match err {
            InkDropError::AuthExpired => {
                tracing::error!(
                    "Session cookies expired. Log into x.com, copy the 'auth_token' and 'ct0' cookies, \
                     update TWITTER_AUTH_TOKEN and TWITTER_CT0, then restart the service"
                );
                Self::new(StatusCode::UNAUTHORIZED, "Twitter cookies expired. Operator has been alerted.")
            }
            InkDropError::NotTargetPlatform(_) => Self::new(StatusCode::BAD_REQUEST, "URL must be a Twitter/X link"),
            InkDropError::InvalidUrl(msg) => Self::new(StatusCode::BAD_REQUEST, format!("Invalid URL: {msg}")),
            InkDropError::Configuration(msg) => {
                tracing::error!(error = %msg, "service is misconfigured");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Configuration error: {msg}"))
            }
            other => {
                tracing::warn!(error = %other, "processing failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to process: {other}"))
            }
        }
    }
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "ink-drop" }))
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Validate, reserve the URL in the ledger, extract, deliver, then record it.
///
/// The reservation is held for the whole request, so a concurrent submission
/// of the same thread gets a conflict instead of a second delivery. Any
/// failure releases it.
pub async fn send_article(
    State(state): State<Arc<AppState>>, payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    let Json(body) = payload?;
    let url = check_source_url(&body.url)?;

    let Some(reservation) = state.ledger.try_reserve(url).await? else {
        return Err(ApiError::new(StatusCode::CONFLICT, "Article already sent"));
    };

    let article = state.pipeline.extract_article(url).await?;
    if article.is_empty() {
        tracing::warn!(url, "no content survived extraction");
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to process: no content could be extracted",
        ));
    }

    let receipt = state.delivery.deliver(&article).await?;
    reservation.commit().await?;

    tracing::info!(url, title = %article.title, location = %receipt.location, "article delivered");

    Ok(Json(SendResponse { success: true, title: article.title, message: receipt.message }))
}

/// `RUST_LOG` plus info for the service crates and debug for `tower_http`,
/// which is where the request spans are emitted.
pub fn log_filter() -> Result<EnvFilter, ParseError> {
    Ok(EnvFilter::from_default_env()
        .add_directive("inkdrop_core=info".parse()?)
        .add_directive("inkdrop_server=info".parse()?)
        .add_directive("tower_http=debug".parse()?))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/send", post(send_article))
        .route("/send-to-kindle", post(send_article))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!("http_request", method = %request.method(), path = %request.uri().path())
        }))
}
