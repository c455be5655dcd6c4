use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::core::{DreamError, DreamRecord, UserStats};
use crate::service::{DreamInput, DreamService, SymbolResponse};

const INDEX_HTML: &str = include_str!("index.html");

pub type AppState = Arc<Mutex<DreamService>>;

/// Error body in the `{"detail": ...}` shape clients expect
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<DreamError> for ApiError {
    fn from(err: DreamError) -> Self {
        let (status, detail) = match &err {
            DreamError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            DreamError::NotFound(_) => (StatusCode::NOT_FOUND, "Dream not found".to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        ApiError { status, detail }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = %self.detail, "request failed");
        }
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/analyze-dream", post(analyze_dream_handler))
        .route("/generate-symbol/:user_id", get(generate_symbol_handler))
        .route("/user-stats/:user_id", get(user_stats_handler))
        .route("/dream/:dream_id", get(get_dream_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers(Any),
                )
        )
        .with_state(state)
}

pub async fn serve(config: &Config) -> Result<()> {
    let state: AppState = Arc::new(Mutex::new(DreamService::from_config(config)));
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(address = %addr, "dream interpreter listening");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn analyze_dream_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DreamInput>, JsonRejection>,
) -> std::result::Result<Json<DreamRecord>, ApiError> {
    let Json(input) = payload?;
    let mut service = state.lock().await;
    let record = service.analyze_dream(input)?;
    Ok(Json(record))
}

async fn generate_symbol_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<SymbolResponse> {
    let service = state.lock().await;
    Json(service.generate_symbol(&user_id))
}

async fn user_stats_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<UserStats> {
    let service = state.lock().await;
    Json(service.user_stats(&user_id))
}

async fn get_dream_handler(
    State(state): State<AppState>,
    Path(dream_id): Path<String>,
) -> std::result::Result<Json<DreamRecord>, ApiError> {
    let service = state.lock().await;
    Ok(Json(service.get_dream(&dream_id)?))
}
