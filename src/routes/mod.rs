use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::SessionStore,
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware},
    models::{AnswerSet, Recommendation},
    services::RecommendationEngine,
};

pub mod questions;
pub mod recommendations;
pub mod sessions;

/// Shared application state
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionStore>, engine: RecommendationEngine) -> Self {
        Self {
            sessions,
            engine: Arc::new(engine),
        }
    }

    /// Runs the engine off the async runtime; the designer path reads the
    /// catalog file synchronously
    pub async fn recommend(&self, answers: AnswerSet) -> AppResult<Recommendation> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.recommend(&answers))
            .await
            .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(sessions::start_session))
        .route("/sessions/:session_id", delete(sessions::end_session))
        .route(
            "/sessions/:session_id/questions/:question",
            get(questions::get_question).post(questions::submit_answer),
        )
        .route("/sessions/:session_id/result", get(sessions::get_result))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
