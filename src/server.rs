//! HTTP surface for the trainer

use crate::error::TrainerError;
use crate::letter_stats::LetterSnapshot;
use crate::session::Trainer;
use crate::stats::CompletedWord;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

type TrainerArc = Arc<Trainer>;

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    pub n: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MissedWord {
    pub word: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WpmResponse {
    pub wpm: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub words: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for TrainerError {
    fn into_response(self) -> Response {
        let status = if self.is_fatal() {
            error!("{self}");
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            warn!("Rejected request: {self}");
            StatusCode::BAD_REQUEST
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// Malformed bodies and queries are validation failures like any other
impl From<JsonRejection> for TrainerError {
    fn from(rejection: JsonRejection) -> Self {
        TrainerError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for TrainerError {
    fn from(rejection: QueryRejection) -> Self {
        TrainerError::validation(rejection.body_text())
    }
}

/// Build the router
pub fn router(trainer: TrainerArc) -> Router {
    Router::new()
        .route("/word", get(random_word))
        .route("/words", get(word_batch))
        .route("/word/incorrect", post(missed_word))
        .route("/word/completed", post(completed_word))
        .route("/stats", get(wpm))
        .route("/stats/letters", get(letter_stats))
        .route("/health", get(health))
        .with_state(trainer)
        // Front-end is served from elsewhere
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve until ctrl-c
pub async fn run(trainer: Trainer, addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(trainer));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn random_word(State(trainer): State<TrainerArc>) -> Result<Json<String>, TrainerError> {
    Ok(Json(trainer.random_word().await?))
}

async fn word_batch(
    State(trainer): State<TrainerArc>,
    query: Result<Query<BatchQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, TrainerError> {
    let Query(query) = query?;
    Ok(Json(trainer.word_batch(query.n).await?))
}

async fn missed_word(
    State(trainer): State<TrainerArc>,
    body: Result<Json<MissedWord>, JsonRejection>,
) -> Result<Json<()>, TrainerError> {
    let Json(body) = body?;
    trainer.report_missed_word(&body.word).await?;
    Ok(Json(()))
}

async fn completed_word(
    State(trainer): State<TrainerArc>,
    body: Result<Json<CompletedWord>, JsonRejection>,
) -> Result<Json<()>, TrainerError> {
    let Json(body) = body?;
    trainer.report_completed_word(&body).await?;
    Ok(Json(()))
}

async fn wpm(State(trainer): State<TrainerArc>) -> Json<WpmResponse> {
    Json(WpmResponse {
        wpm: trainer.current_wpm().await,
    })
}

async fn letter_stats(State(trainer): State<TrainerArc>) -> Json<Vec<LetterSnapshot>> {
    Json(trainer.letter_stats().await)
}

async fn health(State(trainer): State<TrainerArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        words: trainer.corpus().len(),
    })
}
