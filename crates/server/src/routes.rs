use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    response::Redirect,
    routing::{get, get_service},
    Form, Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::{Counter, Health};
use service::{result_service::ResultService, vote_service::VoteService};

use crate::errors::JsonApiError;

/// Shared handler state: the two service-layer entry points.
#[derive(Clone)]
pub struct AppState {
    pub votes: Arc<VoteService>,
    pub results: Arc<ResultService>,
}

#[derive(Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    vote: String,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn index() -> Redirect {
    Redirect::to("/vote")
}

/// Accept a form ballot, record it, then send the voter to the results page.
async fn submit_vote(
    State(state): State<AppState>,
    Form(form): Form<VoteForm>,
) -> Result<Redirect, JsonApiError> {
    state.votes.cast_vote(&form.vote).await?;
    Ok(Redirect::to("/result"))
}

async fn api_result(State(state): State<AppState>) -> Json<Counter> {
    Json(state.results.results().await)
}

/// Build the full application router: pages, vote/result API, health.
pub fn build_router(state: AppState, cors: CorsLayer, frontend_dir: PathBuf) -> Router {
    let vote_page = ServeFile::new(frontend_dir.join("vote.html"));
    let result_page = ServeFile::new(frontend_dir.join("result.html"));

    Router::new()
        .route("/", get(index))
        .route("/vote", get_service(vote_page).post(submit_vote))
        .route_service("/result", result_page)
        .route("/api/result", get(api_result))
        .route("/health", get(health))
        // css/js assets for the pages
        .fallback_service(ServeDir::new(frontend_dir))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
