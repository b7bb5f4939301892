use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};
use service::{
    result_service::ResultService, runtime, storage::file_store::FileCounterStore,
    vote_service::VoteService,
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(3000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Resolve the tally file location from configs or env, default under data/
fn load_votes_path() -> PathBuf {
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.storage.normalize_from_env();
            PathBuf::from(cfg.storage.votes_file)
        }
        Err(_) => env::var("VOTES_FILE")
            .unwrap_or_else(|_| "data/votes.json".to_string())
            .into(),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    runtime::ensure_env("frontend", "data").await?;

    // Vote tally store; validates and rewrites the file once on boot so the
    // first request finds well-formed state.
    let votes_path = load_votes_path();
    let store = FileCounterStore::new(&votes_path).await?;
    info!(path = %votes_path.display(), "vote tally store ready");

    let state = AppState {
        votes: Arc::new(VoteService::new(store.clone())),
        results: Arc::new(ResultService::new(store)),
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors, PathBuf::from("frontend"));

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting vote server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
