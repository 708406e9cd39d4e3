use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::handlers;
use crate::state::AppState;
use crate::websocket;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/translate-to-code", post(handlers::translate_to_code))
        // Misspelled path kept as an alias: older frontends post here.
        .route("/traslate-to-code", post(handlers::translate_to_code))
        // Transcription channels, one per language
        .route("/listen-es", get(websocket::listen_spanish))
        .route("/listen-en", get(websocket::listen_english))
        // Health check
        .route("/api/health", get(handlers::health_check))
        // Static file serving
        .nest_service("/static", ServeDir::new(&state.config.system.frontend_dir))
}
