use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{ajax_bitlinks_handler, get_bitlinks_handler, health_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/v1/bitlinks", get(get_bitlinks_handler))
            .route("/bitlinks/ajax", post(ajax_bitlinks_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
