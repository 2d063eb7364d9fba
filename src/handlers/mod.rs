pub mod automobile;
pub mod health;
pub mod message;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// All routes under `/api`, with request tracing and CORS.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(automobile::router())
        .merge(message::router())
        .merge(health::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
