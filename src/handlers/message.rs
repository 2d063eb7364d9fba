use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};

use crate::auth::{guarded, Role};
use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::Automobile;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/message", guarded(post(push_message), Role::Manager))
        .route("/update-message", guarded(post(update_auto_message), Role::Manager))
}

async fn push_message(
    State(state): State<AppState>,
    Json(automobile): Json<Automobile>,
) -> Result<(StatusCode, Json<Automobile>), AppError> {
    tracing::info!("{} pushMessage() - start", API_NAME);
    let saved = state.publisher.push_message(automobile).await?;
    tracing::info!("{} pushMessage() - end: id = {:?}", API_NAME, saved.id);
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_auto_message(
    State(state): State<AppState>,
    Json(automobile): Json<Automobile>,
) -> Result<Json<Automobile>, AppError> {
    tracing::info!("{} updateAutoMessage() - start", API_NAME);
    let saved = state.publisher.update_auto_message(automobile).await?;
    tracing::info!("{} updateAutoMessage() - end: id = {:?}", API_NAME, saved.id);
    Ok(Json(saved))
}
