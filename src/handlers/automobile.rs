use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{guarded, Role};
use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::Automobile;
use crate::repository::PageRequest;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/automobiles",
            guarded(post(save_automobile), Role::Manager)
                .merge(guarded(get(find_automobiles), Role::User))
                .merge(guarded(delete(remove_all_automobiles), Role::Admin)),
        )
        .route(
            "/automobiles/:id",
            guarded(get(get_automobile_by_id), Role::User)
                .merge(guarded(put(refresh_automobile), Role::Manager))
                .merge(guarded(delete(remove_automobile_by_id), Role::Admin)),
        )
        .route(
            "/automobiles-names",
            guarded(get(get_all_automobile_names), Role::User),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomobileQuery {
    pub name: Option<String>,
    pub color: Option<String>,
    pub color_starts_with: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// The lookup selected by the query parameters of `GET /automobiles`.
#[derive(Debug, PartialEq, Eq)]
pub enum AutomobileLookup {
    All,
    ByName(String),
    ByColor(String),
    ByNameAndColor(String, String),
    ByColorPrefix(String, PageRequest),
}

impl TryFrom<AutomobileQuery> for AutomobileLookup {
    type Error = AppError;

    fn try_from(query: AutomobileQuery) -> Result<Self, Self::Error> {
        if let Some(prefix) = query.color_starts_with {
            let (page, size) = match (query.page, query.size) {
                (Some(page), Some(size)) => (page, size),
                _ => {
                    return Err(AppError::Validation(
                        "colorStartsWith requires both page and size".to_string(),
                    ))
                }
            };
            if size == 0 {
                return Err(AppError::Validation("size must be at least 1".to_string()));
            }
            return Ok(AutomobileLookup::ByColorPrefix(prefix, PageRequest::new(page, size)));
        }

        Ok(match (query.name, query.color) {
            (Some(name), Some(color)) => AutomobileLookup::ByNameAndColor(name, color),
            (Some(name), None) => AutomobileLookup::ByName(name),
            (None, Some(color)) => AutomobileLookup::ByColor(color),
            (None, None) => AutomobileLookup::All,
        })
    }
}

async fn save_automobile(
    State(state): State<AppState>,
    Json(automobile): Json<Automobile>,
) -> Result<(StatusCode, Json<Automobile>), AppError> {
    automobile
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::info!("{} saveAutomobile() - start: automobile = {:?}", API_NAME, automobile);
    let saved = state.store.save(automobile).await?;
    tracing::info!("{} saveAutomobile() - end: id = {:?}", API_NAME, saved.id);

    Ok((StatusCode::CREATED, Json(saved)))
}

async fn find_automobiles(
    State(state): State<AppState>,
    Query(query): Query<AutomobileQuery>,
) -> Result<Json<Vec<Automobile>>, AppError> {
    let lookup = AutomobileLookup::try_from(query)?;
    tracing::info!("{} findAutomobiles() - start: {:?}", API_NAME, lookup);

    let automobiles = match lookup {
        AutomobileLookup::All => state.store.find_all().await?,
        AutomobileLookup::ByName(name) => state.store.find_by_name(&name).await?,
        AutomobileLookup::ByColor(color) => {
            let start = Instant::now();
            let found = state.store.find_by_color(&color).await?;
            tracing::info!(
                "{} findAutomobileByColor() - end: milliseconds = {}",
                API_NAME,
                start.elapsed().as_millis()
            );
            found
        }
        AutomobileLookup::ByNameAndColor(name, color) => {
            state.store.find_by_name_and_color(&name, &color).await?
        }
        AutomobileLookup::ByColorPrefix(prefix, page) => {
            state.store.find_by_color_starts_with(&prefix, page).await?
        }
    };

    tracing::info!("{} findAutomobiles() - end: count = {}", API_NAME, automobiles.len());
    Ok(Json(automobiles))
}

async fn get_automobile_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Automobile>, AppError> {
    tracing::info!("{} getAutomobileById() - start: id = {}", API_NAME, id);
    let automobile = state.service.get_active(id).await?;
    tracing::info!("{} getAutomobileById() - end: id = {}", API_NAME, id);
    Ok(Json(automobile))
}

async fn refresh_automobile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<Automobile>,
) -> Result<Json<Automobile>, AppError> {
    tracing::info!("{} refreshAutomobile() - start: id = {}, automobile = {:?}", API_NAME, id, patch);
    let updated = state.service.refresh_automobile(id, &patch).await?;
    tracing::info!("{} refreshAutomobile() - end: updated = {:?}", API_NAME, updated);
    Ok(Json(updated))
}

async fn remove_automobile_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    tracing::info!("{} removeAutomobileById() - start: id = {}", API_NAME, id);
    state.service.soft_delete(id).await?;
    tracing::info!("{} removeAutomobileById() - end: id = {}", API_NAME, id);
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_all_automobiles(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    tracing::info!("{} removeAllAutomobiles() - start", API_NAME);
    state.store.delete_all().await?;
    tracing::info!("{} removeAllAutomobiles() - end", API_NAME);
    Ok(StatusCode::NO_CONTENT)
}

async fn get_all_automobile_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    tracing::info!("{} getAllAutomobilesByName() - start", API_NAME);
    let names = state.service.sorted_names().await?;
    tracing::info!("{} getAllAutomobilesByName() - end: count = {}", API_NAME, names.len());
    Ok(Json(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        name: Option<&str>,
        color: Option<&str>,
        prefix: Option<&str>,
        page: Option<u32>,
        size: Option<u32>,
    ) -> AutomobileQuery {
        AutomobileQuery {
            name: name.map(str::to_string),
            color: color.map(str::to_string),
            color_starts_with: prefix.map(str::to_string),
            page,
            size,
        }
    }

    #[test]
    fn lookup_dispatch_follows_the_most_specific_parameters() {
        assert_eq!(
            AutomobileLookup::try_from(query(None, None, None, None, None)).unwrap(),
            AutomobileLookup::All
        );
        assert_eq!(
            AutomobileLookup::try_from(query(Some("Ford"), None, None, None, None)).unwrap(),
            AutomobileLookup::ByName("Ford".to_string())
        );
        assert_eq!(
            AutomobileLookup::try_from(query(None, Some("Red"), None, None, None)).unwrap(),
            AutomobileLookup::ByColor("Red".to_string())
        );
        assert_eq!(
            AutomobileLookup::try_from(query(Some("Ford"), Some("Red"), None, None, None)).unwrap(),
            AutomobileLookup::ByNameAndColor("Ford".to_string(), "Red".to_string())
        );
        assert_eq!(
            AutomobileLookup::try_from(query(None, None, Some("Gr"), Some(0), Some(10))).unwrap(),
            AutomobileLookup::ByColorPrefix("Gr".to_string(), PageRequest::new(0, 10))
        );
    }

    #[test]
    fn color_prefix_needs_page_and_positive_size() {
        assert!(matches!(
            AutomobileLookup::try_from(query(None, None, Some("Gr"), None, Some(10))),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            AutomobileLookup::try_from(query(None, None, Some("Gr"), Some(0), Some(0))),
            Err(AppError::Validation(_))
        ));
    }
}
