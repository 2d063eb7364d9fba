use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use super::color_policy::{ColorPolicy, ColorRejection, LogColorChange};
use crate::constants::API_NAME;
use crate::models::Automobile;
use crate::repository::{SharedStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("There is no automobile with id {0}")]
    NotFound(i64),

    #[error("Automobile with id {0} was deleted")]
    AlreadyDeleted(i64),

    #[error(transparent)]
    ColorRejected(#[from] ColorRejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct AutomobileService {
    store: SharedStore,
    color_policy: Arc<dyn ColorPolicy>,
}

impl AutomobileService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            color_policy: Arc::new(LogColorChange),
        }
    }

    pub fn with_color_policy(mut self, color_policy: Arc<dyn ColorPolicy>) -> Self {
        self.color_policy = color_policy;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Merges `patch` into the stored record and persists it.
    ///
    /// The color policy runs first; a soft-deleted record is refused after the
    /// merge is prepared but before anything is written.
    pub async fn refresh_automobile(
        &self,
        id: i64,
        patch: &Automobile,
    ) -> Result<Automobile, ServiceError> {
        let mut entity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        self.color_policy.check(&entity, patch)?;
        entity.apply_refresh(patch);
        if entity.deleted {
            tracing::warn!("{} Refusing to refresh deleted automobile: {}", API_NAME, id);
            return Err(ServiceError::AlreadyDeleted(id));
        }

        let saved = self.store.save(entity).await?;
        tracing::info!("{} Refreshed automobile: {}", API_NAME, id);
        Ok(saved)
    }

    /// Looks up a record that has not been soft-deleted.
    pub async fn get_active(&self, id: i64) -> Result<Automobile, ServiceError> {
        match self.store.find_by_id(id).await? {
            Some(automobile) if !automobile.deleted => Ok(automobile),
            _ => Err(ServiceError::NotFound(id)),
        }
    }

    /// Flags the record as deleted. Deleting twice is not an error.
    pub async fn soft_delete(&self, id: i64) -> Result<Automobile, ServiceError> {
        let mut entity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        entity.deleted = true;
        Ok(self.store.save(entity).await?)
    }

    pub async fn sorted_names(&self) -> Result<Vec<String>, ServiceError> {
        let mut names: Vec<String> = self
            .store
            .find_all()
            .await?
            .into_iter()
            .map(|automobile| automobile.name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Upserts the fixed startup record.
    pub async fn seed(&self) -> Result<Automobile, ServiceError> {
        let seeded = self.store.save(Automobile::seed(Utc::now())).await?;
        tracing::info!("{} Seeded automobile: {:?}", API_NAME, seeded.id);
        Ok(seeded)
    }
}
