use std::sync::Arc;

use async_trait::async_trait;

use super::errors::StoreError;
use crate::models::Automobile;

pub type SharedStore = Arc<dyn AutomobileStore>;

/// Zero-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// Typed access to persisted automobiles.
///
/// `save` is an upsert keyed by id; a record without an id gets one assigned.
/// Every query returns soft-deleted rows too, callers decide on visibility.
#[async_trait]
pub trait AutomobileStore: Send + Sync {
    async fn save(&self, automobile: Automobile) -> Result<Automobile, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Automobile>, StoreError>;

    /// All rows ordered by id.
    async fn find_all(&self) -> Result<Vec<Automobile>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Vec<Automobile>, StoreError>;

    async fn find_by_color(&self, color: &str) -> Result<Vec<Automobile>, StoreError>;

    async fn find_by_name_and_color(
        &self,
        name: &str,
        color: &str,
    ) -> Result<Vec<Automobile>, StoreError>;

    /// Literal prefix match on color, sorted by color ascending then id.
    async fn find_by_color_starts_with(
        &self,
        prefix: &str,
        page: PageRequest,
    ) -> Result<Vec<Automobile>, StoreError>;

    async fn delete_all(&self) -> Result<(), StoreError>;
}
