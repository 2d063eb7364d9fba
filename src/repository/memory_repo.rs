use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::store::{AutomobileStore, PageRequest};
use crate::models::Automobile;

#[derive(Default)]
struct Rows {
    by_id: BTreeMap<i64, Automobile>,
    last_id: i64,
}

/// Process-local store with the same contract as the Postgres repository.
#[derive(Default)]
pub struct InMemoryAutomobileRepository {
    rows: RwLock<Rows>,
}

impl InMemoryAutomobileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<F>(&self, predicate: F) -> Vec<Automobile>
    where
        F: Fn(&Automobile) -> bool,
    {
        let rows = self.rows.read().await;
        rows.by_id
            .values()
            .filter(|automobile| predicate(automobile))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AutomobileStore for InMemoryAutomobileRepository {
    async fn save(&self, mut automobile: Automobile) -> Result<Automobile, StoreError> {
        let mut rows = self.rows.write().await;
        let id = match automobile.id {
            Some(id) => {
                rows.last_id = rows.last_id.max(id);
                id
            }
            None => {
                rows.last_id += 1;
                rows.last_id
            }
        };
        automobile.id = Some(id);
        rows.by_id.insert(id, automobile.clone());
        Ok(automobile)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Automobile>, StoreError> {
        Ok(self.rows.read().await.by_id.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Automobile>, StoreError> {
        Ok(self.select(|_| true).await)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Automobile>, StoreError> {
        Ok(self.select(|automobile| automobile.name == name).await)
    }

    async fn find_by_color(&self, color: &str) -> Result<Vec<Automobile>, StoreError> {
        Ok(self.select(|automobile| automobile.color == color).await)
    }

    async fn find_by_name_and_color(
        &self,
        name: &str,
        color: &str,
    ) -> Result<Vec<Automobile>, StoreError> {
        Ok(self
            .select(|automobile| automobile.name == name && automobile.color == color)
            .await)
    }

    async fn find_by_color_starts_with(
        &self,
        prefix: &str,
        page: PageRequest,
    ) -> Result<Vec<Automobile>, StoreError> {
        let mut matches = self
            .select(|automobile| automobile.color.starts_with(prefix))
            .await;
        matches.sort_by(|a, b| a.color.cmp(&b.color).then(a.id.cmp(&b.id)));
        Ok(matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.rows.write().await.by_id.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(colors: &[(&str, &str)]) -> InMemoryAutomobileRepository {
        let store = InMemoryAutomobileRepository::new();
        for (name, color) in colors {
            store.save(Automobile::new(*name, *color)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = store_with(&[("Tesla", "Red"), ("Ford", "Green")]).await;

        let all = store.find_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn explicit_id_moves_the_counter_forward() {
        let store = InMemoryAutomobileRepository::new();
        let mut seeded = Automobile::new("Ford", "Green");
        seeded.id = Some(10);
        store.save(seeded).await.unwrap();

        let next = store.save(Automobile::new("Tesla", "Red")).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn save_with_existing_id_replaces_the_row() {
        let store = store_with(&[("Tesla", "Red")]).await;
        let mut changed = store.find_by_id(1).await.unwrap().unwrap();
        changed.color = "Black".to_string();
        store.save(changed).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].color, "Black");
    }

    #[tokio::test]
    async fn exact_filters() {
        let store = store_with(&[("Tesla", "Red"), ("Tesla", "White"), ("Ford", "Red")]).await;

        assert_eq!(store.find_by_name("Tesla").await.unwrap().len(), 2);
        assert_eq!(store.find_by_color("Red").await.unwrap().len(), 2);
        let both = store.find_by_name_and_color("Ford", "Red").await.unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, Some(3));
        assert!(store.find_by_name("tesla").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn color_prefix_is_sorted_and_paged() {
        let store = store_with(&[
            ("A", "Grey"),
            ("B", "Red"),
            ("C", "Green"),
            ("D", "Graphite"),
            ("E", "Gold"),
        ])
        .await;

        let first = store
            .find_by_color_starts_with("Gr", PageRequest::new(0, 2))
            .await
            .unwrap();
        let colors: Vec<_> = first.iter().map(|a| a.color.as_str()).collect();
        assert_eq!(colors, vec!["Graphite", "Green"]);

        let second = store
            .find_by_color_starts_with("Gr", PageRequest::new(1, 2))
            .await
            .unwrap();
        let colors: Vec<_> = second.iter().map(|a| a.color.as_str()).collect();
        assert_eq!(colors, vec!["Grey"]);
    }

    #[tokio::test]
    async fn delete_all_empties_the_store() {
        let store = store_with(&[("Tesla", "Red"), ("Ford", "Green")]).await;
        store.delete_all().await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
