use crate::{
    data::{DataType, RecordStore},
    error::RosterResult,
};
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A [`RecordStore`] that lives and dies with the process. Used when `DATABASE_URL` is unset or
/// unusable, and by the tests.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<T: DataType> RecordStore<T> for MemoryStore<T> {
    async fn insert_into_database(&self, to_be_added: T::FormForAdding) -> RosterResult<T> {
        let record = T::from_form(to_be_added, Uuid::new_v4(), OffsetDateTime::now_utc());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn get_all(&self) -> RosterResult<Vec<T>> {
        //insertion order reversed first so equal timestamps still come out newest first
        let mut all: Vec<T> = self.records.read().await.iter().rev().cloned().collect();
        all.sort_by_key(|record| std::cmp::Reverse(record.created_at()));
        Ok(all)
    }

    async fn get_from_db_by_id(&self, id: Uuid) -> RosterResult<Option<T>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned())
    }

    async fn update_in_database(
        &self,
        id: Uuid,
        to_be_updated: T::FormForUpdating,
    ) -> RosterResult<Option<T>> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
            return Ok(None);
        };
        record.apply_update(to_be_updated, OffsetDateTime::now_utc());
        Ok(Some(record.clone()))
    }

    async fn remove_from_database(&self, id: Uuid) -> RosterResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() != before)
    }
}
