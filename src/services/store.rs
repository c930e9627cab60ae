//! Shared record store
//!
//! One in-memory copy of every collection, guarded by a lock and written back
//! to the JSON file after each change. All pages read and write through it.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::debug;

use crate::database::{Collection, CrmData, Database, StoreError};
use crate::logging;
use crate::services::time_provider::Clock;
use crate::services::{ServiceError, ServiceResult};

/// Shared state of the back office
#[derive(Debug, Clone)]
pub struct CrmStore {
    data: Arc<RwLock<CrmData>>,
    database: Arc<Database>,
    clock: Clock,
}

impl CrmStore {
    /// Load the data file, creating it from `init` on first start
    pub async fn open(
        database: Database,
        clock: Clock,
        init: impl FnOnce() -> CrmData,
    ) -> Result<Self, StoreError> {
        let data = database.load_or_init(init).await?;
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            database: Arc::new(database),
            clock,
        })
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Run `f` against a consistent view of the data
    pub async fn read<R>(&self, f: impl FnOnce(&CrmData) -> R) -> R {
        let data = self.data.read().await;
        f(&data)
    }

    /// Apply `f` to a copy of the data, persist the copy, then publish it
    ///
    /// When `f` fails or the write fails, readers keep seeing the previous state.
    pub async fn mutate<R, E>(&self, f: impl FnOnce(&mut CrmData) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut data = self.data.write().await;
        let mut draft = data.clone();
        let result = f(&mut draft)?;

        let started = Instant::now();
        self.database.write(&draft).await?;
        logging::log_persisted("mutate", started.elapsed().as_millis());

        *data = draft;
        Ok(result)
    }

    /// Every record of a collection, in stored order
    pub async fn list<T: Collection>(&self) -> Vec<T> {
        self.read(|data| T::collection(data).clone()).await
    }

    pub async fn get<T: Collection>(&self, id: &str) -> ServiceResult<T> {
        self.read(|data| data.find::<T>(id).cloned())
            .await
            .ok_or_else(|| ServiceError::not_found::<T>(id))
    }

    /// Replace the record with the same id, or append it when none exists
    ///
    /// Returns the stored record and whether it was newly created.
    pub async fn upsert<T: Collection>(&self, record: T) -> ServiceResult<(T, bool)> {
        record.validate()?;
        let created = self
            .mutate(|data| {
                let records = T::collection_mut(data);
                let created = match records.iter_mut().find(|r| r.id() == record.id()) {
                    Some(existing) => {
                        *existing = record.clone();
                        false
                    }
                    None => {
                        records.push(record.clone());
                        true
                    }
                };
                Ok::<_, ServiceError>(created)
            })
            .await?;

        logging::log_record_saved(T::KIND, record.id(), created);
        Ok((record, created))
    }

    /// Rebuild an existing record from its stored value in one write
    ///
    /// The lookup and the write share the lock, so a record removed in
    /// between is reported as missing instead of being stored again.
    pub async fn replace<T: Collection>(
        &self,
        id: &str,
        build: impl FnOnce(&T) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let record = self
            .mutate(|data| {
                let records = T::collection_mut(data);
                let existing = records
                    .iter_mut()
                    .find(|r| r.id() == id)
                    .ok_or_else(|| ServiceError::not_found::<T>(id))?;
                let record = build(&*existing)?;
                record.validate()?;
                *existing = record.clone();
                Ok::<_, ServiceError>(record)
            })
            .await?;

        logging::log_record_saved(T::KIND, record.id(), false);
        Ok(record)
    }

    /// Insert a new record at the front of its collection
    pub async fn prepend<T: Collection>(&self, record: T) -> ServiceResult<T> {
        record.validate()?;
        self.mutate(|data| {
            T::collection_mut(data).insert(0, record.clone());
            Ok::<_, ServiceError>(())
        })
        .await?;

        logging::log_record_saved(T::KIND, record.id(), true);
        Ok(record)
    }

    /// Remove a record by id, returning it
    pub async fn remove<T: Collection>(&self, id: &str) -> ServiceResult<T> {
        let removed = self
            .mutate(|data| {
                let records = T::collection_mut(data);
                let position = records
                    .iter()
                    .position(|r| r.id() == id)
                    .ok_or_else(|| ServiceError::not_found::<T>(id))?;
                Ok::<_, ServiceError>(records.remove(position))
            })
            .await?;

        logging::log_record_deleted(T::KIND, id);
        debug!(kind = T::KIND, id = %id, "Removed from collection");
        Ok(removed)
    }
}
