//! The five-operation CRUD contract, written once.
//!
//! Every resource service funnels its storage calls through these helpers so
//! that absence becomes `AppError::NotFound` in exactly one place. The helpers
//! are generic over the store, which lets services pass `&dyn Repository`
//! directly.

use crate::{
    error::AppError,
    repository::{CrudStore, Record},
};
use uuid::Uuid;

pub async fn create<T, S>(store: &S, record: T) -> Result<T, AppError>
where
    T: Record,
    S: CrudStore<T> + ?Sized,
{
    let created = store.insert(record).await?;
    tracing::info!(kind = T::KIND, id = %created.id(), "record created");
    Ok(created)
}

pub async fn list_all<T, S>(store: &S) -> Result<Vec<T>, AppError>
where
    T: Record,
    S: CrudStore<T> + ?Sized,
{
    store.list().await
}

pub async fn find_by_id<T, S>(store: &S, id: Uuid) -> Result<T, AppError>
where
    T: Record,
    S: CrudStore<T> + ?Sized,
{
    match store.get(id).await? {
        Some(record) => Ok(record),
        None => {
            tracing::debug!(kind = T::KIND, %id, "record not found");
            Err(AppError::not_found(T::KIND, id))
        }
    }
}

/// Full replace. The record keeps the id it was looked up with.
pub async fn update<T, S>(store: &S, record: T) -> Result<T, AppError>
where
    T: Record,
    S: CrudStore<T> + ?Sized,
{
    let id = record.id();
    match store.replace(record).await? {
        Some(updated) => {
            tracing::info!(kind = T::KIND, %id, "record replaced");
            Ok(updated)
        }
        None => Err(AppError::not_found(T::KIND, id)),
    }
}

pub async fn delete<T, S>(store: &S, id: Uuid) -> Result<(), AppError>
where
    T: Record,
    S: CrudStore<T> + ?Sized,
{
    if store.delete(id).await? {
        tracing::info!(kind = T::KIND, %id, "record deleted");
        Ok(())
    } else {
        Err(AppError::not_found(T::KIND, id))
    }
}

/// Trims a filter value and rejects it when blank.
pub fn filter_value<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::field(field, "must not be blank"));
    }
    Ok(value)
}
