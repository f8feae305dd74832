//! Store calls shared by the catalog front-ends.

use serde_json::Value;
use showcase_catalog::{decode, decode_all, draft_for, CatalogItem, Record};
use showcase_core::repository::overlay;
use showcase_core::{FormData, Session};
use tracing::info;

use crate::frontend::{HandlerError, Services};

pub async fn list<T: CatalogItem>(services: &Services) -> Result<Vec<Record<T>>, HandlerError> {
    let documents = services.store.get_all(T::COLLECTION).await?;
    Ok(decode_all(&documents))
}

pub async fn fetch<T: CatalogItem>(services: &Services, id: &str) -> Result<Record<T>, HandlerError> {
    let document = services.store.get(T::COLLECTION, id).await?;
    Ok(decode(&document)?)
}

/// Validate and add a record owned by `session`. Returns the new id.
pub async fn create<T: CatalogItem>(services: &Services, session: &Session, form: &FormData) -> Result<String, HandlerError> {
    let fields = draft_for::<T>(form, session)?;
    let id = services.store.add(T::COLLECTION, fields).await?;
    info!(collection = T::COLLECTION, %id, owner = T::OWNER_KEY.of(session), "Created");
    Ok(id)
}

/// Validate the form, then overwrite the stored record with the submitted
/// fields laid over it.
pub async fn edit<T: CatalogItem>(services: &Services, id: &str, form: &FormData) -> Result<(), HandlerError> {
    let submitted = T::validate_form(form)?;
    let stored = services.store.get(T::COLLECTION, id).await?;
    services
        .store
        .replace(T::COLLECTION, id, overlay(stored.fields, submitted))
        .await?;
    info!(collection = T::COLLECTION, %id, "Edited");
    Ok(())
}

pub async fn remove<T: CatalogItem>(services: &Services, id: &str) -> Result<(), HandlerError> {
    services.store.delete(T::COLLECTION, id).await?;
    info!(collection = T::COLLECTION, %id, "Deleted");
    Ok(())
}

/// Push `entry` into a keyed sub-collection of a record.
pub async fn append<T: CatalogItem>(services: &Services, id: &str, field: &str, entry: Value) -> Result<String, HandlerError> {
    Ok(services.store.append(T::COLLECTION, id, field, entry).await?)
}
