use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::identity::{AuthGrant, Credentials, Session};

/// Flat JSON object holding a record's fields.
pub type Fields = Map<String, Value>;

/// A record read back from the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self { id: id.into(), fields }
    }

    /// Decode the fields into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| StoreError::Malformed {
            id: self.id.clone(),
            reason: e.to_string(),
        })
    }
}

/// Lay `submitted` over `stored`: submitted keys win, everything else keeps its stored value.
pub fn overlay(mut stored: Fields, submitted: Fields) -> Fields {
    for (key, value) in submitted {
        stored.insert(key, value);
    }
    stored
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No record with id {id} exists in {collection}")]
    NotFound { collection: String, id: String },
    /// The service answered with an error; the message is passed on verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("Could not reach the document store: {0}")]
    Transport(String),
    #[error("Record {id} could not be read: {reason}")]
    Malformed { id: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("Could not reach the auth service: {0}")]
    Transport(String),
    #[error("Unexpected answer from the auth service: {0}")]
    Malformed(String),
    #[error("Invalid auth configuration: {0}")]
    Config(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Local storage is unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("Local storage holds invalid data: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Remote document database addressed by collection and id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// Add a record and return the id the store assigned to it.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Overwrite the whole record.
    async fn replace(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Push `entry` into the keyed sub-collection `field` of a record and return the new key.
    async fn append(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        entry: Value,
    ) -> Result<String, StoreError>;
}

/// Remote email/password authentication service.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError>;

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}

/// String key/value storage that survives restarts, like a browser's local storage.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
