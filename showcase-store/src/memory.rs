//! In-process backends for offline runs and tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{Map, Value};
use showcase_core::{
    AuthError, AuthGrant, AuthService, Credentials, Document, DocumentStore, Fields, Session, StoreError,
};
use showcase_shared::Masked;
use tracing::info;
use uuid::Uuid;

fn new_key() -> String {
    format!("-{}", Uuid::now_v7().simple())
}

/// Document store held in memory. Collections keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collection<R>(&self, collection: &str, f: impl FnOnce(&mut Vec<Document>) -> R) -> R {
        let mut collections = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        f(collections.entry(collection.to_string()).or_default())
    }
}

fn not_found(collection: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.with_collection(collection, |docs| docs.clone()))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.with_collection(collection, |docs| docs.iter().find(|d| d.id == id).cloned())
            .ok_or_else(|| not_found(collection, id))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = new_key();
        self.with_collection(collection, |docs| docs.push(Document::new(id.clone(), fields)));
        Ok(id)
    }

    async fn replace(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.with_collection(collection, |docs| match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => doc.fields = fields,
            None => docs.push(Document::new(id, fields)),
        });
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.with_collection(collection, |docs| {
            let before = docs.len();
            docs.retain(|d| d.id != id);
            before != docs.len()
        })
        .then_some(())
        .ok_or_else(|| not_found(collection, id))
    }

    async fn append(&self, collection: &str, id: &str, field: &str, entry: Value) -> Result<String, StoreError> {
        self.with_collection(collection, |docs| {
            let doc = docs
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| not_found(collection, id))?;

            let slot = doc.fields.entry(field.to_string()).or_insert_with(|| Value::Object(Map::new()));
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }

            match slot {
                Value::Object(entries) => {
                    let key = new_key();
                    entries.insert(key.clone(), entry);
                    Ok(key)
                }
                _ => Err(StoreError::Rejected(format!("{} of {} is not a keyed collection", field, id))),
            }
        })
    }
}

#[derive(Serialize)]
struct TokenClaims<'a> {
    sub: &'a str,
    email: &'a str,
    iat: i64,
    exp: i64,
}

struct Account {
    password: Masked<String>,
    uid: String,
}

/// Auth service keeping accounts in memory and minting HS256 tokens.
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    secret: String,
    ttl: Duration,
}

impl MemoryAuth {
    /// Fails when `ttl_seconds` does not fit a token expiry instant.
    pub fn new(secret: impl Into<String>, ttl_seconds: u64) -> Result<Self, AuthError> {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| AuthError::Config(format!("token_ttl_seconds {} is out of range", ttl_seconds)))?;

        Ok(Self {
            accounts: Mutex::new(HashMap::new()),
            secret: secret.into(),
            ttl,
        })
    }

    fn grant(&self, email: &str, uid: &str) -> Result<AuthGrant, AuthError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Config("token lifetime overflows the clock".to_string()))?;
        let claims = TokenClaims {
            sub: uid,
            email,
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| AuthError::Malformed(format!("Token encoding failed: {}", e)))?;

        Ok(AuthGrant {
            id_token: Masked(token),
            refresh_token: Masked(new_key()),
            expires_in: self.ttl.num_seconds().to_string(),
            email: email.to_string(),
            local_id: uid.to_string(),
        })
    }
}

#[async_trait]
impl AuthService for MemoryAuth {
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError> {
        if credentials.password.expose().chars().count() < 6 {
            return Err(AuthError::Rejected(
                "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
            ));
        }

        let uid = {
            let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
            if accounts.contains_key(&credentials.email) {
                return Err(AuthError::Rejected("EMAIL_EXISTS".to_string()));
            }
            let uid = Uuid::new_v4().simple().to_string();
            accounts.insert(
                credentials.email.clone(),
                Account {
                    password: credentials.password.clone(),
                    uid: uid.clone(),
                },
            );
            uid
        };

        info!(email = %credentials.email, "Account created");
        self.grant(&credentials.email, &uid)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError> {
        let uid = {
            let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
            let account = accounts
                .get(&credentials.email)
                .ok_or_else(|| AuthError::Rejected("EMAIL_NOT_FOUND".to_string()))?;
            if account.password != credentials.password {
                return Err(AuthError::Rejected("INVALID_PASSWORD".to_string()));
            }
            account.uid.clone()
        };

        self.grant(&credentials.email, &uid)
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }
}
