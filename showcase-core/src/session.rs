use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::identity::{AuthGrant, Session};
use crate::repository::{KeyValueStorage, StorageError};

/// Storage key holding `{ email, uid }`.
pub const USER_KEY: &str = "user";
/// Storage key holding the full token blob.
pub const AUTH_KEY: &str = "auth";

#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    email: String,
    uid: String,
}

/// Loads, persists and clears the signed-in user of one front-end.
///
/// The session is read from storage on every request and handed to the
/// handler as a value, so nothing holds on to a stale identity.
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        self.load_at(Utc::now())
    }

    /// Read the session as of `now`. Unreadable or expired sessions are removed
    /// and reported as signed out.
    pub fn load_at(&self, now: DateTime<Utc>) -> Result<Option<Session>, StorageError> {
        let (Some(user), Some(auth)) = (self.storage.get_item(USER_KEY)?, self.storage.get_item(AUTH_KEY)?) else {
            return Ok(None);
        };

        let parsed = serde_json::from_str::<StoredUser>(&user)
            .and_then(|user| serde_json::from_str::<AuthGrant>(&auth).map(|grant| (user, grant)));

        let (user, grant) = match parsed {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                self.clear()?;
                return Ok(None);
            }
        };

        let mut session = Session::from_grant(&grant);
        session.email = user.email;
        session.uid = user.uid;

        if session.is_expired_at(now) {
            info!(email = %session.email, "Session token expired, signing out");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn persist(&self, grant: &AuthGrant) -> Result<Session, StorageError> {
        let session = Session::from_grant(grant);
        let user = StoredUser {
            email: session.email.clone(),
            uid: session.uid.clone(),
        };

        self.storage.set_item(USER_KEY, &serde_json::to_string(&user)?)?;
        self.storage.set_item(AUTH_KEY, &serde_json::to_string(grant)?)?;
        Ok(session)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(USER_KEY)?;
        self.storage.remove_item(AUTH_KEY)
    }
}
