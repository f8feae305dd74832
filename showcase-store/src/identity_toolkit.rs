use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use showcase_core::{AuthError, AuthGrant, AuthService, Credentials, Session};
use tracing::{info, warn};

use crate::app_config::AuthConfig;

/// Email/password accounts on the Identity Toolkit REST API.
#[derive(Clone)]
pub struct IdentityToolkit {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityToolkit {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn password_call(&self, action: &str, credentials: &Credentials) -> Result<AuthGrant, AuthError> {
        let url = format!("{}/accounts:{}", self.endpoint, action);
        let body = PasswordRequest {
            email: &credentials.email,
            password: credentials.password.expose(),
            return_secure_token: true,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("Auth service answered {}", status));
            warn!(email = %credentials.email, "{} rejected: {}", action, message);
            return Err(AuthError::Rejected(message));
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| AuthError::Malformed(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| AuthError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl AuthService for IdentityToolkit {
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError> {
        let grant = self.password_call("signUp", credentials).await?;
        info!(email = %grant.email, "Account created");
        Ok(grant)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError> {
        let grant = self.password_call("signInWithPassword", credentials).await?;
        info!(email = %grant.email, "Signed in");
        Ok(grant)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        // Tokens are bearer tokens; signing out only forgets them locally.
        info!(email = %session.email, "Signed out");
        Ok(())
    }
}
