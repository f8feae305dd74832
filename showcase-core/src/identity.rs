use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use showcase_shared::Masked;

/// Email and password as submitted on a sign-in or sign-up form.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Masked<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Masked(password.into()),
        }
    }
}

/// Token blob handed out by the auth service on sign-in or sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub id_token: Masked<String>,
    #[serde(default)]
    pub refresh_token: Masked<String>,
    /// Token lifetime in seconds, as a decimal string.
    #[serde(default)]
    pub expires_in: String,
    pub email: String,
    pub local_id: String,
}

/// The signed-in user of a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub uid: String,
    pub token: Masked<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_grant(grant: &AuthGrant) -> Self {
        Self {
            email: grant.email.clone(),
            uid: grant.local_id.clone(),
            token: grant.id_token.clone(),
            expires_at: token_expiry(grant.id_token.expose()),
        }
    }

    /// Sessions whose token carries no readable expiry never expire locally.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without checking its signature.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let header = decode_header(token).ok()?;

    // The key is never used for verification; it only has to match the algorithm family.
    let key = match header.alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => DecodingKey::from_secret(&[]),
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_components("AQAB", "AQAB").ok()?,
        _ => return None,
    };

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaim>(token, &key, &validation).ok()?;
    data.claims
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}
