//! Sign-up, sign-in and sign-out, shared by every front-end.

use showcase_core::validation::{validate_sign_in, validate_sign_up};
use showcase_core::{FormData, Session};
use tracing::info;

use crate::frontend::{HandlerError, Services};

/// Validate the form, create the account and keep the returned session.
pub async fn sign_up(services: &Services, form: &FormData, confirm_field: &str) -> Result<Session, HandlerError> {
    let credentials = validate_sign_up(form, confirm_field)?;
    let grant = services.auth.sign_up(&credentials).await?;
    let session = services.sessions.persist(&grant)?;
    info!(email = %session.email, "Registered");
    Ok(session)
}

pub async fn sign_in(services: &Services, form: &FormData) -> Result<Session, HandlerError> {
    let credentials = validate_sign_in(form)?;
    let grant = services.auth.sign_in(&credentials).await?;
    Ok(services.sessions.persist(&grant)?)
}

/// Forget the session. Signing out without one only clears storage.
pub async fn sign_out(services: &Services, session: Option<&Session>) -> Result<(), HandlerError> {
    if let Some(session) = session {
        services.auth.sign_out(session).await?;
    }
    services.sessions.clear()?;
    Ok(())
}
