use std::sync::Arc;

use async_trait::async_trait;
use showcase_core::{
    AuthError, AuthService, DocumentStore, FormData, Location, Notifier, Session,
    SessionManager, StorageError, StoreError, ValidationError,
};

use crate::render::View;

/// Everything a front-end's handlers may call.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthService>,
    pub sessions: SessionManager,
    pub notifier: Notifier,
}

/// One navigation as a handler sees it.
#[derive(Debug, Clone)]
pub struct Request {
    pub location: Location,
    /// Session read from local storage right before the handler ran.
    pub session: Option<Session>,
    pub form: FormData,
}

impl Request {
    pub fn session(&self) -> Result<&Session, HandlerError> {
        self.session.as_ref().ok_or(HandlerError::Unauthenticated)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Render(View),
    Redirect(Location),
}

/// What a handler asks the dispatcher to do with the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub step: Step,
    /// Success message shown once the outcome is applied.
    pub notice: Option<String>,
}

impl Outcome {
    pub fn render(view: View) -> Self {
        Self {
            step: Step::Render(view),
            notice: None,
        }
    }

    pub fn redirect(location: impl Into<Location>) -> Self {
        Self {
            step: Step::Redirect(location.into()),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Please sign in first!")]
    Unauthenticated,
    #[error("Page not found: {0}")]
    UnknownRoute(Location),
    /// A refused action, with the message to show.
    #[error("{0}")]
    Rejected(String),
}

/// A route table: maps locations to handlers for one catalog front-end.
#[async_trait]
pub trait Frontend: Send + Sync {
    /// Path prefix the front-end is served under.
    fn name(&self) -> &'static str;

    /// Location shown when the front-end is opened without one.
    fn home(&self) -> Location {
        Location::new(["home"])
    }

    async fn get(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError>;

    async fn post(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError>;
}
