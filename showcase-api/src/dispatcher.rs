use std::sync::{Mutex, PoisonError};

use axum::http::Method;
use showcase_core::{Banner, FormData, Location, NavigationGuard};
use tracing::{debug, info, warn};

use crate::frontend::{Frontend, Outcome, Request, Services, Step};
use crate::render::View;

/// What the HTTP layer should send back for one navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Show(View),
    Redirect(Location),
    /// A newer navigation started before this one finished; the screen is untouched.
    Superseded,
}

/// Runs navigations of one front-end and owns its current screen.
pub struct Dispatcher {
    frontend: Box<dyn Frontend>,
    services: Services,
    guard: NavigationGuard,
    screen: Mutex<Option<View>>,
}

impl Dispatcher {
    pub fn new(frontend: Box<dyn Frontend>, services: Services) -> Self {
        Self {
            frontend,
            services,
            guard: NavigationGuard::new(),
            screen: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.frontend.name()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn banner(&self) -> Option<Banner> {
        self.services.notifier.current()
    }

    pub fn screen(&self) -> Option<View> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub async fn dispatch(&self, method: Method, location: Location, form: FormData) -> Page {
        // 1. Take a ticket; anything that started earlier is now stale
        let ticket = self.guard.begin();
        let location = if location.is_root() { self.frontend.home() } else { location };

        // 2. Read the session right before the handler needs it
        let session = match self.services.sessions.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(frontend = self.name(), "Local storage unreadable, continuing signed out: {}", e);
                None
            }
        };

        if method == Method::POST {
            self.services.notifier.loading();
        }

        // 3. Run the handler
        let request = Request {
            location: location.clone(),
            session: session.clone(),
            form,
        };
        let result = if method == Method::POST {
            self.frontend.post(&self.services, request).await
        } else {
            self.frontend.get(&self.services, request).await
        };

        // 4. Apply the result only if no newer navigation has started
        let mut screen = self.screen.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.guard.is_current(ticket) {
            debug!(frontend = self.name(), "Discarding superseded navigation to {}", location);
            return Page::Superseded;
        }

        match result {
            Ok(Outcome { step, notice }) => {
                if let Some(notice) = notice {
                    info!(frontend = self.name(), "{}", notice);
                    self.services.notifier.success(notice);
                }
                match step {
                    Step::Render(view) => {
                        *screen = Some(view.clone());
                        Page::Show(view)
                    }
                    Step::Redirect(target) => Page::Redirect(target),
                }
            }
            Err(e) => {
                warn!(frontend = self.name(), "{} {} failed: {}", method, location, e);
                self.services.notifier.error(e.to_string());
                // The session may have changed since the screen was rendered
                let view = match screen.clone() {
                    Some(previous) => previous.for_viewer(session.as_ref()),
                    None => View::new("empty", session.as_ref()),
                };
                Page::Show(view)
            }
        }
    }
}
