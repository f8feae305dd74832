use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use showcase_core::{AuthService, DocumentStore, KeyValueStorage, Notifier, SessionManager};
use showcase_store::app_config::Config;
use showcase_store::{BackendMode, FileStorage, IdentityToolkit, MemoryAuth, MemoryStorage, MemoryStore, RestDocumentStore};
use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::frontend::{Frontend, Services};
use crate::frontends::{Destinations, Movies, ShoeShelf};
use crate::render::Renderer;

/// The remote services all front-ends talk to.
#[derive(Clone)]
pub struct Backends {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthService>,
}

impl Backends {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.backend.mode {
            BackendMode::Remote => {
                let store = RestDocumentStore::new(
                    &config.store.base_url,
                    Duration::from_secs(config.store.timeout_seconds),
                )
                .context("Failed to build document store client")?;
                let auth = IdentityToolkit::new(&config.auth).context("Failed to build auth client")?;
                info!("Using document store at {}", config.store.base_url);
                Ok(Self {
                    store: Arc::new(store),
                    auth: Arc::new(auth),
                })
            }
            BackendMode::Memory => {
                info!("Using in-memory document store and auth");
                Self::in_memory(&config.auth.token_secret, config.auth.token_ttl_seconds)
            }
        }
    }

    pub fn in_memory(token_secret: &str, token_ttl_seconds: u64) -> anyhow::Result<Self> {
        let auth = MemoryAuth::new(token_secret, token_ttl_seconds).context("Failed to build in-memory auth")?;
        Ok(Self {
            store: Arc::new(MemoryStore::new()),
            auth: Arc::new(auth),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub frontends: Arc<HashMap<&'static str, Arc<Dispatcher>>>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(dispatchers: Vec<Dispatcher>) -> anyhow::Result<Self> {
        let renderer = Renderer::new().context("Failed to compile templates")?;
        let frontends = dispatchers
            .into_iter()
            .map(|d| (d.name(), Arc::new(d)))
            .collect();

        Ok(Self {
            frontends: Arc::new(frontends),
            renderer: Arc::new(renderer),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let backends = Backends::from_config(config)?;

        let frontends: Vec<Box<dyn Frontend>> = vec![
            Box::new(Destinations),
            Box::new(Movies {
                likes: config.engagement.movie_likes,
            }),
            Box::new(ShoeShelf {
                purchases: config.engagement.offer_purchases,
            }),
        ];

        let mut dispatchers = Vec::with_capacity(frontends.len());
        for frontend in frontends {
            let storage: Arc<dyn KeyValueStorage> = match &config.storage.dir {
                Some(dir) => {
                    let path = dir.join(format!("{}.json", frontend.name()));
                    Arc::new(FileStorage::open(&path).with_context(|| format!("Failed to open {}", path.display()))?)
                }
                None => Arc::new(MemoryStorage::new()),
            };

            let services = Services {
                store: backends.store.clone(),
                auth: backends.auth.clone(),
                sessions: SessionManager::new(storage),
                notifier: Notifier::new(config.banner.timing()),
            };
            dispatchers.push(Dispatcher::new(frontend, services));
        }

        Self::new(dispatchers)
    }

    pub fn frontend(&self, name: &str) -> Option<Arc<Dispatcher>> {
        self.frontends.get(name).cloned()
    }
}
