#![allow(dead_code)]

use std::sync::Arc;

use axum::http::Method;
use showcase_api::frontend::{Frontend, Services};
use showcase_api::{AppState, Backends, Dispatcher, Page};
use showcase_core::{
    BannerKind, BannerTiming, Document, DocumentStore, EngagementPolicy, FormData, Location, Notifier,
    SessionManager,
};
use showcase_store::MemoryStorage;

pub const PASSWORD: &str = "123456";

/// Services over the in-memory backends with a fresh local storage.
pub fn services(backends: &Backends) -> Services {
    Services {
        store: backends.store.clone(),
        auth: backends.auth.clone(),
        sessions: SessionManager::new(Arc::new(MemoryStorage::new())),
        notifier: Notifier::new(BannerTiming::default()),
    }
}

pub fn backends() -> Backends {
    Backends::in_memory("test-secret", 3600).unwrap()
}

pub fn dispatcher(frontend: impl Frontend + 'static, backends: &Backends) -> Dispatcher {
    Dispatcher::new(Box::new(frontend), services(backends))
}

/// Full application state with all three front-ends sharing one in-memory backend.
pub fn build_test_state(likes: EngagementPolicy, purchases: EngagementPolicy) -> (AppState, Backends) {
    use showcase_api::frontends::{Destinations, Movies, ShoeShelf};

    let backends = backends();
    let state = AppState::new(vec![
        dispatcher(Destinations, &backends),
        dispatcher(Movies { likes }, &backends),
        dispatcher(ShoeShelf { purchases }, &backends),
    ])
    .expect("state should build");
    (state, backends)
}

pub fn form(pairs: &[(&str, &str)]) -> FormData {
    pairs.iter().copied().collect()
}

pub async fn get(dispatcher: &Dispatcher, location: &str) -> Page {
    dispatcher
        .dispatch(Method::GET, Location::parse(location), FormData::default())
        .await
}

pub async fn post(dispatcher: &Dispatcher, location: &str, fields: &[(&str, &str)]) -> Page {
    dispatcher
        .dispatch(Method::POST, Location::parse(location), form(fields))
        .await
}

/// Register `email` through the front-end's own form.
pub async fn register(dispatcher: &Dispatcher, email: &str, confirm_field: &str) {
    let page = post(
        dispatcher,
        "register",
        &[("email", email), ("password", PASSWORD), (confirm_field, PASSWORD)],
    )
    .await;
    assert_eq!(page, Page::Redirect(Location::new(["home"])));
}

pub async fn login(dispatcher: &Dispatcher, email: &str) {
    let page = post(dispatcher, "login", &[("email", email), ("password", PASSWORD)]).await;
    assert_eq!(page, Page::Redirect(Location::new(["home"])));
}

pub async fn records(dispatcher: &Dispatcher, collection: &str) -> Vec<Document> {
    dispatcher.services().store.get_all(collection).await.unwrap()
}

pub fn assert_banner(dispatcher: &Dispatcher, kind: BannerKind, message: &str) {
    let banner = dispatcher.banner().expect("a banner should be visible");
    assert_eq!(banner.kind, kind);
    assert_eq!(banner.message, message);
}

/// The view a page shows, panicking on redirects.
pub fn shown(page: Page) -> showcase_api::render::View {
    match page {
        Page::Show(view) => view,
        other => panic!("expected a rendered page, got {:?}", other),
    }
}

pub fn store(dispatcher: &Dispatcher) -> Arc<dyn DocumentStore> {
    dispatcher.services().store.clone()
}
