mod common;

use std::time::Duration;

use serde_json::{json, Value};
use showcase_core::{AuthService, Credentials, DocumentStore, Session, StoreError};
use showcase_store::app_config::AuthConfig;
use showcase_store::{IdentityToolkit, RestDocumentStore};

use common::{FakeDatabase, FakeIdentity, API_KEY};

fn fields(value: Value) -> showcase_core::Fields {
    value.as_object().cloned().unwrap()
}

async fn store() -> (FakeDatabase, RestDocumentStore) {
    let db = FakeDatabase::default();
    let base = common::spawn(db.router()).await;
    let store = RestDocumentStore::new(&format!("{}/", base), Duration::from_secs(5)).unwrap();
    (db, store)
}

async fn toolkit(api_key: &str) -> IdentityToolkit {
    let base = common::spawn(FakeIdentity::default().router()).await;
    IdentityToolkit::new(&AuthConfig {
        endpoint: base,
        api_key: api_key.to_string(),
        timeout_seconds: 5,
        token_secret: String::new(),
        token_ttl_seconds: 3600,
    })
    .unwrap()
}

#[tokio::test]
async fn test_add_then_read_back() {
    let (db, store) = store().await;

    let id = store
        .add("destinations", fields(json!({ "destination": "Paris", "duration": 5 })))
        .await
        .unwrap();
    assert_eq!(db.value_at(&format!("destinations/{}/destination", id)), "Paris");

    let doc = store.get("destinations", &id).await.unwrap();
    assert_eq!(doc.id, id);
    assert_eq!(doc.fields["duration"], 5);

    let all = store.get_all("destinations").await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_empty_collection_reads_as_empty_list() {
    let (_db, store) = store().await;
    assert!(store.get_all("movies").await.unwrap().is_empty());
    assert!(matches!(store.get("movies", "-missing").await, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_replace_overwrites_record() {
    let (db, store) = store().await;
    let id = store.add("movies", fields(json!({ "title": "Heat", "creator": "a@b.c" }))).await.unwrap();

    store.replace("movies", &id, fields(json!({ "title": "Ronin" }))).await.unwrap();

    assert_eq!(db.value_at(&format!("movies/{}", id)), json!({ "title": "Ronin" }));
}

#[tokio::test]
async fn test_crafted_ids_stay_inside_their_collection() {
    let (db, store) = store().await;
    let id = store
        .add("destinations", fields(json!({ "destination": "Paris" })))
        .await
        .unwrap();
    let crafted = format!("../destinations/{}", id);

    let deleted = store.delete("movies", &crafted).await;
    assert!(matches!(deleted, Err(StoreError::NotFound { .. })));
    let read = store.get("movies", &crafted).await;
    assert!(matches!(read, Err(StoreError::NotFound { .. })));
    let replaced = store.replace("movies", &crafted, fields(json!({ "title": "Heat" }))).await;
    assert!(matches!(replaced, Err(StoreError::NotFound { .. })));
    let appended = store.append("movies", &crafted, "likes", json!({ "user": "a@b.c" })).await;
    assert!(matches!(appended, Err(StoreError::NotFound { .. })));

    assert_eq!(
        db.value_at(&format!("destinations/{}", id)),
        json!({ "destination": "Paris" })
    );
    assert_eq!(db.value_at("movies"), Value::Null);
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let (db, store) = store().await;
    let id = store.add("shoes", fields(json!({ "productName": "Air" }))).await.unwrap();

    store.delete("shoes", &id).await.unwrap();
    assert_eq!(db.value_at(&format!("shoes/{}", id)), Value::Null);

    let second = store.delete("shoes", &id).await;
    assert!(matches!(second, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_append_pushes_under_field() {
    let (db, store) = store().await;
    let id = store.add("movies", fields(json!({ "title": "Heat" }))).await.unwrap();

    let key = store.append("movies", &id, "likes", json!({ "user": "a@b.c" })).await.unwrap();

    assert_eq!(db.value_at(&format!("movies/{}/likes/{}/user", id, key)), "a@b.c");
}

#[tokio::test]
async fn test_service_error_message_is_passed_on() {
    let (_db, store) = store().await;
    let err = store.get_all("locked").await.unwrap_err();
    assert!(matches!(&err, StoreError::Rejected(_)));
    assert_eq!(err.to_string(), "Permission denied");
}

#[tokio::test]
async fn test_unreachable_store_is_a_transport_error() {
    let store = RestDocumentStore::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    assert!(matches!(store.get_all("movies").await, Err(StoreError::Transport(_))));
}

#[tokio::test]
async fn test_sign_up_and_sign_in() {
    let auth = toolkit(API_KEY).await;
    let credentials = Credentials::new("peter@abv.bg", "123456");

    let grant = auth.sign_up(&credentials).await.unwrap();
    assert_eq!(grant.email, "peter@abv.bg");
    assert_eq!(grant.local_id, "uid-peter@abv.bg");

    let grant = auth.sign_in(&credentials).await.unwrap();
    let session = Session::from_grant(&grant);
    assert_eq!(session.uid, "uid-peter@abv.bg");

    auth.sign_out(&session).await.unwrap();
}

#[tokio::test]
async fn test_auth_errors_carry_service_message() {
    let auth = toolkit(API_KEY).await;
    let credentials = Credentials::new("peter@abv.bg", "123456");
    auth.sign_up(&credentials).await.unwrap();

    let duplicate = auth.sign_up(&credentials).await.unwrap_err();
    assert_eq!(duplicate.to_string(), "EMAIL_EXISTS");

    let wrong = auth
        .sign_in(&Credentials::new("peter@abv.bg", "000000"))
        .await
        .unwrap_err();
    assert_eq!(wrong.to_string(), "INVALID_PASSWORD");
}

#[tokio::test]
async fn test_bad_api_key_is_rejected() {
    let auth = toolkit("wrong").await;
    let err = auth
        .sign_in(&Credentials::new("peter@abv.bg", "123456"))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("API key not valid"));
}
