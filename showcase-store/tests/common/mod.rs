//! Fake Realtime Database and Identity Toolkit endpoints served on a loopback port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

pub const API_KEY: &str = "test-key";

/// Bind `router` to an ephemeral port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[derive(Clone, Default)]
pub struct FakeDatabase {
    pub root: Arc<Mutex<Value>>,
    pushes: Arc<AtomicU64>,
}

impl FakeDatabase {
    pub fn router(&self) -> Router {
        Router::new()
            .route("/{*path}", any(database_call))
            .with_state(self.clone())
    }

    pub fn value_at(&self, path: &str) -> Value {
        let segments: Vec<&str> = path.split('/').collect();
        db_value(&self.root.lock().unwrap(), &segments)
    }
}

fn slot<'a>(root: &'a mut Value, segments: &[&str]) -> &'a mut Value {
    let mut node = root;
    for segment in segments {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = node
            .as_object_mut()
            .unwrap()
            .entry(segment.to_string())
            .or_insert(Value::Null);
    }
    node
}

async fn database_call(
    State(db): State<FakeDatabase>,
    method: Method,
    Path(path): Path<String>,
    body: Bytes,
) -> Response {
    let path = path.trim_end_matches(".json").to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.first() == Some(&"locked") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Permission denied" }))).into_response();
    }

    let body: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    let mut root = db.root.lock().unwrap();
    match method {
        Method::GET => Json(db_value(&root, &segments)).into_response(),
        Method::POST => {
            let key = format!("-k{:04}", db.pushes.fetch_add(1, Ordering::SeqCst));
            let mut full = segments.clone();
            full.push(&key);
            *slot(&mut root, &full) = body;
            Json(json!({ "name": key })).into_response()
        }
        Method::PUT => {
            *slot(&mut root, &segments) = body.clone();
            Json(body).into_response()
        }
        Method::DELETE => {
            if let Some((last, parent)) = segments.split_last() {
                if let Some(map) = slot(&mut root, parent).as_object_mut() {
                    map.remove(*last);
                }
            }
            Json(Value::Null).into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn db_value(root: &Value, segments: &[&str]) -> Value {
    let mut node = root;
    for segment in segments {
        match node.get(*segment) {
            Some(next) => node = next,
            None => return Value::Null,
        }
    }
    node.clone()
}

#[derive(Clone, Default)]
pub struct FakeIdentity {
    accounts: Arc<Mutex<HashMap<String, String>>>,
}

impl FakeIdentity {
    pub fn router(&self) -> Router {
        Router::new()
            .route("/accounts:signUp", post(sign_up))
            .route("/accounts:signInWithPassword", post(sign_in))
            .with_state(self.clone())
    }
}

fn auth_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message } })),
    )
        .into_response()
}

fn grant(email: &str) -> Response {
    Json(json!({
        "idToken": format!("token-for-{}", email),
        "refreshToken": "refresh",
        "expiresIn": "3600",
        "email": email,
        "localId": format!("uid-{}", email),
    }))
    .into_response()
}

fn read_body(query: &HashMap<String, String>, body: &Value) -> Result<(String, String), Response> {
    if query.get("key").map(String::as_str) != Some(API_KEY) {
        return Err(auth_error("API key not valid. Please pass a valid API key."));
    }
    if body["returnSecureToken"] != json!(true) {
        return Err(auth_error("MISSING_RETURN_SECURE_TOKEN"));
    }
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    Ok((email, password))
}

async fn sign_up(
    State(identity): State<FakeIdentity>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let (email, password) = match read_body(&query, &body) {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    let mut accounts = identity.accounts.lock().unwrap();
    if accounts.contains_key(&email) {
        return auth_error("EMAIL_EXISTS");
    }
    accounts.insert(email.clone(), password);
    grant(&email)
}

async fn sign_in(
    State(identity): State<FakeIdentity>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let (email, password) = match read_body(&query, &body) {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    match identity.accounts.lock().unwrap().get(&email) {
        None => auth_error("EMAIL_NOT_FOUND"),
        Some(stored) if *stored != password => auth_error("INVALID_PASSWORD"),
        Some(_) => grant(&email),
    }
}
