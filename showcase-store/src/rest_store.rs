use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use showcase_core::{Document, DocumentStore, Fields, StoreError};
use tracing::{debug, warn};

/// Document store speaking the Realtime Database REST dialect:
/// `{base}/{collection}.json` for the collection and `{base}/{collection}/{id}.json` per record.
#[derive(Clone)]
pub struct RestDocumentStore {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl RestDocumentStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Transport(format!("Invalid store URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Transport(format!("Store URL {} cannot hold paths", base_url)));
        }

        Ok(Self { client, base_url })
    }

    /// `{base}/{part}/.../{last}.json`, each part percent-encoded as one segment.
    fn url(&self, parts: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        let Some((last, rest)) = parts.split_last() else {
            return Ok(url);
        };

        url.path_segments_mut()
            .map_err(|_| StoreError::Transport(format!("Store URL {} cannot hold paths", self.base_url)))?
            .pop_if_empty()
            .extend(rest)
            .push(&format!("{}.json", last));
        Ok(url)
    }

    /// Send one request and decode its JSON body. Non-success statuses become
    /// `StoreError::Rejected` carrying the service's own message.
    async fn request(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value, StoreError> {
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        decode(response).await
    }
}

async fn decode(response: Response) -> Result<Value, StoreError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("Document store answered {}", status));
        warn!("Document store rejected request: {}", message);
        return Err(StoreError::Rejected(message));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| StoreError::Rejected(format!("Unreadable store response: {}", e)))
}

fn not_found(collection: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

/// Push keys only use `[-_A-Za-z0-9]`; any other id cannot name a record.
fn record_key<'a>(collection: &str, id: &'a str) -> Result<&'a str, StoreError> {
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        warn!("Refusing malformed record id {:?} in {}", id, collection);
        Err(not_found(collection, id))
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let body = self.request(Method::GET, self.url(&[collection])?, None).await?;

        let documents = match body {
            Value::Null => Vec::new(),
            Value::Object(map) => map
                .into_iter()
                .filter_map(|(id, value)| match value {
                    Value::Object(fields) => Some(Document::new(id, fields)),
                    _ => {
                        warn!("Skipping non-object entry {} in {}", id, collection);
                        None
                    }
                })
                .collect(),
            other => {
                return Err(StoreError::Rejected(format!(
                    "Expected an object for {}, got {}",
                    collection, other
                )))
            }
        };

        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let key = record_key(collection, id)?;
        match self.request(Method::GET, self.url(&[collection, key])?, None).await? {
            Value::Object(fields) => Ok(Document::new(id, fields)),
            Value::Null => Err(not_found(collection, id)),
            other => Err(StoreError::Malformed {
                id: id.to_string(),
                reason: format!("expected an object, got {}", other),
            }),
        }
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let body = self
            .request(Method::POST, self.url(&[collection])?, Some(Value::Object(fields)))
            .await?;
        let pushed: PushResponse = serde_json::from_value(body)
            .map_err(|e| StoreError::Rejected(format!("Unexpected add response: {}", e)))?;
        Ok(pushed.name)
    }

    async fn replace(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let key = record_key(collection, id)?;
        self.request(Method::PUT, self.url(&[collection, key])?, Some(Value::Object(fields)))
            .await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        // The service treats deletes of missing paths as success; check first so
        // a second delete is reported.
        let key = record_key(collection, id)?;
        let url = self.url(&[collection, key])?;
        let mut shallow = url.clone();
        shallow.query_pairs_mut().append_pair("shallow", "true");
        if self.request(Method::GET, shallow, None).await?.is_null() {
            return Err(not_found(collection, id));
        }

        self.request(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn append(&self, collection: &str, id: &str, field: &str, entry: Value) -> Result<String, StoreError> {
        let body = self
            .request(Method::POST, self.url(&[collection, record_key(collection, id)?, field])?, Some(entry))
            .await?;
        let pushed: PushResponse = serde_json::from_value(body)
            .map_err(|e| StoreError::Rejected(format!("Unexpected append response: {}", e)))?;
        Ok(pushed.name)
    }
}
