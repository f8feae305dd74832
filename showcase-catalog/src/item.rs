use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use showcase_core::search::{matches_search, owned_by};
use showcase_core::{Document, Fields, FormData, Session, StoreError, ValidationError};
use tracing::warn;

/// Which part of the session identifies an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKey {
    Email,
    Uid,
}

impl OwnerKey {
    pub fn of<'a>(&self, session: &'a Session) -> &'a str {
        match self {
            OwnerKey::Email => &session.email,
            OwnerKey::Uid => &session.uid,
        }
    }
}

/// A kind of record kept in one store collection.
pub trait CatalogItem: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Field stamped with the owner's identity on creation.
    const OWNER_FIELD: &'static str;
    const OWNER_KEY: OwnerKey;

    /// Per-viewer flags merged into the rendered record.
    type Flags: Serialize;

    fn owner(&self) -> &str;

    /// Text matched by searches.
    fn title(&self) -> &str;

    /// Check a create/edit form in one pass and return the descriptive fields it sets.
    fn validate_form(form: &FormData) -> Result<Fields, ValidationError>;

    /// Extra fields a freshly created record starts with.
    fn initial_fields() -> Fields {
        Fields::new()
    }

    fn flags(&self, viewer: Option<&Session>) -> Self::Flags;

    fn is_owned_by(&self, session: &Session) -> bool {
        self.owner() == Self::OWNER_KEY.of(session)
    }
}

/// A decoded item with the id the store gave it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<T> {
    pub id: String,
    #[serde(flatten)]
    pub item: T,
}

/// A record as one particular viewer sees it.
#[derive(Serialize)]
pub struct Viewed<T: CatalogItem> {
    #[serde(flatten)]
    pub record: Record<T>,
    #[serde(flatten)]
    pub flags: T::Flags,
}

/// Validate `form` and build the full field set for a new record owned by `session`.
pub fn draft_for<T: CatalogItem>(form: &FormData, session: &Session) -> Result<Fields, ValidationError> {
    let mut fields = T::validate_form(form)?;
    for (key, value) in T::initial_fields() {
        fields.entry(key).or_insert(value);
    }
    fields.insert(
        T::OWNER_FIELD.to_string(),
        Value::String(T::OWNER_KEY.of(session).to_string()),
    );
    Ok(fields)
}

pub fn decode<T: CatalogItem>(document: &Document) -> Result<Record<T>, StoreError> {
    Ok(Record {
        id: document.id.clone(),
        item: document.decode()?,
    })
}

/// Decode a whole collection. Records that no longer match the model are skipped.
pub fn decode_all<T: CatalogItem>(documents: &[Document]) -> Vec<Record<T>> {
    documents
        .iter()
        .filter_map(|doc| match decode::<T>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping record in {}: {}", T::COLLECTION, e);
                None
            }
        })
        .collect()
}

pub fn search<T: CatalogItem>(records: Vec<Record<T>>, query: Option<&str>) -> Vec<Record<T>> {
    records
        .into_iter()
        .filter(|r| matches_search(r.item.title(), query))
        .collect()
}

/// The subset of `records` owned by `session`.
pub fn owned<T: CatalogItem>(records: Vec<Record<T>>, session: &Session) -> Vec<Record<T>> {
    owned_by(records, T::OWNER_KEY.of(session), |r| r.item.owner())
}

pub fn view<T: CatalogItem>(record: Record<T>, viewer: Option<&Session>) -> Viewed<T> {
    let flags = record.item.flags(viewer);
    Viewed { record, flags }
}
