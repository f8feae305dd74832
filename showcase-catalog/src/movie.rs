use serde::Serialize;
use serde_json::{json, Value};
use showcase_core::{DuplicateEngagement, EngagementPolicy, Fields, FormData, Session, ValidationError, ValidationReport};
use showcase_shared::Movie;

use crate::item::{CatalogItem, OwnerKey};

/// Sub-collection holding one `{ "user": email }` entry per like.
pub const LIKES_FIELD: &str = "likes";

const FIELDS: [&str; 3] = ["title", "description", "imageUrl"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFlags {
    pub is_creator: bool,
    pub has_liked: bool,
    pub likes_count: usize,
}

impl CatalogItem for Movie {
    const COLLECTION: &'static str = "movies";
    const OWNER_FIELD: &'static str = "creator";
    const OWNER_KEY: OwnerKey = OwnerKey::Email;

    type Flags = MovieFlags;

    fn owner(&self) -> &str {
        &self.creator
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn validate_form(form: &FormData) -> Result<Fields, ValidationError> {
        let mut report = ValidationReport::new();
        report.require(form, &FIELDS);
        report.into_result()?;

        Ok(FIELDS
            .iter()
            .map(|name| (name.to_string(), Value::String(form.value(name).unwrap_or_default().to_string())))
            .collect())
    }

    fn flags(&self, viewer: Option<&Session>) -> MovieFlags {
        MovieFlags {
            is_creator: viewer.is_some_and(|s| self.is_owned_by(s)),
            has_liked: viewer.is_some_and(|s| self.liked_by(&s.email)),
            likes_count: self.likes_count(),
        }
    }
}

/// The entry to append for a like by `session`, if `policy` admits it.
pub fn like_entry(movie: &Movie, session: &Session, policy: EngagementPolicy) -> Result<Value, DuplicateEngagement> {
    policy.admit(&session.email, movie.likes.values().map(|like| like.user.as_str()))?;
    Ok(json!({ "user": session.email }))
}
