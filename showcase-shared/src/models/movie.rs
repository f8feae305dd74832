use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEntry {
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub creator: String,
    /// Likes keyed by the store's push key.
    #[serde(default)]
    pub likes: BTreeMap<String, LikeEntry>,
}

impl Movie {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn liked_by(&self, email: &str) -> bool {
        self.likes.values().any(|like| like.user == email)
    }
}
