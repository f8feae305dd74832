use serde::{Deserialize, Serialize};

use super::numeric::u32_lenient;

/// A travel destination listed by a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub destination: String,
    pub city: String,
    /// Trip length in days.
    #[serde(deserialize_with = "u32_lenient")]
    pub duration: u32,
    pub departure_date: String,
    pub img_url: String,
    /// Email of the user who listed it.
    #[serde(default)]
    pub creator: String,
}
