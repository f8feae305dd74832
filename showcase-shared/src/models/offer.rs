use serde::{Deserialize, Serialize};

use super::numeric::f64_lenient;

/// A pair of shoes put up for sale on the shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoeOffer {
    pub product_name: String,
    #[serde(deserialize_with = "f64_lenient")]
    pub price: f64,
    pub image_url: String,
    pub description: String,
    pub brand: String,
    /// User id of the seller.
    #[serde(default)]
    pub salesman: String,
    /// User ids of everyone who bought, in purchase order.
    #[serde(default)]
    pub buyers: Vec<String>,
}

impl ShoeOffer {
    pub fn bought_by(&self, uid: &str) -> bool {
        self.buyers.iter().any(|buyer| buyer == uid)
    }
}
