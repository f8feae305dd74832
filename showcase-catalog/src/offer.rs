use serde::Serialize;
use serde_json::{json, Value};
use showcase_core::validation::positive_number;
use showcase_core::{DuplicateEngagement, EngagementPolicy, Fields, FormData, Session, ValidationError, ValidationReport};
use showcase_shared::ShoeOffer;

use crate::item::{CatalogItem, OwnerKey};

pub const PRICE_NOT_POSITIVE: &str = "Price must be a positive number!";
pub const PRICE_NOT_NUMBER: &str = "Price must be a number!";

/// List of buyer uids, one per purchase.
pub const BUYERS_FIELD: &str = "buyers";

const REQUIRED: [&str; 5] = ["productName", "price", "imageUrl", "description", "brand"];
const TEXT_FIELDS: [&str; 4] = ["productName", "imageUrl", "description", "brand"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferFlags {
    pub is_salesman: bool,
    pub has_bought: bool,
    pub buyers_count: usize,
}

impl CatalogItem for ShoeOffer {
    const COLLECTION: &'static str = "offers";
    const OWNER_FIELD: &'static str = "salesman";
    const OWNER_KEY: OwnerKey = OwnerKey::Uid;

    type Flags = OfferFlags;

    fn owner(&self) -> &str {
        &self.salesman
    }

    fn title(&self) -> &str {
        &self.product_name
    }

    fn validate_form(form: &FormData) -> Result<Fields, ValidationError> {
        let mut report = ValidationReport::new();
        report.require(form, &REQUIRED);
        let price = form
            .value("price")
            .and_then(|raw| positive_number(&mut report, "price", raw, PRICE_NOT_NUMBER, PRICE_NOT_POSITIVE));
        report.into_result()?;

        let mut fields: Fields = TEXT_FIELDS
            .iter()
            .map(|name| (name.to_string(), Value::String(form.value(name).unwrap_or_default().to_string())))
            .collect();
        fields.insert("price".to_string(), json!(price.unwrap_or_default()));
        Ok(fields)
    }

    fn initial_fields() -> Fields {
        let mut fields = Fields::new();
        fields.insert(BUYERS_FIELD.to_string(), json!([]));
        fields
    }

    fn flags(&self, viewer: Option<&Session>) -> OfferFlags {
        OfferFlags {
            is_salesman: viewer.is_some_and(|s| self.is_owned_by(s)),
            has_bought: viewer.is_some_and(|s| self.bought_by(&s.uid)),
            buyers_count: self.buyers.len(),
        }
    }
}

/// Record a purchase by `session` in the stored fields of `offer`.
pub fn with_buyer(
    mut stored: Fields,
    offer: &ShoeOffer,
    session: &Session,
    policy: EngagementPolicy,
) -> Result<Fields, DuplicateEngagement> {
    policy.admit(&session.uid, offer.buyers.iter().map(String::as_str))?;

    let mut buyers = offer.buyers.clone();
    buyers.push(session.uid.clone());
    stored.insert(BUYERS_FIELD.to_string(), json!(buyers));
    Ok(stored)
}
