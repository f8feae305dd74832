use serde::Serialize;
use serde_json::Value;
use showcase_core::validation::positive_number;
use showcase_core::{Fields, FormData, Session, ValidationError, ValidationReport};
use showcase_shared::Destination;

use crate::item::{CatalogItem, OwnerKey};

pub const DURATION_NOT_POSITIVE: &str = "Duration cannot be a negative number!";
pub const DURATION_NOT_NUMBER: &str = "Duration must be a number!";
pub const DURATION_NOT_WHOLE: &str = "Duration must be a whole number of days!";

const REQUIRED: [&str; 5] = ["destination", "city", "duration", "departureDate", "imgUrl"];
const TEXT_FIELDS: [&str; 4] = ["destination", "city", "departureDate", "imgUrl"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationFlags {
    pub is_creator: bool,
}

impl CatalogItem for Destination {
    const COLLECTION: &'static str = "destinations";
    const OWNER_FIELD: &'static str = "creator";
    const OWNER_KEY: OwnerKey = OwnerKey::Email;

    type Flags = DestinationFlags;

    fn owner(&self) -> &str {
        &self.creator
    }

    fn title(&self) -> &str {
        &self.destination
    }

    fn validate_form(form: &FormData) -> Result<Fields, ValidationError> {
        let mut report = ValidationReport::new();
        report.require(form, &REQUIRED);

        let duration = form.value("duration").and_then(|raw| {
            positive_number(&mut report, "duration", raw, DURATION_NOT_NUMBER, DURATION_NOT_POSITIVE)
        });
        if duration.is_some_and(|days| days.fract() != 0.0 || days > u32::MAX as f64) {
            report.push("duration", DURATION_NOT_WHOLE);
        }
        report.into_result()?;

        let mut fields = Fields::new();
        for name in TEXT_FIELDS {
            fields.insert(name.to_string(), Value::String(form.value(name).unwrap_or_default().to_string()));
        }
        fields.insert("duration".to_string(), Value::from(duration.unwrap_or_default() as u32));
        Ok(fields)
    }

    fn flags(&self, viewer: Option<&Session>) -> DestinationFlags {
        DestinationFlags {
            is_creator: viewer.is_some_and(|s| self.is_owned_by(s)),
        }
    }
}
