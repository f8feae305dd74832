//! Lenient readers for numeric fields.
//!
//! Older clients submitted form values straight into the store, so numbers
//! may arrive either as JSON numbers or as numeric strings.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Raw {
    fn as_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            Raw::Int(n) => Ok(n as f64),
            Raw::Float(n) => Ok(n),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got {:?}", s))),
        }
    }
}

pub fn u32_lenient<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Raw::deserialize(deserializer)?.as_f64()?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(de::Error::custom(format!("expected a whole non-negative number, got {}", value)));
    }
    Ok(value as u32)
}

pub fn f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Raw::deserialize(deserializer)?.as_f64()
}
