//! Configuration payload handed from the server render to the date-picker.
//!
//! Wire shape: `{ "min_date": <epoch seconds>, "max_date": <epoch seconds | "">,
//! "error_class": "<css class>" }`. An empty `max_date` means unbounded.
//! Decoding is lenient the way the browser script is: `""`, `0`, and anything
//! non-numeric all collapse to "unbounded", once, here.

use chrono::NaiveDate;
use chrono_tz::Tz;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::timezone;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScriptVars {
    #[serde(deserialize_with = "deserialize_timestamp")]
    #[schemars(with = "TimestampRepr")]
    pub min_date: i64,
    #[serde(
        default,
        serialize_with = "serialize_max_date",
        deserialize_with = "deserialize_max_date"
    )]
    #[schemars(with = "TimestampRepr")]
    pub max_date: Option<i64>,
    pub error_class: String,
}

/// Schema-only view of a timestamp that may arrive as a number or a string.
#[allow(dead_code)]
#[derive(JsonSchema)]
#[serde(untagged)]
enum TimestampRepr {
    Seconds(i64),
    Text(String),
}

impl ScriptVars {
    pub fn to_json(&self) -> Result<String, crate::WindowError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, crate::WindowError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(ScriptVars)).unwrap_or_default()
    }
}

fn serialize_max_date<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_i64(*ts),
        None => serializer.serialize_str(""),
    }
}

fn coerce_timestamp(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    coerce_timestamp(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a timestamp, got {value}")))
}

fn deserialize_max_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_timestamp)
        .filter(|ts| *ts != 0))
}

/// The window as the browser widget sees it: plain calendar dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientWindow {
    pub min_date: NaiveDate,
    pub max_date: Option<NaiveDate>,
}

impl ClientWindow {
    /// Decode the payload's timestamps into dates in the viewer's zone.
    ///
    /// A maximum before the minimum is dropped, leaving the window unbounded.
    pub fn from_vars(vars: &ScriptVars, viewer_tz: Tz) -> Option<Self> {
        let min_date = timezone::date_from_timestamp(vars.min_date, viewer_tz)?;
        let max_date = vars
            .max_date
            .filter(|max| *max >= vars.min_date)
            .and_then(|max| timezone::date_from_timestamp(max, viewer_tz));
        Some(Self { min_date, max_date })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min_date && self.max_date.is_none_or(|max| date <= max)
    }
}
