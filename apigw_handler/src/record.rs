use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use aws_sdk_dynamodb::model::AttributeValue;
use serde::de::IgnoredAny;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::ValidationError;

pub const DEFAULT_YEAR: &str = "2012";
pub const DEFAULT_TITLE: &str = "The Amazing Spider-Man 2";

type Fields = HashMap<String, Box<RawValue>>;

/// Numeric text stored as a DynamoDB `N` attribute. The digits are kept
/// exactly as sent, so floats and integers wider than 64 bits survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Year(String);

impl Year {
    pub fn parse(raw: &RawValue) -> Result<Year, ValidationError> {
        let text = raw.get().trim();
        match serde_json::from_str::<Value>(text)? {
            Value::Number(_) => Ok(Year(text.to_string())),
            Value::String(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(Year(trimmed.to_string())),
                    _ => Err(ValidationError::InvalidYear(text.to_string())),
                }
            }
            _ => Err(ValidationError::InvalidYear(text.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub year: Year,
    pub title: String,
}

impl Record {
    /// Parses a request body of the form `{"year": .., "title": .., "id": ..}`.
    ///
    /// `title` and `id` must be JSON strings. Other types are rejected with
    /// `InvalidField` rather than stringified, so `"id": 42` is an error and
    /// not the key `"42"`.
    pub fn from_payload(body: &[u8]) -> Result<Record, ValidationError> {
        let fields: Fields = match serde_json::from_slice(body) {
            Ok(fields) => fields,
            Err(e) => return Err(match serde_json::from_slice::<IgnoredAny>(body) {
                Ok(_) => ValidationError::NotAnObject,
                Err(_) => ValidationError::InvalidJson(e),
            }),
        };
        let year = Year::parse(required(&fields, "year")?)?;
        let title = required_string(&fields, "title")?;
        let id = required_string(&fields, "id")?;
        Ok(Record { id, year, title })
    }

    pub fn default_with_id(id: String) -> Record {
        Record {
            id,
            year: Year(DEFAULT_YEAR.to_string()),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn generate_default() -> Record {
        Self::default_with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (String::from("id"), AttributeValue::S(self.id.to_owned())),
            (String::from("year"), AttributeValue::N(self.year.as_str().to_owned())),
            (String::from("title"), AttributeValue::S(self.title.to_owned())),
        ])
    }
}

fn required<'a>(fields: &'a Fields, name: &'static str) -> Result<&'a RawValue, ValidationError> {
    match fields.get(name) {
        Some(raw) if raw.get().trim() != "null" => Ok(&**raw),
        _ => Err(ValidationError::MissingField(name)),
    }
}

fn required_string(fields: &Fields, name: &'static str) -> Result<String, ValidationError> {
    serde_json::from_str::<String>(required(fields, name)?.get())
        .map_err(|_| ValidationError::InvalidField(name))
}
