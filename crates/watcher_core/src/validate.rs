use serde_json::{Map, Value};

use crate::{StatusCode, TrackedItem};

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const NAME_KEY: &str = "homework_name";
pub const STATUS_KEY: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("API response is not a JSON object")]
    NotAnObject,
    #[error("key \"{0}\" is missing from the API response")]
    MissingField(&'static str),
    #[error("key \"{0}\" in the API response is not a list")]
    NotAList(&'static str),
    #[error("no homework found in the API response")]
    EmptyList,
    #[error("homework entry is not a JSON object")]
    ItemNotAnObject,
    #[error("key \"{0}\" in the API response is not a string")]
    InvalidField(&'static str),
}

/// Checks the shape of a decoded response and extracts the most recent item.
///
/// Only the first element of `homeworks` is considered; the order is whatever
/// the API returned.
pub fn validate(doc: &Value) -> Result<TrackedItem, ValidationError> {
    let root = doc.as_object().ok_or(ValidationError::NotAnObject)?;
    let list = root
        .get(HOMEWORKS_KEY)
        .ok_or(ValidationError::MissingField(HOMEWORKS_KEY))?
        .as_array()
        .ok_or(ValidationError::NotAList(HOMEWORKS_KEY))?;
    let first = list.first().ok_or(ValidationError::EmptyList)?;
    let entry = first.as_object().ok_or(ValidationError::ItemNotAnObject)?;

    let name = string_field(entry, NAME_KEY)?;
    let status = string_field(entry, STATUS_KEY)?;

    Ok(TrackedItem {
        name: name.to_string(),
        status: StatusCode::parse(status),
    })
}

fn string_field<'a>(
    entry: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str, ValidationError> {
    entry
        .get(key)
        .ok_or(ValidationError::MissingField(key))?
        .as_str()
        .ok_or(ValidationError::InvalidField(key))
}
