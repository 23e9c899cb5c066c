use std::str::FromStr;

use serde_json::Value;

use crate::error::ParseValueError;

// How an optional source attribute that is absent shows up in additionalInfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingValuePolicy {
    // Key kept, value null
    Null,
    // Key left out
    Omit,
    // Key kept, value replaced by the given text
    Sentinel(String),
}

impl MissingValuePolicy {
    // None means the key must not be written at all
    pub fn render(&self, value: Option<&str>) -> Option<Value> {
        match (value, self) {
            (Some(v), _) => Some(Value::String(v.to_string())),
            (None, MissingValuePolicy::Null) => Some(Value::Null),
            (None, MissingValuePolicy::Omit) => None,
            (None, MissingValuePolicy::Sentinel(text)) => Some(Value::String(text.clone())),
        }
    }
}

impl Default for MissingValuePolicy {
    fn default() -> Self {
        MissingValuePolicy::Null
    }
}

impl FromStr for MissingValuePolicy {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "null" => Ok(MissingValuePolicy::Null),
            "omit" => Ok(MissingValuePolicy::Omit),
            "na" => Ok(MissingValuePolicy::Sentinel(crate::model::NOT_AVAILABLE.to_string())),
            _ => Err(ParseValueError::UnknownPolicy(s.to_string())),
        }
    }
}

// Extraction configuration options
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    pub missing_values: MissingValuePolicy,
    // Fail when two seats of one flight share an id
    pub validate_unique_seat_ids: bool,
}
