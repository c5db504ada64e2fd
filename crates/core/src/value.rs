//! Typed answers held in the value store.

use crate::field::FieldType;
use serde::Serialize;

/// The user's answer to one field.
///
/// Serialises untagged: scalar answers as a JSON string, multi-choice answers as an array of
/// strings, which is the shape the appointment endpoint expects in `responses[].value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text, number, date (`YYYY-MM-DD`) and time (`HH:mm`) answers.
    Text(String),
    /// The single chosen option of a select or radio field, or `""` when nothing is chosen.
    Choice(String),
    /// Selected options of a checkbox field, in the order they were picked.
    MultiChoice(Vec<String>),
}

impl FieldValue {
    /// The value a field of `field_type` holds before the user touches it.
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Checkbox => FieldValue::MultiChoice(Vec::new()),
            FieldType::Select | FieldType::Radio => FieldValue::Choice(String::new()),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// `""` and `[]` count as empty. Whitespace-only text does not.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => s.is_empty(),
            FieldValue::MultiChoice(items) => items.is_empty(),
        }
    }

    /// The scalar string, if this is not a multi-choice value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => Some(s),
            FieldValue::MultiChoice(_) => None,
        }
    }

    /// View the value as a selection list: arrays as-is, a non-empty scalar as a
    /// single-element list, anything else as an empty list.
    pub fn as_selection(&self) -> Vec<String> {
        match self {
            FieldValue::MultiChoice(items) => items.clone(),
            FieldValue::Text(s) | FieldValue::Choice(s) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}
