//! Clinic-defined intake form fields.
//!
//! Responsibilities:
//! - Define the domain-level [`FieldDefinition`] every other engine component reads from
//! - Decode the backend's loosely typed field objects through a private wire model
//!
//! The backend is lenient about shapes, so decoding is too:
//! - `type` is an arbitrary string; unknown tags are treated as [`FieldType::Text`]
//! - `options` may be missing or `null`
//! - `required` may be missing, a boolean, or a `0`/`1` integer
//! - the list itself may be a bare array or wrapped under a `data` key

use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a form field. Unique within one schema fetch.
pub type FieldId = i64;

/// Closed set of field kinds the form engine knows how to render and store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Date,
    Time,
    Number,
}

impl FieldType {
    /// Wire tag used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Number => "number",
        }
    }

    fn from_wire(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(FieldType::Text),
            "textarea" => Some(FieldType::Textarea),
            "select" => Some(FieldType::Select),
            "checkbox" => Some(FieldType::Checkbox),
            "radio" => Some(FieldType::Radio),
            "date" => Some(FieldType::Date),
            "time" => Some(FieldType::Time),
            "number" => Some(FieldType::Number),
            _ => None,
        }
    }

    /// Whether the field is answered by picking from `options`.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }

    /// Whether more than one option may be selected.
    pub fn is_multiple(self) -> bool {
        self == FieldType::Checkbox
    }

    /// Whether the field is answered by typing (text, textarea, number).
    pub fn is_free_text(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea | FieldType::Number)
    }

    /// Whether the field is answered through the date/time picker.
    pub fn is_date_time(self) -> bool {
        matches!(self, FieldType::Date | FieldType::Time)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a clinic's intake form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Choices for select/checkbox/radio fields. Empty for every other type.
    pub options: Vec<String>,
    pub required: bool,
}

impl FieldDefinition {
    pub fn new(id: FieldId, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id,
            label: label.into(),
            field_type,
            options: Vec::new(),
            required: false,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

// ============================================================================
// Wire model
// ============================================================================

#[derive(Deserialize)]
struct FieldDefinitionWire {
    id: FieldId,
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "type", default)]
    field_type: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    required: Option<RequiredFlag>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequiredFlag {
    Bool(bool),
    Int(i64),
    Str(String),
    Other(serde::de::IgnoredAny),
}

impl RequiredFlag {
    /// `true`, non-zero integers, and the strings `"1"` / `"true"` mark a field as required.
    fn is_set(&self, field_id: FieldId) -> bool {
        match self {
            RequiredFlag::Bool(b) => *b,
            RequiredFlag::Int(n) => *n != 0,
            RequiredFlag::Str(s) => {
                let s = s.trim();
                s == "1" || s.eq_ignore_ascii_case("true")
            }
            RequiredFlag::Other(_) => {
                tracing::warn!(field_id, "unrecognised required flag, treating as optional");
                false
            }
        }
    }
}

impl FieldDefinitionWire {
    fn into_domain(self) -> FieldDefinition {
        let tag = self.field_type.unwrap_or_default();
        let field_type = FieldType::from_wire(&tag).unwrap_or_else(|| {
            tracing::warn!(field_id = self.id, tag = %tag, "unknown field type, treating as text");
            FieldType::Text
        });

        let options = if field_type.is_choice() {
            self.options.unwrap_or_default()
        } else {
            Vec::new()
        };

        if field_type.is_choice() && options.is_empty() {
            tracing::warn!(field_id = self.id, "choice field has no options");
        }

        FieldDefinition {
            id: self.id,
            label: self.label.unwrap_or_default(),
            field_type,
            options,
            required: self.required.as_ref().is_some_and(|r| r.is_set(self.id)),
        }
    }
}

impl<'de> Deserialize<'de> for FieldDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        FieldDefinitionWire::deserialize(deserializer).map(FieldDefinitionWire::into_domain)
    }
}

/// Extract the field list from a schema response body.
///
/// Accepts a bare array or an object whose non-null `data` member holds the array. Any other
/// shape yields an empty list. Entries that cannot be decoded are skipped with a warning so one
/// malformed field does not hide the rest of the form.
pub fn fields_from_response(body: serde_json::Value) -> Vec<FieldDefinition> {
    let list = match body {
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Null) | None => serde_json::Value::Object(map),
            Some(data) => data,
        },
        other => other,
    };

    let serde_json::Value::Array(items) = list else {
        tracing::warn!("schema response is not a list, assuming no fields");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<FieldDefinition>(item) {
            Ok(field) => Some(field),
            Err(e) => {
                tracing::warn!("skipping malformed field definition: {}", e);
                None
            }
        })
        .collect()
}
