use crate::field::{FieldId, FieldType};

/// First rule an intake form submission breaks.
///
/// The `Display` output is the banner text shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Owner name is required")]
    MissingOwnerName,
    #[error("Owner phone is required")]
    MissingOwnerPhone,
    #[error("{label} is required")]
    MissingField { field_id: FieldId, label: String },
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("field {field_id} is a {field_type} field and has no options to pick from")]
    NotSelectable {
        field_id: FieldId,
        field_type: FieldType,
    },
    #[error("field {field_id} is a {field_type} field and cannot take typed text")]
    NotFreeText {
        field_id: FieldId,
        field_type: FieldType,
    },
    #[error("field {field_id} is a {field_type} field, not a date or time")]
    NotDateTime {
        field_id: FieldId,
        field_type: FieldType,
    },
    #[error("field {field_id} does not offer option {option:?}")]
    UnknownOption { field_id: FieldId, option: String },
    #[error("no selector is open")]
    SelectorClosed,
    #[error("unknown field {0}")]
    UnknownField(FieldId),
    #[error("invalid {mode} value {input:?}")]
    InvalidDateTime { mode: &'static str, input: String },
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
