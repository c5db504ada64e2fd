//! Pre-submission checks for an intake form.
//!
//! Validation is fail-fast: the owner name, then the owner phone, then every required field in
//! schema order. Only the first problem is reported.

use crate::error::ValidationError;
use crate::field::FieldDefinition;
use crate::store::ValueStore;
use crate::value::FieldValue;

/// Check that the form is ready to submit.
///
/// Owner fields must be non-blank after trimming. A required field fails when it has no value,
/// an empty string, or an empty selection. Field values are not trimmed.
pub fn validate(
    owner_name: &str,
    owner_phone: &str,
    fields: &[FieldDefinition],
    store: &ValueStore,
) -> Result<(), ValidationError> {
    if owner_name.trim().is_empty() {
        return Err(ValidationError::MissingOwnerName);
    }
    if owner_phone.trim().is_empty() {
        return Err(ValidationError::MissingOwnerPhone);
    }

    let missing = fields
        .iter()
        .filter(|f| f.required)
        .find(|f| store.get(f.id).map_or(true, FieldValue::is_empty));

    match missing {
        Some(field) => Err(ValidationError::MissingField {
            field_id: field.id,
            label: field.label.clone(),
        }),
        None => Ok(()),
    }
}
