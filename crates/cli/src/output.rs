//! Plain-text rendering for CLI output.

use pawclinic_client::{ClinicSummary, SelectedClinic};
use pawclinic_core::display::{caption, display_value, placeholder};
use pawclinic_core::{FieldDefinition, FieldValue};

/// Lines describing one form field the way the booking screen would show it.
pub fn describe_field(field: &FieldDefinition, value: Option<&FieldValue>) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] {} ({})",
        field.id,
        caption(field),
        field.field_type
    )];

    if !field.options.is_empty() {
        lines.push(format!("    options: {}", field.options.join(", ")));
    }

    let shown = if field.field_type.is_choice() || field.field_type.is_date_time() {
        display_value(field, value)
    } else {
        let current = display_value(field, value);
        if current.is_empty() {
            placeholder(field)
        } else {
            current
        }
    };
    lines.push(format!("    {shown}"));
    lines
}

pub fn describe_clinic(clinic: &ClinicSummary, selected: Option<&SelectedClinic>) -> String {
    let marker = if selected.is_some_and(|s| s.id == clinic.id) {
        "*"
    } else {
        " "
    };
    let status = if clinic.is_open { "open" } else { "closed" };
    format!("{marker} {:>4}  {}  ({status})", clinic.id, clinic.clinic_name)
}
