//! Presentation helpers for rendering a field and its current answer.
//!
//! Everything here is total: malformed stored values are shown as-is rather than reported.

use crate::constants::{
    DISPLAY_DATE_FORMAT, DISPLAY_TIME_FORMAT, SELECT_DATE_PROMPT, SELECT_PROMPT,
    SELECT_TIME_PROMPT,
};
use crate::datetime::{parse_date, parse_time};
use crate::field::{FieldDefinition, FieldType};
use crate::value::FieldValue;

/// Field label, with ` *` appended for required fields.
pub fn caption(field: &FieldDefinition) -> String {
    if field.required {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    }
}

/// Input placeholder for free-text fields.
pub fn placeholder(field: &FieldDefinition) -> String {
    format!("Enter {}", field.label.to_lowercase())
}

/// Text shown in the field's input or selector button.
pub fn display_value(field: &FieldDefinition, value: Option<&FieldValue>) -> String {
    match (field.field_type, value) {
        (_, Some(FieldValue::MultiChoice(items))) if items.is_empty() => SELECT_PROMPT.to_owned(),
        (_, Some(FieldValue::MultiChoice(items))) => format!("{} selected", items.len()),
        (FieldType::Select | FieldType::Radio | FieldType::Checkbox, v) => {
            non_empty(v).unwrap_or(SELECT_PROMPT).to_owned()
        }
        (FieldType::Date, v) => match non_empty(v) {
            Some(raw) => display_date(raw),
            None => SELECT_DATE_PROMPT.to_owned(),
        },
        (FieldType::Time, v) => match non_empty(v) {
            Some(raw) => display_time(raw),
            None => SELECT_TIME_PROMPT.to_owned(),
        },
        (_, v) => non_empty(v).unwrap_or_default().to_owned(),
    }
}

/// `2025-09-10` → `September 10, 2025`; anything unparsable is returned unchanged.
pub fn display_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_owned())
}

/// `14:05` → `2:05 PM`; anything unparsable is returned unchanged.
pub fn display_time(raw: &str) -> String {
    parse_time(raw)
        .map(|t| t.format(DISPLAY_TIME_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_owned())
}

fn non_empty(value: Option<&FieldValue>) -> Option<&str> {
    value.and_then(FieldValue::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_marks_required_fields() {
        let required = FieldDefinition::new(1, "Symptom", FieldType::Text).required();
        let optional = FieldDefinition::new(2, "Notes", FieldType::Textarea);
        assert_eq!(caption(&required), "Symptom *");
        assert_eq!(caption(&optional), "Notes");
        assert_eq!(placeholder(&required), "Enter symptom");
    }

    #[test]
    fn checkbox_shows_selection_count() {
        let field = FieldDefinition::new(1, "Services", FieldType::Checkbox);
        let none = FieldValue::MultiChoice(vec![]);
        let two = FieldValue::MultiChoice(vec!["A".into(), "C".into()]);

        assert_eq!(display_value(&field, Some(&none)), "Select");
        assert_eq!(display_value(&field, Some(&two)), "2 selected");
        assert_eq!(display_value(&field, None), "Select");
    }

    #[test]
    fn single_choice_shows_option() {
        let field = FieldDefinition::new(1, "Size", FieldType::Radio);
        let chosen = FieldValue::Choice("Large".into());
        assert_eq!(display_value(&field, Some(&chosen)), "Large");
        assert_eq!(
            display_value(&field, Some(&FieldValue::Choice(String::new()))),
            "Select"
        );
    }

    #[test]
    fn dates_and_times_are_humanised() {
        let date = FieldDefinition::new(1, "Date", FieldType::Date);
        let time = FieldDefinition::new(2, "Time", FieldType::Time);

        assert_eq!(
            display_value(&date, Some(&FieldValue::Text("2025-09-10".into()))),
            "September 10, 2025"
        );
        assert_eq!(
            display_value(&time, Some(&FieldValue::Text("14:05".into()))),
            "2:05 PM"
        );
        assert_eq!(
            display_value(&time, Some(&FieldValue::Text("00:30".into()))),
            "12:30 AM"
        );
        assert_eq!(display_value(&date, None), "Select date");
        assert_eq!(
            display_value(&time, Some(&FieldValue::Text(String::new()))),
            "Select time"
        );
    }

    #[test]
    fn malformed_dates_fall_back_to_raw() {
        assert_eq!(display_date("2025-13-01"), "2025-13-01");
        assert_eq!(display_date("soon"), "soon");
        assert_eq!(display_time("25:99"), "25:99");
    }

    #[test]
    fn text_is_shown_verbatim() {
        let field = FieldDefinition::new(1, "Weight", FieldType::Number);
        assert_eq!(
            display_value(&field, Some(&FieldValue::Text("4.5".into()))),
            "4.5"
        );
        assert_eq!(display_value(&field, None), "");
    }
}
