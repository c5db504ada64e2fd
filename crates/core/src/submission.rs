//! Turning form answers into the appointment request body.

use crate::field::{FieldDefinition, FieldId};
use crate::store::ValueStore;
use crate::value::FieldValue;
use serde::Serialize;

/// Body of `POST /clinics/{id}/appointments`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppointmentRequest {
    pub owner_name: String,
    pub owner_phone: String,
    pub responses: Vec<FieldResponse>,
}

/// One answer in an [`AppointmentRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldResponse {
    pub field_id: FieldId,
    /// `None` only when the field was never seeded; serialised by omitting the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
}

/// Build the request body: trimmed owner identity plus one response per field in schema order.
///
/// Values are copied verbatim from the store. Callers validate first.
pub fn build(
    owner_name: &str,
    owner_phone: &str,
    fields: &[FieldDefinition],
    store: &ValueStore,
) -> AppointmentRequest {
    AppointmentRequest {
        owner_name: owner_name.trim().to_owned(),
        owner_phone: owner_phone.trim().to_owned(),
        responses: fields
            .iter()
            .map(|f| FieldResponse {
                field_id: f.id,
                value: store.get(f.id).cloned(),
            })
            .collect(),
    }
}

/// Apply the backend's verdict on a submission to the store.
///
/// Success clears every answer; failure leaves the answers in place so the user can retry.
pub fn settle<T, E>(store: &mut ValueStore, fields: &[FieldDefinition], outcome: &Result<T, E>) {
    if outcome.is_ok() {
        store.reset_all(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn builds_request_in_schema_order() {
        let fields = vec![
            FieldDefinition::new(1, "Symptom", FieldType::Text).required(),
            FieldDefinition::new(2, "Services", FieldType::Checkbox).with_options(["A", "C"]),
        ];
        let mut store = ValueStore::new();
        store.init_defaults(&fields);
        store.set(1, FieldValue::Text("Limping".into()));
        store.set(2, FieldValue::MultiChoice(vec!["A".into(), "C".into()]));

        assert!(validate("Jane", "0917", &fields, &store).is_ok());
        let request = build("  Jane ", " 0917 ", &fields, &store);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "owner_name": "Jane",
                "owner_phone": "0917",
                "responses": [
                    {"field_id": 1, "value": "Limping"},
                    {"field_id": 2, "value": ["A", "C"]}
                ]
            })
        );
    }

    #[test]
    fn unseeded_field_omits_value() {
        let fields = vec![FieldDefinition::new(3, "Notes", FieldType::Textarea)];
        let request = build("Jane", "0917", &fields, &ValueStore::new());
        assert_eq!(
            serde_json::to_value(&request.responses).unwrap(),
            json!([{"field_id": 3}])
        );
    }

    #[test]
    fn settle_resets_only_on_success() {
        let fields = vec![FieldDefinition::new(1, "Symptom", FieldType::Text)];
        let mut store = ValueStore::new();
        store.set(1, FieldValue::Text("Limping".into()));

        settle::<(), &str>(&mut store, &fields, &Err("Clinic closed"));
        assert_eq!(store.get(1), Some(&FieldValue::Text("Limping".into())));

        settle::<(), &str>(&mut store, &fields, &Ok(()));
        assert_eq!(store.get(1), Some(&FieldValue::Text(String::new())));
    }
}
