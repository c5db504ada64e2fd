//! In-memory answers for the form currently on screen.

use crate::field::{FieldDefinition, FieldId};
use crate::value::FieldValue;
use std::collections::BTreeMap;

/// Mapping from field id to the user's current answer.
///
/// Lives as long as the screen that owns it and is never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueStore {
    values: BTreeMap<FieldId, FieldValue>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the type default for every field that has no value yet.
    ///
    /// Existing values are never overwritten, so a schema refetch keeps in-progress answers for
    /// fields that still exist.
    pub fn init_defaults(&mut self, fields: &[FieldDefinition]) {
        for field in fields {
            self.values
                .entry(field.id)
                .or_insert_with(|| FieldValue::default_for(field.field_type));
        }
    }

    /// Overwrite the value for `field_id`.
    pub fn set(&mut self, field_id: FieldId, value: FieldValue) {
        self.values.insert(field_id, value);
    }

    /// Force every field back to its type default.
    pub fn reset_all(&mut self, fields: &[FieldDefinition]) {
        for field in fields {
            self.values
                .insert(field.id, FieldValue::default_for(field.field_type));
        }
        tracing::debug!(fields = fields.len(), "value store reset");
    }

    pub fn get(&self, field_id: FieldId) -> Option<&FieldValue> {
        self.values.get(&field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use proptest::prelude::*;

    fn schema() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new(1, "Symptom", FieldType::Text).required(),
            FieldDefinition::new(2, "Vaccines", FieldType::Checkbox).with_options(["A", "B"]),
            FieldDefinition::new(3, "Species", FieldType::Select).with_options(["Dog", "Cat"]),
        ]
    }

    #[test]
    fn init_defaults_seeds_type_defaults() {
        let mut store = ValueStore::new();
        store.init_defaults(&schema());

        assert_eq!(store.get(1), Some(&FieldValue::Text(String::new())));
        assert_eq!(store.get(2), Some(&FieldValue::MultiChoice(vec![])));
        assert_eq!(store.get(3), Some(&FieldValue::Choice(String::new())));
    }

    #[test]
    fn init_defaults_keeps_existing_answers() {
        let mut store = ValueStore::new();
        store.init_defaults(&schema());
        store.set(1, FieldValue::Text("Limping".into()));

        store.init_defaults(&schema());

        assert_eq!(store.get(1), Some(&FieldValue::Text("Limping".into())));
    }

    #[test]
    fn reset_all_discards_answers() {
        let mut store = ValueStore::new();
        store.init_defaults(&schema());
        store.set(1, FieldValue::Text("Limping".into()));
        store.set(2, FieldValue::MultiChoice(vec!["A".into()]));

        store.reset_all(&schema());

        assert_eq!(store.get(1), Some(&FieldValue::Text(String::new())));
        assert_eq!(store.get(2), Some(&FieldValue::MultiChoice(vec![])));
    }

    fn arb_field_type() -> impl Strategy<Value = FieldType> {
        prop_oneof![
            Just(FieldType::Text),
            Just(FieldType::Textarea),
            Just(FieldType::Select),
            Just(FieldType::Checkbox),
            Just(FieldType::Radio),
            Just(FieldType::Date),
            Just(FieldType::Time),
            Just(FieldType::Number),
        ]
    }

    proptest! {
        #[test]
        fn defaulting_is_idempotent(types in proptest::collection::vec(arb_field_type(), 0..12)) {
            let fields: Vec<FieldDefinition> = types
                .into_iter()
                .enumerate()
                .map(|(i, t)| FieldDefinition::new(i as FieldId, format!("f{i}"), t))
                .collect();

            let mut seeded = ValueStore::new();
            seeded.init_defaults(&fields);
            seeded.reset_all(&fields);

            let mut defaults_only = ValueStore::new();
            defaults_only.init_defaults(&fields);
            let mut reset_once = defaults_only.clone();
            reset_once.reset_all(&fields);

            prop_assert_eq!(&seeded, &reset_once);
            prop_assert_eq!(&reset_once, &defaults_only);
        }
    }
}
