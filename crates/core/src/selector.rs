//! Option picker for select, radio and checkbox fields.
//!
//! The picker edits a working copy of the selection. Nothing reaches the [`ValueStore`] until
//! [`OptionSelector::confirm`]; cancelling throws the working copy away.

use crate::error::{IntakeError, IntakeResult};
use crate::field::{FieldDefinition, FieldId};
use crate::store::ValueStore;
use crate::value::FieldValue;

/// Working state while the picker is showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenSelection {
    pub field_id: FieldId,
    pub label: String,
    pub multiple: bool,
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

impl OpenSelection {
    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.iter().any(|s| s == option)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OptionSelector {
    #[default]
    Closed,
    Open(OpenSelection),
}

impl OptionSelector {
    pub fn new() -> Self {
        Self::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self, OptionSelector::Open(_))
    }

    pub fn current(&self) -> Option<&OpenSelection> {
        match self {
            OptionSelector::Open(open) => Some(open),
            OptionSelector::Closed => None,
        }
    }

    /// Show the picker for `field`, seeded from its committed value.
    ///
    /// Opening while another field's picker is showing replaces it without committing.
    pub fn open(&mut self, field: &FieldDefinition, store: &ValueStore) -> IntakeResult<()> {
        if !field.field_type.is_choice() {
            return Err(IntakeError::NotSelectable {
                field_id: field.id,
                field_type: field.field_type,
            });
        }

        let selected = store
            .get(field.id)
            .map(FieldValue::as_selection)
            .unwrap_or_default();

        tracing::debug!(field_id = field.id, ?selected, "option selector opened");

        *self = OptionSelector::Open(OpenSelection {
            field_id: field.id,
            label: field.label.clone(),
            multiple: field.field_type.is_multiple(),
            options: field.options.clone(),
            selected,
        });
        Ok(())
    }

    /// Tap an option.
    ///
    /// Multi-choice pickers toggle membership and keep pick order. Single-choice pickers replace
    /// the selection; tapping the chosen option again keeps it chosen.
    pub fn pick(&mut self, option: &str) -> IntakeResult<()> {
        let OptionSelector::Open(open) = self else {
            return Err(IntakeError::SelectorClosed);
        };

        if !open.options.iter().any(|o| o == option) {
            return Err(IntakeError::UnknownOption {
                field_id: open.field_id,
                option: option.to_owned(),
            });
        }

        if open.multiple {
            if let Some(pos) = open.selected.iter().position(|s| s == option) {
                open.selected.remove(pos);
            } else {
                open.selected.push(option.to_owned());
            }
        } else {
            open.selected = vec![option.to_owned()];
        }
        Ok(())
    }

    /// Commit the working selection ("Done") and close. Returns the committed field.
    pub fn confirm(&mut self, store: &mut ValueStore) -> IntakeResult<FieldId> {
        let OptionSelector::Open(open) = std::mem::take(self) else {
            return Err(IntakeError::SelectorClosed);
        };

        let value = if open.multiple {
            FieldValue::MultiChoice(open.selected)
        } else {
            FieldValue::Choice(open.selected.into_iter().next().unwrap_or_default())
        };

        tracing::debug!(field_id = open.field_id, ?value, "option selection committed");
        store.set(open.field_id, value);
        Ok(open.field_id)
    }

    /// Close without committing (close button, back gesture, backdrop tap).
    pub fn cancel(&mut self) {
        if let OptionSelector::Open(open) = std::mem::take(self) {
            tracing::debug!(field_id = open.field_id, "option selection discarded");
        }
    }
}
