//! `--answer <field_id>=<value>` handling for `pawclinic book`.
//!
//! Answers go through the same selectors a screen would use, so they are checked against the
//! field's options and date/time formats exactly as interactive input is.

use anyhow::{anyhow, bail, Context};
use pawclinic_client::{BookingSession, IntakeBackend};
use pawclinic_core::{FieldId, FieldType, PickerEvent};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub field_id: FieldId,
    pub value: String,
}

impl FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <field_id>=<value>, got {s:?}"))?;
        let field_id = id
            .trim()
            .parse()
            .map_err(|_| format!("field id must be a number, got {id:?}"))?;
        Ok(Self {
            field_id,
            value: value.to_owned(),
        })
    }
}

/// Apply every answer to the session, grouping repeated ids for checkbox fields.
pub fn apply_answers<B: IntakeBackend>(
    session: &mut BookingSession<B>,
    answers: &[Answer],
) -> anyhow::Result<()> {
    let mut order: Vec<FieldId> = Vec::new();
    for answer in answers {
        if !order.contains(&answer.field_id) {
            order.push(answer.field_id);
        }
    }

    for field_id in order {
        let values: Vec<&str> = answers
            .iter()
            .filter(|a| a.field_id == field_id)
            .map(|a| a.value.as_str())
            .collect();
        apply_field(session, field_id, &values)
            .with_context(|| format!("could not apply answer for field {field_id}"))?;
    }
    Ok(())
}

fn apply_field<B: IntakeBackend>(
    session: &mut BookingSession<B>,
    field_id: FieldId,
    values: &[&str],
) -> anyhow::Result<()> {
    let field_type = session
        .fields()
        .iter()
        .find(|f| f.id == field_id)
        .map(|f| f.field_type)
        .ok_or_else(|| anyhow!("field {field_id} is not on this clinic's form"))?;

    if !field_type.is_multiple() && values.len() > 1 {
        bail!("{field_type} fields take a single answer, got {}", values.len());
    }

    match field_type {
        t if t.is_choice() => choose_options(session, field_id, values),
        FieldType::Date | FieldType::Time => pick_date_time(session, field_id, values[0]),
        _ => Ok(session.set_text(field_id, values[0])?),
    }
}

fn choose_options<B: IntakeBackend>(
    session: &mut BookingSession<B>,
    field_id: FieldId,
    values: &[&str],
) -> anyhow::Result<()> {
    session.open_options(field_id)?;
    for value in values {
        let already = session
            .option_selector()
            .current()
            .is_some_and(|open| open.multiple && open.is_selected(value));
        if already {
            continue;
        }
        if let Err(e) = session.toggle_option(value) {
            session.cancel_options();
            return Err(e.into());
        }
    }
    session.confirm_options()?;
    Ok(())
}

fn pick_date_time<B: IntakeBackend>(
    session: &mut BookingSession<B>,
    field_id: FieldId,
    raw: &str,
) -> anyhow::Result<()> {
    session.open_picker(field_id)?;
    let parsed = match session.date_time_selector().current() {
        Some(open) => open.mode.parse_input(raw, open.working),
        None => bail!("date/time picker did not open for field {field_id}"),
    };
    let value = match parsed {
        Ok(value) => value,
        Err(e) => {
            session.cancel_picker();
            return Err(e.into());
        }
    };

    match session.picker_changed(Some(value))? {
        PickerEvent::Committed(_) => {}
        _ => {
            session.confirm_picker()?;
        }
    }
    Ok(())
}
