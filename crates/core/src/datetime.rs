//! Date and time picker for date/time fields.
//!
//! Stored values are plain strings: dates as `YYYY-MM-DD`, times as 24-hour `HH:mm`.
//!
//! Platforms disagree on how a native picker reports a selection, so the commit policy is an
//! explicit [`CommitMode`]:
//! - [`CommitMode::Immediate`]: the picker closes on selection. A selection commits and closes in
//!   one step; a dismissal (no selection) closes without committing.
//! - [`CommitMode::Deferred`]: the picker stays open while the user scrubs. Selections only move
//!   the working value; [`DateTimeSelector::confirm`] commits it.

use crate::constants::{STORED_DATE_FORMAT, STORED_TIME_FORMAT};
use crate::error::{IntakeError, IntakeResult};
use crate::field::{FieldDefinition, FieldId, FieldType};
use crate::store::ValueStore;
use crate::value::FieldValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// When a picker selection flows into the value store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CommitMode {
    #[default]
    Immediate,
    Deferred,
}

impl std::str::FromStr for CommitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(CommitMode::Immediate),
            "deferred" => Ok(CommitMode::Deferred),
            other => Err(format!(
                "unknown commit mode {other:?} (expected 'immediate' or 'deferred')"
            )),
        }
    }
}

impl std::fmt::Display for CommitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommitMode::Immediate => "immediate",
            CommitMode::Deferred => "deferred",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerMode {
    Date,
    Time,
}

impl PickerMode {
    pub fn for_field(field: &FieldDefinition) -> IntakeResult<Self> {
        match field.field_type {
            FieldType::Date => Ok(PickerMode::Date),
            FieldType::Time => Ok(PickerMode::Time),
            other => Err(IntakeError::NotDateTime {
                field_id: field.id,
                field_type: other,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PickerMode::Date => "date",
            PickerMode::Time => "time",
        }
    }

    /// Format `value` the way it is stored for this mode.
    pub fn format(self, value: NaiveDateTime) -> String {
        match self {
            PickerMode::Date => format_date(value.date()),
            PickerMode::Time => format_time(value.time()),
        }
    }

    /// Parse typed input (`YYYY-MM-DD` or `HH:mm`) into a picker value.
    pub fn parse_input(self, raw: &str, now: NaiveDateTime) -> IntakeResult<NaiveDateTime> {
        self.parse_working(raw.trim(), now)
            .ok_or_else(|| IntakeError::InvalidDateTime {
                mode: self.as_str(),
                input: raw.to_owned(),
            })
    }

    /// Parse a stored string into a full timestamp, borrowing the missing half from `now`.
    fn parse_working(self, stored: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            PickerMode::Date => parse_date(stored).map(|d| d.and_time(NaiveTime::MIN)),
            PickerMode::Time => parse_time(stored).map(|t| now.date().and_time(t)),
        }
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(STORED_DATE_FORMAT).to_string()
}

/// Format a time as 24-hour zero-padded `HH:mm`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(STORED_TIME_FORMAT).to_string()
}

/// Parse a stored `YYYY-MM-DD` string. Anything malformed or out of range yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('-').map(|p| p.trim().parse::<u32>().ok());
    let year = parts.next()??;
    let month = parts.next()??;
    let day = parts.next()??;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Parse a stored `HH:mm` string (seconds, if present, are ignored). Malformed input yields `None`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let mut parts = raw.split(':').map(|p| p.trim().parse::<u32>().ok());
    let hours = parts.next()??;
    let minutes = parts.next()??;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Working state while the picker is showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenPicker {
    pub field_id: FieldId,
    pub mode: PickerMode,
    pub working: NaiveDateTime,
}

/// What a picker change event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    /// The value was written to the store and the picker closed.
    Committed(FieldId),
    /// Only the working value moved; the picker is still open.
    Updated,
    /// The picker closed without committing.
    Dismissed,
    /// Nothing happened.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct DateTimeSelector {
    commit_mode: CommitMode,
    open: Option<OpenPicker>,
}

impl DateTimeSelector {
    pub fn new(commit_mode: CommitMode) -> Self {
        Self {
            commit_mode,
            open: None,
        }
    }

    pub fn commit_mode(&self) -> CommitMode {
        self.commit_mode
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<&OpenPicker> {
        self.open.as_ref()
    }

    /// Show the picker for `field`, starting from its committed value.
    ///
    /// Unset or unparsable values start the picker at `now`.
    pub fn open(
        &mut self,
        field: &FieldDefinition,
        store: &ValueStore,
        now: NaiveDateTime,
    ) -> IntakeResult<()> {
        let mode = PickerMode::for_field(field)?;

        let stored = store.get(field.id).and_then(FieldValue::as_str).unwrap_or("");
        let working = if stored.is_empty() {
            now
        } else {
            mode.parse_working(stored, now).unwrap_or_else(|| {
                tracing::warn!(
                    field_id = field.id,
                    value = stored,
                    "unparsable stored {}, starting picker at now",
                    mode.as_str()
                );
                now
            })
        };

        tracing::debug!(field_id = field.id, %working, "date/time picker opened");
        self.open = Some(OpenPicker {
            field_id: field.id,
            mode,
            working,
        });
        Ok(())
    }

    /// [`open`](Self::open) using the local wall clock for the fallback value.
    pub fn open_now(&mut self, field: &FieldDefinition, store: &ValueStore) -> IntakeResult<()> {
        self.open(field, store, chrono::Local::now().naive_local())
    }

    /// Handle a change event from the native picker. `None` means the user dismissed it.
    pub fn on_change(
        &mut self,
        selection: Option<NaiveDateTime>,
        store: &mut ValueStore,
    ) -> IntakeResult<PickerEvent> {
        let Some(open) = self.open.as_mut() else {
            return Err(IntakeError::SelectorClosed);
        };

        match (self.commit_mode, selection) {
            (CommitMode::Immediate, Some(value)) => {
                open.working = value;
                self.confirm(store).map(PickerEvent::Committed)
            }
            (CommitMode::Immediate, None) => {
                self.cancel();
                Ok(PickerEvent::Dismissed)
            }
            (CommitMode::Deferred, Some(value)) => {
                open.working = value;
                Ok(PickerEvent::Updated)
            }
            (CommitMode::Deferred, None) => Ok(PickerEvent::Ignored),
        }
    }

    /// Commit the working value and close ("Done").
    pub fn confirm(&mut self, store: &mut ValueStore) -> IntakeResult<FieldId> {
        let open = self.open.take().ok_or(IntakeError::SelectorClosed)?;
        let formatted = open.mode.format(open.working);

        tracing::debug!(field_id = open.field_id, value = %formatted, "date/time committed");
        store.set(open.field_id, FieldValue::Text(formatted));
        Ok(open.field_id)
    }

    /// Close without committing.
    pub fn cancel(&mut self) {
        if let Some(open) = self.open.take() {
            tracing::debug!(field_id = open.field_id, "date/time picker dismissed");
        }
    }
}
