//! Formats and user-facing strings used by the form engine.

/// `chrono` format of stored date answers (`YYYY-MM-DD`).
pub const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

/// `chrono` format of stored time answers (24-hour `HH:mm`).
pub const STORED_TIME_FORMAT: &str = "%H:%M";

/// Human-readable date caption, e.g. `September 10, 2025`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

/// Human-readable 12-hour time caption, e.g. `2:05 PM`.
pub const DISPLAY_TIME_FORMAT: &str = "%-I:%M %p";

/// Caption of a choice field with nothing selected.
pub const SELECT_PROMPT: &str = "Select";

/// Caption of an empty date field.
pub const SELECT_DATE_PROMPT: &str = "Select date";

/// Caption of an empty time field.
pub const SELECT_TIME_PROMPT: &str = "Select time";

/// Banner shown after the backend accepts an appointment request.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Appointment request sent successfully.";

/// Banner shown when a schema fetch fails without a backend message.
pub const FETCH_FIELDS_FALLBACK: &str = "Failed to load fields";

/// Banner shown when a submission fails without a backend message.
pub const SUBMIT_FALLBACK: &str = "Failed to submit appointment";
