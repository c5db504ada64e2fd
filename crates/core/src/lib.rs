//! # pawclinic core
//!
//! The dynamic intake form engine behind clinic appointment requests.
//!
//! A clinic configures an ordered list of fields ([`FieldDefinition`]). This crate keeps the
//! user's answers ([`ValueStore`]), drives the option and date/time pickers that write into it
//! ([`OptionSelector`], [`DateTimeSelector`]), checks the form ([`validate`]) and turns it into an
//! [`AppointmentRequest`] ([`build`]).
//!
//! **No I/O**: fetching the schema and posting the request belong in `pawclinic-client`.

pub mod constants;
pub mod datetime;
pub mod display;
pub mod error;
pub mod field;
pub mod selector;
pub mod store;
pub mod submission;
pub mod validation;
pub mod value;

pub use datetime::{CommitMode, DateTimeSelector, PickerEvent, PickerMode};
pub use error::{IntakeError, IntakeResult, ValidationError};
pub use field::{fields_from_response, FieldDefinition, FieldId, FieldType};
pub use selector::{OpenSelection, OptionSelector};
pub use store::ValueStore;
pub use submission::{build, settle, AppointmentRequest, FieldResponse};
pub use validation::validate;
pub use value::FieldValue;
