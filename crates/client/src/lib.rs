//! # pawclinic client
//!
//! Everything around the intake form engine that touches the outside world:
//! - [`ApiClient`]: the clinic backend over HTTP
//! - [`LocalStore`]: the selected clinic and bearer token on disk
//! - [`ClientConfig`]: where the backend lives and how to talk to it
//! - [`BookingSession`]: one appointment screen's state, driven against any [`IntakeBackend`]

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod local_store;
pub mod session;

pub use api::{bearer_auth, ApiClient, RequestDecorator};
pub use backend::{ClinicId, ClinicSummary, IntakeBackend, Profile};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ApiError, ApiResult, StoreError, StoreResult};
pub use local_store::{LocalStore, SelectedClinic};
pub use session::{Banner, BannerKind, BookingSession, SubmitOutcome, SubmitStep};
