//! Backend seam used by the booking session, plus the response shapes it exchanges.

use crate::error::ApiResult;
use async_trait::async_trait;
use pawclinic_core::{AppointmentRequest, FieldDefinition};
use serde::{Deserialize, Serialize};

/// Backend-assigned clinic identifier.
pub type ClinicId = i64;

/// The signed-in user, as returned by `GET /me`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of `GET /clinics`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicSummary {
    pub id: ClinicId,
    #[serde(default)]
    pub clinic_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_open: bool,
}

/// Operations the intake form needs from the clinic backend.
#[async_trait]
pub trait IntakeBackend: Send + Sync {
    /// Ordered field schema for a clinic's intake form.
    async fn fetch_fields(&self, clinic_id: ClinicId) -> ApiResult<Vec<FieldDefinition>>;

    /// Submit an appointment request. Any 2xx response is success.
    async fn submit_appointment(
        &self,
        clinic_id: ClinicId,
        request: &AppointmentRequest,
    ) -> ApiResult<()>;

    /// Profile of the signed-in user, used to prefill the owner name.
    async fn me(&self) -> ApiResult<Profile>;
}
