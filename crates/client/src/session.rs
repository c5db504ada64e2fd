//! Booking session: the engine state behind one appointment screen.
//!
//! A session is created when the screen mounts and dropped when it goes away. It owns the field
//! schema, the answers, both selectors and the banner shown to the user, and talks to the backend
//! through an [`IntakeBackend`].

use crate::backend::{ClinicId, IntakeBackend};
use crate::error::ApiResult;
use chrono::NaiveDateTime;
use pawclinic_core::constants::{FETCH_FIELDS_FALLBACK, SUBMIT_FALLBACK, SUBMIT_SUCCESS_MESSAGE};
use pawclinic_core::{
    build, settle, validate, AppointmentRequest, CommitMode, DateTimeSelector, FieldDefinition,
    FieldId, FieldValue, IntakeError, IntakeResult, OptionSelector, PickerEvent, ValidationError,
    ValueStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Message shown above the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

/// Result of [`BookingSession::begin_submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitStep {
    /// A submission is already running, fields are loading, or no clinic is selected.
    Ignored,
    /// The form failed validation; the error banner is set.
    Invalid(ValidationError),
    /// The request is ready to send and the session is now submitting.
    Ready {
        clinic_id: ClinicId,
        request: AppointmentRequest,
    },
}

/// Final result of [`BookingSession::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Invalid(ValidationError),
    Sent,
    Failed,
}

pub struct BookingSession<B> {
    backend: B,
    clinic_id: Option<ClinicId>,
    owner_name: String,
    owner_name_edited: bool,
    owner_phone: String,
    fields: Vec<FieldDefinition>,
    store: ValueStore,
    loading: bool,
    submitting: bool,
    banner: Option<Banner>,
    options: OptionSelector,
    picker: DateTimeSelector,
}

fn find_field(fields: &[FieldDefinition], field_id: FieldId) -> IntakeResult<&FieldDefinition> {
    fields
        .iter()
        .find(|f| f.id == field_id)
        .ok_or(IntakeError::UnknownField(field_id))
}

impl<B: IntakeBackend> BookingSession<B> {
    pub fn new(backend: B, clinic_id: Option<ClinicId>, commit_mode: CommitMode) -> Self {
        Self {
            backend,
            clinic_id,
            owner_name: String::new(),
            owner_name_edited: false,
            owner_phone: String::new(),
            fields: Vec::new(),
            store: ValueStore::new(),
            loading: false,
            submitting: false,
            banner: None,
            options: OptionSelector::new(),
            picker: DateTimeSelector::new(commit_mode),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clinic_id(&self) -> Option<ClinicId> {
        self.clinic_id
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn owner_phone(&self) -> &str {
        &self.owner_phone
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn value(&self, field_id: FieldId) -> Option<&FieldValue> {
        self.store.get(field_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn option_selector(&self) -> &OptionSelector {
        &self.options
    }

    pub fn date_time_selector(&self) -> &DateTimeSelector {
        &self.picker
    }

    /// Fill the owner name from the signed-in profile unless the user already typed one.
    pub async fn prefill_owner(&mut self) {
        match self.backend.me().await {
            Ok(profile) => {
                if self.owner_name_edited {
                    tracing::debug!("owner name already edited, skipping prefill");
                    return;
                }
                self.owner_name = profile.name.unwrap_or_default();
            }
            Err(e) => tracing::warn!(error = %e, "could not load profile for owner prefill"),
        }
    }

    /// Fetch the clinic's field schema and seed defaults for new fields.
    ///
    /// Existing answers are kept. On failure the field list is emptied and an error banner set.
    pub async fn load_fields(&mut self) {
        let Some(clinic_id) = self.clinic_id else {
            tracing::debug!("no clinic selected, not loading fields");
            return;
        };

        self.loading = true;
        self.banner = None;
        self.options.cancel();
        self.picker.cancel();

        let result = self.backend.fetch_fields(clinic_id).await;
        self.loading = false;

        match result {
            Ok(fields) => {
                self.store.init_defaults(&fields);
                self.fields = fields;
            }
            Err(e) => {
                tracing::error!(clinic_id, error = %e, "failed to load intake form fields");
                self.fields.clear();
                self.banner = Some(Banner::error(e.user_message(FETCH_FIELDS_FALLBACK)));
            }
        }
    }

    /// Pull-to-refresh.
    pub async fn refresh(&mut self) {
        self.load_fields().await
    }

    /// Validate and build the request, marking the session as submitting.
    pub fn begin_submit(&mut self) -> SubmitStep {
        if self.submitting || self.loading {
            return SubmitStep::Ignored;
        }
        let Some(clinic_id) = self.clinic_id else {
            return SubmitStep::Ignored;
        };

        if let Err(e) = validate(&self.owner_name, &self.owner_phone, &self.fields, &self.store) {
            tracing::info!(reason = %e, "appointment request failed validation");
            self.banner = Some(Banner::error(e.to_string()));
            return SubmitStep::Invalid(e);
        }

        self.submitting = true;
        self.banner = None;
        SubmitStep::Ready {
            clinic_id,
            request: build(&self.owner_name, &self.owner_phone, &self.fields, &self.store),
        }
    }

    /// Record the backend's answer to a submission started with [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, result: ApiResult<()>) -> SubmitOutcome {
        self.submitting = false;
        settle(&mut self.store, &self.fields, &result);

        match result {
            Ok(()) => {
                tracing::info!(clinic_id = ?self.clinic_id, "appointment request sent");
                self.banner = Some(Banner::success(SUBMIT_SUCCESS_MESSAGE));
                SubmitOutcome::Sent
            }
            Err(e) => {
                tracing::error!(clinic_id = ?self.clinic_id, error = %e, "appointment request failed");
                self.banner = Some(Banner::error(e.user_message(SUBMIT_FALLBACK)));
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.begin_submit() {
            SubmitStep::Ignored => SubmitOutcome::Ignored,
            SubmitStep::Invalid(e) => SubmitOutcome::Invalid(e),
            SubmitStep::Ready { clinic_id, request } => {
                let result = self.backend.submit_appointment(clinic_id, &request).await;
                self.finish_submit(result)
            }
        }
    }

    pub fn set_owner_name(&mut self, name: impl Into<String>) {
        self.owner_name = name.into();
        self.owner_name_edited = true;
    }

    pub fn set_owner_phone(&mut self, phone: impl Into<String>) {
        self.owner_phone = phone.into();
    }

    /// Write free text for a text, textarea or number field.
    ///
    /// Choice and date/time fields are only written through their selectors.
    pub fn set_text(&mut self, field_id: FieldId, text: impl Into<String>) -> IntakeResult<()> {
        let field = find_field(&self.fields, field_id)?;
        if !field.field_type.is_free_text() {
            return Err(IntakeError::NotFreeText {
                field_id,
                field_type: field.field_type,
            });
        }
        self.store.set(field_id, FieldValue::Text(text.into()));
        Ok(())
    }

    pub fn open_options(&mut self, field_id: FieldId) -> IntakeResult<()> {
        let field = find_field(&self.fields, field_id)?;
        self.options.open(field, &self.store)
    }

    pub fn toggle_option(&mut self, option: &str) -> IntakeResult<()> {
        self.options.pick(option)
    }

    pub fn confirm_options(&mut self) -> IntakeResult<FieldId> {
        self.options.confirm(&mut self.store)
    }

    pub fn cancel_options(&mut self) {
        self.options.cancel()
    }

    pub fn open_picker(&mut self, field_id: FieldId) -> IntakeResult<()> {
        let field = find_field(&self.fields, field_id)?;
        self.picker.open_now(field, &self.store)
    }

    /// [`open_picker`](Self::open_picker) with an explicit fallback for unset values.
    pub fn open_picker_at(&mut self, field_id: FieldId, now: NaiveDateTime) -> IntakeResult<()> {
        let field = find_field(&self.fields, field_id)?;
        self.picker.open(field, &self.store, now)
    }

    pub fn picker_changed(&mut self, selection: Option<NaiveDateTime>) -> IntakeResult<PickerEvent> {
        self.picker.on_change(selection, &mut self.store)
    }

    pub fn confirm_picker(&mut self) -> IntakeResult<FieldId> {
        self.picker.confirm(&mut self.store)
    }

    pub fn cancel_picker(&mut self) {
        self.picker.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Profile;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use pawclinic_core::FieldType;
    use std::sync::Mutex;

    /// Backend double that replays canned answers and records submissions.
    #[derive(Default)]
    struct FakeBackend {
        fields: Mutex<Vec<FieldDefinition>>,
        fail_fields: Mutex<Option<(u16, Option<String>)>>,
        fail_submit: Mutex<Option<(u16, Option<String>)>>,
        profile_name: Option<String>,
        submitted: Mutex<Vec<(ClinicId, AppointmentRequest)>>,
    }

    fn status_error((status, message): (u16, Option<String>)) -> ApiError {
        ApiError::Status { status, message }
    }

    #[async_trait]
    impl IntakeBackend for FakeBackend {
        async fn fetch_fields(&self, _clinic_id: ClinicId) -> ApiResult<Vec<FieldDefinition>> {
            if let Some(failure) = self.fail_fields.lock().unwrap().clone() {
                return Err(status_error(failure));
            }
            Ok(self.fields.lock().unwrap().clone())
        }

        async fn submit_appointment(
            &self,
            clinic_id: ClinicId,
            request: &AppointmentRequest,
        ) -> ApiResult<()> {
            self.submitted
                .lock()
                .unwrap()
                .push((clinic_id, request.clone()));
            match self.fail_submit.lock().unwrap().clone() {
                Some(failure) => Err(status_error(failure)),
                None => Ok(()),
            }
        }

        async fn me(&self) -> ApiResult<Profile> {
            match &self.profile_name {
                Some(name) => Ok(Profile {
                    name: Some(name.clone()),
                }),
                None => Err(status_error((401, None))),
            }
        }
    }

    fn schema() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new(1, "Symptom", FieldType::Text).required(),
            FieldDefinition::new(2, "Services", FieldType::Checkbox)
                .with_options(["A", "B", "C"])
                .required(),
            FieldDefinition::new(3, "Preferred date", FieldType::Date),
        ]
    }

    fn backend() -> FakeBackend {
        FakeBackend {
            fields: Mutex::new(schema()),
            profile_name: Some("Jane".into()),
            ..FakeBackend::default()
        }
    }

    async fn loaded(backend: FakeBackend, mode: CommitMode) -> BookingSession<FakeBackend> {
        let mut session = BookingSession::new(backend, Some(3), mode);
        session.load_fields().await;
        session
    }

    fn fill(session: &mut BookingSession<FakeBackend>) {
        session.set_owner_name("Jane");
        session.set_owner_phone("0917");
        session.set_text(1, "Limping").unwrap();
        session.open_options(2).unwrap();
        session.toggle_option("A").unwrap();
        session.toggle_option("C").unwrap();
        session.confirm_options().unwrap();
    }

    #[tokio::test]
    async fn load_seeds_defaults() {
        let session = loaded(backend(), CommitMode::Immediate).await;

        assert_eq!(session.fields().len(), 3);
        assert_eq!(session.value(1), Some(&FieldValue::Text(String::new())));
        assert_eq!(session.value(2), Some(&FieldValue::MultiChoice(vec![])));
        assert!(!session.is_loading());
        assert_eq!(session.banner(), None);
    }

    #[tokio::test]
    async fn no_clinic_means_no_fetch_and_no_submit() {
        let mut session = BookingSession::new(backend(), None, CommitMode::Immediate);
        session.load_fields().await;
        assert!(session.fields().is_empty());

        session.set_owner_name("Jane");
        session.set_owner_phone("0917");
        assert_eq!(session.submit().await, SubmitOutcome::Ignored);
        assert!(session.backend().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prefill_respects_user_edits() {
        let mut session = loaded(backend(), CommitMode::Immediate).await;
        session.prefill_owner().await;
        assert_eq!(session.owner_name(), "Jane");

        let mut edited = loaded(backend(), CommitMode::Immediate).await;
        edited.set_owner_name("Juan");
        edited.prefill_owner().await;
        assert_eq!(edited.owner_name(), "Juan");
    }

    #[tokio::test]
    async fn prefill_failure_is_silent() {
        let quiet = FakeBackend {
            profile_name: None,
            ..backend()
        };
        let mut session = loaded(quiet, CommitMode::Immediate).await;
        session.prefill_owner().await;

        assert_eq!(session.owner_name(), "");
        assert_eq!(session.banner(), None);
    }

    #[tokio::test]
    async fn successful_submit_resets_answers() {
        let mut session = loaded(backend(), CommitMode::Immediate).await;
        fill(&mut session);

        assert_eq!(session.submit().await, SubmitOutcome::Sent);

        let submitted = session.backend().submitted.lock().unwrap().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].0, 3);
        assert_eq!(
            submitted[0].1.responses[1].value,
            Some(FieldValue::MultiChoice(vec!["A".into(), "C".into()]))
        );

        assert_eq!(
            session.banner(),
            Some(&Banner::success("Appointment request sent successfully."))
        );
        assert_eq!(session.value(1), Some(&FieldValue::Text(String::new())));
        assert_eq!(session.value(2), Some(&FieldValue::MultiChoice(vec![])));
        assert_eq!(session.owner_name(), "Jane");
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn rejected_submit_keeps_answers_and_shows_backend_message() {
        let closed = FakeBackend {
            fail_submit: Mutex::new(Some((422, Some("Clinic closed".into())))),
            ..backend()
        };
        let mut session = loaded(closed, CommitMode::Immediate).await;
        fill(&mut session);

        assert_eq!(session.submit().await, SubmitOutcome::Failed);
        assert_eq!(session.banner(), Some(&Banner::error("Clinic closed")));
        assert_eq!(session.value(1), Some(&FieldValue::Text("Limping".into())));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn rejected_submit_without_message_uses_fallback() {
        let broken = FakeBackend {
            fail_submit: Mutex::new(Some((500, None))),
            ..backend()
        };
        let mut session = loaded(broken, CommitMode::Immediate).await;
        fill(&mut session);

        session.submit().await;
        assert_eq!(
            session.banner(),
            Some(&Banner::error("Failed to submit appointment"))
        );
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let mut session = loaded(backend(), CommitMode::Immediate).await;
        session.set_owner_name("Jane");
        session.set_owner_phone("0917");
        session.set_text(1, "Limping").unwrap();

        let outcome = session.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(ValidationError::MissingField {
                field_id: 2,
                label: "Services".into()
            })
        );
        assert_eq!(session.banner(), Some(&Banner::error("Services is required")));
        assert!(session.backend().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn begin_submit_is_ignored_while_submitting() {
        let mut session = loaded(backend(), CommitMode::Immediate).await;
        fill(&mut session);

        assert!(matches!(session.begin_submit(), SubmitStep::Ready { .. }));
        assert!(session.is_submitting());
        let before = session.store().clone();

        assert_eq!(session.begin_submit(), SubmitStep::Ignored);
        assert!(session.is_submitting());
        assert_eq!(session.store(), &before);
        assert_eq!(session.banner(), None);

        session.finish_submit(Ok(()));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_values_for_next_load() {
        let mut session = loaded(backend(), CommitMode::Immediate).await;
        session.set_text(1, "Limping").unwrap();

        *session.backend().fail_fields.lock().unwrap() = Some((503, None));
        session.refresh().await;

        assert!(session.fields().is_empty());
        assert_eq!(session.banner(), Some(&Banner::error("Failed to load fields")));

        *session.backend().fail_fields.lock().unwrap() = None;
        session.refresh().await;

        assert_eq!(session.fields().len(), 3);
        assert_eq!(session.banner(), None);
        assert_eq!(session.value(1), Some(&FieldValue::Text("Limping".into())));
    }

    #[tokio::test]
    async fn date_picker_commits_through_session() {
        let mut session = loaded(backend(), CommitMode::Deferred).await;
        let noon = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let chosen = NaiveDate::from_ymd_opt(2025, 9, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        session.open_picker_at(3, noon).unwrap();
        assert_eq!(
            session.picker_changed(Some(chosen)).unwrap(),
            PickerEvent::Updated
        );
        assert_eq!(session.value(3), Some(&FieldValue::Text(String::new())));

        assert_eq!(session.confirm_picker().unwrap(), 3);
        assert_eq!(session.value(3), Some(&FieldValue::Text("2025-09-10".into())));
    }

    #[tokio::test]
    async fn typed_text_is_refused_for_picker_fields() {
        let mut session = loaded(backend(), CommitMode::Immediate).await;
        session.set_owner_name("Jane");
        session.set_owner_phone("0917");
        session.set_text(1, "Limping").unwrap();

        assert!(matches!(
            session.set_text(2, "not an option"),
            Err(IntakeError::NotFreeText {
                field_id: 2,
                field_type: FieldType::Checkbox
            })
        ));
        assert!(matches!(
            session.set_text(3, "next week"),
            Err(IntakeError::NotFreeText { field_id: 3, .. })
        ));
        assert_eq!(session.value(2), Some(&FieldValue::MultiChoice(vec![])));
        assert_eq!(session.value(3), Some(&FieldValue::Text(String::new())));

        assert!(matches!(
            session.begin_submit(),
            SubmitStep::Invalid(ValidationError::MissingField { field_id: 2, .. })
        ));
    }

    #[tokio::test]
    async fn unknown_fields_are_rejected() {
        let mut session = loaded(backend(), CommitMode::Immediate).await;

        assert!(matches!(
            session.set_text(99, "x"),
            Err(IntakeError::UnknownField(99))
        ));
        assert!(matches!(
            session.open_options(1),
            Err(IntakeError::NotSelectable { field_id: 1, .. })
        ));
    }
}
