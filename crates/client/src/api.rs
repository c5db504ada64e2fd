//! HTTP client for the clinic backend.
//!
//! Every outgoing request passes through a request decorator chosen when the client is built.
//! The default decorator attaches `Authorization: Bearer <token>` when the configuration carries
//! a token; callers can compose further decorators with [`ApiClient::with_decorator`].

use crate::backend::{ClinicId, ClinicSummary, IntakeBackend, Profile};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use pawclinic_core::{fields_from_response, AppointmentRequest, FieldDefinition};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde_json::Value;
use std::sync::Arc;

/// Function applied to every request just before it is sent.
pub type RequestDecorator = Arc<dyn Fn(RequestBuilder) -> RequestBuilder + Send + Sync>;

/// Decorator that adds a bearer token, or passes requests through unchanged without one.
pub fn bearer_auth(token: Option<String>) -> RequestDecorator {
    let Some(token) = token else {
        return Arc::new(|req: RequestBuilder| req);
    };
    Arc::new(move |req: RequestBuilder| req.bearer_auth(&token))
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    decorate: RequestDecorator,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url())
            .field("authenticated", &self.config.token().is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let decorate = bearer_auth(config.token().map(|t| t.as_str().to_owned()));

        Ok(Self {
            http,
            config,
            decorate,
        })
    }

    /// Compose `next` after the current decorator.
    pub fn with_decorator<F>(mut self, next: F) -> Self
    where
        F: Fn(RequestBuilder) -> RequestBuilder + Send + Sync + 'static,
    {
        let current = self.decorate;
        self.decorate = Arc::new(move |req: RequestBuilder| next(current(req)));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and return its JSON body, mapping non-2xx statuses to [`ApiError::Status`].
    ///
    /// Empty or non-JSON success bodies read as `Value::Null`.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Value> {
        let response = (self.decorate)(request).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned);
            tracing::warn!(status = status.as_u16(), ?message, "backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    pub async fn fetch_fields(&self, clinic_id: ClinicId) -> ApiResult<Vec<FieldDefinition>> {
        let url = self.config.url(&format!("/clinics/{clinic_id}/fields"));
        tracing::info!(clinic_id, "fetching intake form fields");

        let body = self.send(self.http.get(&url)).await?;
        let fields = fields_from_response(body);

        tracing::info!(clinic_id, fields = fields.len(), "intake form fields loaded");
        Ok(fields)
    }

    pub async fn submit_appointment(
        &self,
        clinic_id: ClinicId,
        request: &AppointmentRequest,
    ) -> ApiResult<()> {
        let url = self.config.url(&format!("/clinics/{clinic_id}/appointments"));
        tracing::info!(
            clinic_id,
            responses = request.responses.len(),
            "submitting appointment request"
        );

        self.send(self.http.post(&url).json(request)).await?;
        Ok(())
    }

    pub async fn me(&self) -> ApiResult<Profile> {
        let body = self.send(self.http.get(self.config.url("/me"))).await?;
        let profile = match body.get("name") {
            Some(_) => body,
            None => unwrap_data(body),
        };
        Ok(serde_json::from_value(profile)?)
    }

    pub async fn list_clinics(&self) -> ApiResult<Vec<ClinicSummary>> {
        let body = self.send(self.http.get(self.config.url("/clinics"))).await?;
        match unwrap_data(body) {
            list @ Value::Array(_) => Ok(serde_json::from_value(list)?),
            _ => Ok(Vec::new()),
        }
    }
}

/// `{"data": x}` → `x` when `x` is not null; anything else is returned unchanged.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => Value::Object(map),
            Some(data) => data,
        },
        other => other,
    }
}

#[async_trait]
impl IntakeBackend for ApiClient {
    async fn fetch_fields(&self, clinic_id: ClinicId) -> ApiResult<Vec<FieldDefinition>> {
        ApiClient::fetch_fields(self, clinic_id).await
    }

    async fn submit_appointment(
        &self,
        clinic_id: ClinicId,
        request: &AppointmentRequest,
    ) -> ApiResult<()> {
        ApiClient::submit_appointment(self, clinic_id, request).await
    }

    async fn me(&self) -> ApiResult<Profile> {
        ApiClient::me(self).await
    }
}
