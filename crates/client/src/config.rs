//! Client runtime configuration.
//!
//! Resolved once at startup (flags, environment, stored token) and then passed by reference to
//! the API client and booking session. Nothing in this crate reads environment variables while
//! handling a request.

use crate::error::{ApiError, ApiResult};
use pawclinic_core::CommitMode;
use pawclinic_types::NonEmptyText;
use std::time::Duration;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: NonEmptyText,
    token: Option<NonEmptyText>,
    timeout: Option<Duration>,
    commit_mode: CommitMode,
}

impl ClientConfig {
    /// Create a configuration for the backend at `base_url`.
    ///
    /// Trailing slashes are dropped. The URL must be absolute http(s).
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        let trimmed = base_url.as_ref().trim().trim_end_matches('/');
        let base_url = NonEmptyText::new(trimmed)
            .map_err(|_| ApiError::Config("base URL cannot be empty".into()))?;

        let parsed = reqwest::Url::parse(base_url.as_str())
            .map_err(|e| ApiError::Config(format!("invalid base URL {base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base URL must use http or https, got {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url,
            token: None,
            timeout: None,
            commit_mode: CommitMode::default(),
        })
    }

    pub fn with_token(mut self, token: Option<NonEmptyText>) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_commit_mode(mut self, commit_mode: CommitMode) -> Self {
        self.commit_mode = commit_mode;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn token(&self) -> Option<&NonEmptyText> {
        self.token.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn commit_mode(&self) -> CommitMode {
        self.commit_mode
    }

    /// Absolute URL for an API path such as `/clinics/3/fields`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Parse a request timeout in whole seconds from an optional string value.
///
/// `None`, blank, and `0` all mean "no timeout".
pub fn timeout_from_env_value(value: Option<String>) -> ApiResult<Option<Duration>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let secs = value
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| ApiError::Config(format!("timeout must be whole seconds, got {v:?}")))
        })
        .transpose()?;

    Ok(secs.filter(|s| *s > 0).map(Duration::from_secs))
}

/// Parse the picker commit mode from an optional string value, defaulting to immediate.
pub fn commit_mode_from_env_value(value: Option<String>) -> ApiResult<CommitMode> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v.parse().map_err(ApiError::Config),
        None => Ok(CommitMode::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slashes() {
        let cfg = ClientConfig::new("http://192.168.1.7:8000/api/").unwrap();
        assert_eq!(cfg.base_url(), "http://192.168.1.7:8000/api");
        assert_eq!(
            cfg.url("/clinics/3/fields"),
            "http://192.168.1.7:8000/api/clinics/3/fields"
        );
        assert_eq!(cfg.url("me"), "http://192.168.1.7:8000/api/me");
    }

    #[test]
    fn new_rejects_bad_urls() {
        assert!(matches!(ClientConfig::new("  "), Err(ApiError::Config(_))));
        assert!(matches!(ClientConfig::new("not a url"), Err(ApiError::Config(_))));
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn new_starts_without_token_or_timeout() {
        let cfg = ClientConfig::new(DEFAULT_API_URL).unwrap();
        assert_eq!(cfg.base_url(), DEFAULT_API_URL);
        assert!(cfg.token().is_none());
        assert_eq!(cfg.timeout(), None);
        assert_eq!(cfg.commit_mode(), CommitMode::Immediate);
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(timeout_from_env_value(None).unwrap(), None);
        assert_eq!(timeout_from_env_value(Some(" ".into())).unwrap(), None);
        assert_eq!(timeout_from_env_value(Some("0".into())).unwrap(), None);
        assert_eq!(
            timeout_from_env_value(Some("15".into())).unwrap(),
            Some(Duration::from_secs(15))
        );
        assert!(timeout_from_env_value(Some("soon".into())).is_err());
    }

    #[test]
    fn commit_mode_parsing() {
        assert_eq!(
            commit_mode_from_env_value(None).unwrap(),
            CommitMode::Immediate
        );
        assert_eq!(
            commit_mode_from_env_value(Some("deferred".into())).unwrap(),
            CommitMode::Deferred
        );
        assert!(commit_mode_from_env_value(Some("android".into())).is_err());
    }
}
