//! Persisted key-value storage for the signed-in user's small bits of state.
//!
//! A single JSON object in `storage.json` under the data directory. Each write rewrites the whole
//! file; the store is only ever touched by one process at a time.

use crate::backend::{ClinicId, ClinicSummary};
use crate::error::{StoreError, StoreResult};
use pawclinic_types::NonEmptyText;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const STORAGE_FILE_NAME: &str = "storage.json";
pub const SELECTED_CLINIC_KEY: &str = "selectedClinic";
pub const TOKEN_KEY: &str = "token";

/// Directory name used under the platform data directory.
const APP_DIR_NAME: &str = "pawclinic";

/// The clinic the user chose to book with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedClinic {
    pub id: ClinicId,
    #[serde(default)]
    pub clinic_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub is_open: bool,
}

impl From<&ClinicSummary> for SelectedClinic {
    fn from(clinic: &ClinicSummary) -> Self {
        Self {
            id: clinic.id,
            clinic_name: clinic.clinic_name.clone(),
            image_url: clinic.image_url.clone(),
            address: clinic.address.clone(),
            contact_number: clinic.contact_number.clone(),
            is_open: clinic.is_open,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    ///
    /// The storage file itself is created on first write.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).map_err(StoreError::Write)?;
        Ok(Self {
            path: data_dir.join(STORAGE_FILE_NAME),
        })
    }

    /// `<platform data dir>/pawclinic`.
    pub fn default_data_dir() -> StoreResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(StoreError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StoreError::Read(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, map: &Map<String, Value>) -> StoreResult<()> {
        let raw = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, raw).map_err(StoreError::Write)
    }

    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let mut map = self.load()?;
        match map.remove(key) {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    pub fn set_item<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let mut map = self.load()?;
        map.insert(key.to_owned(), serde_json::to_value(value)?);
        self.save(&map)?;
        tracing::debug!(key, "stored item");
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> StoreResult<()> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
            tracing::debug!(key, "removed item");
        }
        Ok(())
    }

    /// The selected clinic, or `None` when missing or unreadable.
    pub fn selected_clinic(&self) -> Option<SelectedClinic> {
        self.get_item(SELECTED_CLINIC_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read selected clinic");
            None
        })
    }

    pub fn set_selected_clinic(&self, clinic: &SelectedClinic) -> StoreResult<()> {
        self.set_item(SELECTED_CLINIC_KEY, clinic)
    }

    pub fn clear_selected_clinic(&self) -> StoreResult<()> {
        self.remove_item(SELECTED_CLINIC_KEY)
    }

    /// The stored bearer token. Blank tokens read as absent.
    pub fn token(&self) -> StoreResult<Option<NonEmptyText>> {
        let raw: Option<String> = self.get_item(TOKEN_KEY)?;
        Ok(raw.and_then(|t| NonEmptyText::new(t).ok()))
    }

    pub fn set_token(&self, token: &NonEmptyText) -> StoreResult<()> {
        self.set_item(TOKEN_KEY, &token.as_str())
    }

    pub fn clear_token(&self) -> StoreResult<()> {
        self.remove_item(TOKEN_KEY)
    }
}
