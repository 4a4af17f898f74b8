//! Storage of the current profile snapshot under a single fixed key.

use edc_core::{EmployeeProfile, ProfileError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

pub const PROFILE_KEY: &str = "edc_employee_profile";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored profile unreadable: {0}")]
    Corrupt(#[from] ProfileError),
}

/// Whole-snapshot get/replace; no partial writes are visible to callers.
pub trait ProfileRepository: Send + Sync {
    fn load(&self) -> Result<Option<EmployeeProfile>, StorageError>;
    fn replace(&self, profile: &EmployeeProfile) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

impl<T: ProfileRepository + ?Sized> ProfileRepository for Arc<T> {
    fn load(&self) -> Result<Option<EmployeeProfile>, StorageError> {
        (**self).load()
    }

    fn replace(&self, profile: &EmployeeProfile) -> Result<(), StorageError> {
        (**self).replace(profile)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    slot: Mutex<Option<EmployeeProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn load(&self) -> Result<Option<EmployeeProfile>, StorageError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn replace(&self, profile: &EmployeeProfile) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// One pretty-printed JSON document per data directory, written atomically
/// through a temp file and rename.
#[derive(Debug, Clone)]
pub struct JsonFileProfileRepository {
    path: PathBuf,
}

impl JsonFileProfileRepository {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self, StorageError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            path: data_dir.as_ref().join(format!("{PROFILE_KEY}.json")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileRepository for JsonFileProfileRepository {
    fn load(&self) -> Result<Option<EmployeeProfile>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(EmployeeProfile::from_json(&raw)?))
    }

    fn replace(&self, profile: &EmployeeProfile) -> Result<(), StorageError> {
        let data = profile.to_json_pretty()?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
