use gloo_storage::{errors::StorageError, LocalStorage, Storage};
use serde::{de::DeserializeOwned, Serialize};
use crate::error::AppError;

pub fn save_to_storage<T: Serialize>(key: &str, value: &T) -> Result<(), AppError> {
    LocalStorage::set(key, value)?;
    Ok(())
}

/// Clave ausente → None; contenido ilegible → error
pub fn load_from_storage<T: DeserializeOwned>(key: &str) -> Result<Option<T>, AppError> {
    match LocalStorage::get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::KeyNotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn remove_from_storage(key: &str) {
    LocalStorage::delete(key);
}
