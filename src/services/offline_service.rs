// ============================================================================
// OFFLINE SERVICE - Sesión persistida en localStorage
// ============================================================================

use crate::error::AppError;
use crate::models::UserSession;
use crate::utils::storage::{load_from_storage, remove_from_storage, save_to_storage};

const SESSION_STORAGE_KEY: &str = "panier_tournee_session";
const LAST_DAY_STORAGE_KEY: &str = "panier_tournee_last_day";

/// Persistencia local de la sesión de usuario
pub struct OfflineService;

impl OfflineService {
    pub fn new() -> Self {
        Self
    }

    pub fn save_session(&self, session: &UserSession) -> Result<(), AppError> {
        save_to_storage(SESSION_STORAGE_KEY, session)?;
        log::info!("💾 [STORAGE] Session enregistrée ({:?})", session.role);
        Ok(())
    }

    pub fn load_session(&self) -> Result<Option<UserSession>, AppError> {
        let session = load_from_storage::<UserSession>(SESSION_STORAGE_KEY)?;
        if session.is_some() {
            log::info!("📋 [STORAGE] Session restaurée");
        }
        Ok(session)
    }

    pub fn clear_session(&self) {
        remove_from_storage(SESSION_STORAGE_KEY);
        remove_from_storage(LAST_DAY_STORAGE_KEY);
        log::info!("🗑️ [STORAGE] Session effacée");
    }

    /// Último día consultado por el repartidor
    pub fn save_last_day(&self, day: &str) -> Result<(), AppError> {
        save_to_storage(LAST_DAY_STORAGE_KEY, &day.to_string())
    }

    pub fn load_last_day(&self) -> Option<String> {
        load_from_storage::<String>(LAST_DAY_STORAGE_KEY).ok().flatten()
    }
}

impl Default for OfflineService {
    fn default() -> Self {
        Self::new()
    }
}
