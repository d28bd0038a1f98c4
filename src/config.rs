use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub firebase_api_key: String,
    pub firebase_project_id: String,
    pub firestore_base_url: String,
    pub identity_toolkit_url: String,
    pub secure_token_url: String,
    pub expo_push_url: String,
    pub enable_logging: bool,
    pub scan_config: ScanConfig,
    pub map_config: MapConfig,
    pub notification_poll_seconds: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            firebase_api_key: String::new(),
            firebase_project_id: String::new(),
            firestore_base_url: "https://firestore.googleapis.com/v1".to_string(),
            identity_toolkit_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            secure_token_url: "https://securetoken.googleapis.com/v1".to_string(),
            expo_push_url: "https://exp.host/--/api/v2/push/send".to_string(),
            enable_logging: true,
            scan_config: ScanConfig::default(),
            map_config: MapConfig::default(),
            notification_poll_seconds: 15,
        }
    }
}

/// Tiempos de re-armado del escáner (debounce entre dos lecturas)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    pub cooldown_ms: u32,
    pub success_cooldown_ms: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 1000,
            success_cooldown_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_span: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Centro de Francia
        Self {
            default_center_lat: 46.603354,
            default_center_lng: 1.888334,
            default_span: 10.0,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            firebase_api_key: option_env!("FIREBASE_API_KEY").unwrap_or("").to_string(),
            firebase_project_id: option_env!("FIREBASE_PROJECT_ID").unwrap_or("").to_string(),
            firestore_base_url: option_env!("FIRESTORE_BASE_URL")
                .map(str::to_string)
                .unwrap_or(defaults.firestore_base_url),
            identity_toolkit_url: option_env!("IDENTITY_TOOLKIT_URL")
                .map(str::to_string)
                .unwrap_or(defaults.identity_toolkit_url),
            secure_token_url: option_env!("SECURE_TOKEN_URL")
                .map(str::to_string)
                .unwrap_or(defaults.secure_token_url),
            expo_push_url: option_env!("EXPO_PUSH_URL")
                .map(str::to_string)
                .unwrap_or(defaults.expo_push_url),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            scan_config: ScanConfig {
                cooldown_ms: option_env!("SCAN_COOLDOWN_MS")
                    .unwrap_or("1000").parse().unwrap_or(1000),
                success_cooldown_ms: option_env!("SCAN_SUCCESS_COOLDOWN_MS")
                    .unwrap_or("1500").parse().unwrap_or(1500),
            },
            map_config: defaults.map_config,
            notification_poll_seconds: option_env!("NOTIFICATION_POLL_SECONDS")
                .unwrap_or("15").parse().unwrap_or(15),
        }
    }

    /// Raíz REST de los documentos del proyecto
    pub fn firestore_documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.firestore_base_url, self.firebase_project_id
        )
    }

    pub fn sign_in_url(&self) -> String {
        format!(
            "{}/accounts:signInWithPassword?key={}",
            self.identity_toolkit_url, self.firebase_api_key
        )
    }

    pub fn refresh_url(&self) -> String {
        format!("{}/token?key={}", self.secure_token_url, self.firebase_api_key)
    }

    /// Nivel de log según configuración
    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Info
        } else {
            log::Level::Warn
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cooldowns_match_scanner_policy() {
        let config = AppConfig::default();
        assert_eq!(config.scan_config.cooldown_ms, 1000);
        assert_eq!(config.scan_config.success_cooldown_ms, 1500);
    }

    #[test]
    fn builds_rest_urls_from_project_settings() {
        let config = AppConfig {
            firebase_api_key: "KEY".to_string(),
            firebase_project_id: "paniers-jc".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.firestore_documents_url(),
            "https://firestore.googleapis.com/v1/projects/paniers-jc/databases/(default)/documents"
        );
        assert_eq!(
            config.sign_in_url(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=KEY"
        );
        assert_eq!(config.refresh_url(), "https://securetoken.googleapis.com/v1/token?key=KEY");
    }

    #[test]
    fn logging_switch_selects_level() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level(), log::Level::Info);
        config.enable_logging = false;
        assert_eq!(config.log_level(), log::Level::Warn);
    }
}
