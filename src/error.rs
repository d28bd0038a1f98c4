// ============================================================================
// ERRORES - Taxonomía de errores de la aplicación
// ============================================================================
// Los errores de escaneo se recuperan localmente (el escáner sigue abierto).
// Persistencia y datos de tournée se muestran como alertas bloqueantes.
// ============================================================================

use thiserror::Error;
use crate::models::basket::BasketType;

/// Errores del escaneo QR de paniers y depósitos
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Le QR code ne correspond pas au panier {kind} (lu: {scanned})")]
    CodeMismatch { kind: BasketType, scanned: i64 },

    #[error("Ce QR code ne correspond pas au dépôt {expected} (lu: {scanned})")]
    DepotMismatch { expected: i64, scanned: i64 },

    #[error("Le panier {0} n'a pas de code QR associé")]
    NoCodeConfigured(BasketType),

    #[error("Tous les paniers {0} ont déjà été validés")]
    AlreadyComplete(BasketType),

    #[error("QR code illisible: {0:?}")]
    MalformedPayload(String),

    #[error("Aucun panier {0} à valider dans ce dépôt")]
    UnknownType(BasketType),

    #[error("Le panier {0} doit être validé par scan")]
    CodeRequired(BasketType),
}

/// Error general de la aplicación
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Échec de l'enregistrement: {0}")]
    PersistenceFailure(String),

    #[error("Données de tournée non trouvées: {0}")]
    RouteDataMissing(String),

    #[error("Connexion échouée: {0}")]
    Auth(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("Erreur réseau: {0}")]
    Network(String),

    #[error("Réponse illisible: {0}")]
    Parse(String),

    #[error("Stockage local indisponible: {0}")]
    Storage(String),

    #[error("Document introuvable: {0}")]
    NotFound(String),
}

impl AppError {
    /// Alerta bloqueante (retry/volver) en lugar de un aviso dentro del escáner
    pub fn is_blocking(&self) -> bool {
        !matches!(self, AppError::Scan(_))
    }

    /// Convierte un NotFound en RouteDataMissing para las lecturas de tournée
    pub fn into_route_missing(self) -> Self {
        match self {
            AppError::NotFound(what) => AppError::RouteDataMissing(what),
            other => other,
        }
    }

    /// Cualquier fallo de escritura remota se reporta como PersistenceFailure
    pub fn into_persistence(self) -> Self {
        match self {
            AppError::PersistenceFailure(_) | AppError::Scan(_) => self,
            other => AppError::PersistenceFailure(other.to_string()),
        }
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => AppError::Parse(e.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<gloo_storage::errors::StorageError> for AppError {
    fn from(err: gloo_storage::errors::StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_are_not_blocking() {
        let err: AppError = ScanError::NoCodeConfigured(BasketType::Egg).into();
        assert!(!err.is_blocking());
        assert!(AppError::PersistenceFailure("timeout".into()).is_blocking());
        assert!(AppError::RouteDataMissing("lundi".into()).is_blocking());
    }

    #[test]
    fn not_found_becomes_route_missing() {
        let err = AppError::NotFound("Tournee/lundi".into()).into_route_missing();
        assert_eq!(err, AppError::RouteDataMissing("Tournee/lundi".into()));
        let net = AppError::Network("offline".into()).into_route_missing();
        assert_eq!(net, AppError::Network("offline".into()));
    }

    #[test]
    fn write_failures_become_persistence_failures() {
        let err = AppError::Network("HTTP 503".into()).into_persistence();
        assert!(matches!(err, AppError::PersistenceFailure(msg) if msg.contains("503")));
    }

    #[test]
    fn messages_are_operator_facing() {
        let err = ScanError::CodeMismatch { kind: BasketType::Familial, scanned: 999 };
        assert_eq!(err.to_string(), "Le QR code ne correspond pas au panier familial (lu: 999)");
        assert_eq!(
            ScanError::AlreadyComplete(BasketType::Simple).to_string(),
            "Tous les paniers simple ont déjà été validés"
        );
    }
}
