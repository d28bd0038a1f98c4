// ============================================================================
// CLIENT VIEWMODEL - Accueil client: perfil, token push e historial
// ============================================================================

use wasm_bindgen_futures::spawn_local;
use crate::config::CONFIG;
use crate::error::AppError;
use crate::models::{ClientProfile, NotificationRecord, UserSession};
use crate::services::{notification_service, FirestoreClient};
use crate::state::{AppState, NotificationSubscription};
use crate::utils::push_ffi::request_push_token;
use crate::viewmodels::auth_viewmodel::authorized_client;

/// Número de avisos de entrega en el historial
pub fn delivered_count(records: &[NotificationRecord]) -> usize {
    records
        .iter()
        .filter(|r| r.data.get("type").and_then(|t| t.as_str()) == Some(crate::models::notification::DELIVERY_KIND))
        .count()
}

/// El historial solo se guarda si su dueño sigue conectado
pub fn history_still_owned(current: Option<&UserSession>, profile_id: &str) -> bool {
    current.map(|s| s.profile_id == profile_id).unwrap_or(false)
}

pub struct ClientViewModel;

impl ClientViewModel {
    async fn load_profile(client: &FirestoreClient, profile_id: &str) -> Result<Option<ClientProfile>, AppError> {
        let doc = client.get_document(&format!("Client/{}", profile_id)).await?;
        match doc {
            Some(doc) => Ok(Some(ClientProfile::from_fields(&doc.id, doc.fields)?)),
            None => Ok(None),
        }
    }

    /// Entrada en el accueil: perfil, registro push, historial y sondeo
    pub fn enter(state: &AppState) {
        let Some(session) = state.auth.get_session() else {
            return;
        };
        Self::start_polling(state);
        if state.client.get_profile().is_some() {
            return;
        }

        let state = state.clone();
        spawn_local(async move {
            let client = match authorized_client(&state.auth).await {
                Ok(client) => client,
                Err(e) => {
                    log::error!("❌ [CLIENT] {}", e);
                    return;
                }
            };

            match Self::load_profile(&client, &session.profile_id).await {
                Ok(profile) => state.client.set_profile(profile),
                Err(e) => log::error!("❌ [CLIENT] Profil illisible: {}", e),
            }
            state.notify_subscribers();

            if !state.client.get_push_registered() {
                Self::register_push(&state, &client, &session.profile_id).await;
            }
            Self::refresh_history(&state).await;
        });
    }

    async fn register_push(state: &AppState, client: &FirestoreClient, client_id: &str) {
        let Some(token) = request_push_token().await else {
            log::info!("[PUSH] Pas de jeton push disponible sur cet appareil");
            return;
        };
        match notification_service::register_push_token(client, client_id, &token).await {
            Ok(registered) => state.client.set_push_registered(registered),
            Err(e) => log::error!("❌ [PUSH] Jeton non enregistré: {}", e),
        }
    }

    /// Relee el historial; solo re-renderiza si cambió
    pub async fn refresh_history(state: &AppState) {
        let Some(session) = state.auth.get_session() else {
            return;
        };
        let result = match authorized_client(&state.auth).await {
            Ok(client) => notification_service::fetch_history(&client, &session.profile_id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) if !history_still_owned(state.auth.get_session().as_ref(), &session.profile_id) => {
                log::debug!("[CLIENT] Historique ignoré: session fermée");
            }
            Ok(records) => {
                if state.client.set_notifications(records) {
                    log::info!("🔔 [CLIENT] Historique mis à jour");
                    state.notify_subscribers();
                }
            }
            Err(e) => log::warn!("⚠️ [CLIENT] Historique indisponible: {}", e),
        }
    }

    /// Sondeo periódico del historial, propiedad del estado del cliente
    pub fn start_polling(state: &AppState) {
        if state.client.is_subscribed() {
            return;
        }
        let tick_state = state.clone();
        let subscription = NotificationSubscription::start(CONFIG.notification_poll_seconds, move || {
            if !tick_state.auth.is_logged_in() {
                return;
            }
            let state = tick_state.clone();
            spawn_local(async move {
                Self::refresh_history(&state).await;
            });
        });
        state.client.set_subscription(subscription);
    }
}
