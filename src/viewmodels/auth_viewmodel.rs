// ============================================================================
// AUTH VIEWMODEL - LÓGICA DE SESIÓN
// ============================================================================
// Login por rol, restauración de la sesión guardada y logout.
// Devuelve valores; las vistas actualizan el estado.
// ============================================================================

use wasm_bindgen_futures::spawn_local;
use crate::error::AppError;
use crate::models::{CourierProfile, Role, UserSession};
use crate::services::{auth_service, FirestoreClient, OfflineService};
use crate::state::{AppState, AuthState, Screen};
use crate::utils::now_ms;
use crate::viewmodels::{ClientViewModel, RouteViewModel};

/// Campos obligatorios del formulario
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Auth("Veuillez remplir tous les champs".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Auth("Adresse email invalide".to_string()));
    }
    Ok(())
}

/// ViewModel de autenticación - SOLO lógica de negocio
pub struct AuthViewModel {
    offline_service: OfflineService,
}

impl AuthViewModel {
    pub fn new() -> Self {
        Self {
            offline_service: OfflineService::new(),
        }
    }

    /// Login por la puerta de `role` y persistencia de la sesión
    pub async fn login(&self, role: Role, email: &str, password: &str) -> Result<UserSession, AppError> {
        validate_credentials(email, password)?;
        let session = auth_service::login(role, email, password, now_ms()).await?;

        if let Err(e) = self.offline_service.save_session(&session) {
            log::error!("❌ [AUTH] Session non enregistrée: {}", e);
        }
        Ok(session)
    }

    /// Sesión guardada en localStorage, si existe y es legible
    pub fn restore(&self) -> Option<UserSession> {
        match self.offline_service.load_session() {
            Ok(session) => session,
            Err(e) => {
                log::warn!("⚠️ [AUTH] Session enregistrée illisible: {}", e);
                self.offline_service.clear_session();
                None
            }
        }
    }

    pub async fn courier_profile(&self, session: &UserSession) -> Result<Option<CourierProfile>, AppError> {
        auth_service::fetch_courier_profile(session).await
    }

    /// Instala la sesión y lanza la carga inicial del rol
    pub fn start_session(&self, state: &AppState, session: UserSession) {
        let role = session.role;
        state.auth.set_session(Some(session));
        state.auth.clear_form();
        *state.screen.borrow_mut() = Screen::home(role);

        match role {
            Role::Courier => {
                RouteViewModel::refresh_route(state);
                let state = state.clone();
                spawn_local(async move {
                    // Renueva el token antes de leer el perfil
                    if let Err(e) = authorized_client(&state.auth).await {
                        log::warn!("⚠️ [AUTH] {}", e);
                        return;
                    }
                    let Some(session) = state.auth.get_session() else {
                        return;
                    };
                    match AuthViewModel::new().courier_profile(&session).await {
                        Ok(profile) => {
                            state.auth.set_courier_profile(profile);
                            state.notify_subscribers();
                        }
                        Err(e) => log::warn!("⚠️ [AUTH] Profil livreur indisponible: {}", e),
                    }
                });
            }
            Role::Client => ClientViewModel::enter(state),
        }
        state.notify_subscribers();
    }

    /// Cierra sesión: cancela el seguimiento de notificaciones y borra todo
    pub fn logout(&self, state: &AppState) {
        log::info!("👋 [AUTH] Déconnexion");
        state.client.cancel_subscription();
        self.offline_service.clear_session();
        state.reset();
        state.notify_subscribers();
    }
}

impl Default for AuthViewModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Estado de la sesión al volver de una renovación de jeton
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCheck {
    /// La sesión leída antes de renovar sigue activa
    Unchanged,
    /// Mismo usuario, pero otra petición (o un nuevo login) ya guardó otros jetons
    Replaced(UserSession),
    /// Logout o cambio de usuario durante la espera
    Closed,
}

pub fn check_session(current: Option<&UserSession>, original: &UserSession) -> SessionCheck {
    match current {
        Some(current)
            if current.identity.uid == original.identity.uid
                && current.identity.refresh_token == original.identity.refresh_token =>
        {
            SessionCheck::Unchanged
        }
        Some(current) if current.identity.uid == original.identity.uid => SessionCheck::Replaced(current.clone()),
        _ => SessionCheck::Closed,
    }
}

/// Cliente Firestore con un ID token vigente (renueva y guarda si expiró)
pub async fn authorized_client(auth: &AuthState) -> Result<FirestoreClient, AppError> {
    let session = auth
        .get_session()
        .ok_or_else(|| AppError::Auth("Session expirée, reconnectez-vous".to_string()))?;

    let identity = auth_service::ensure_fresh(&session.identity, now_ms()).await?;

    // La sesión puede haber cambiado durante la espera: nunca se resucita un logout
    match check_session(auth.get_session().as_ref(), &session) {
        SessionCheck::Unchanged => {}
        SessionCheck::Replaced(current) => {
            log::debug!("[AUTH] Jeton déjà renouvelé ailleurs");
            return Ok(FirestoreClient::new(Some(current.identity.id_token)));
        }
        SessionCheck::Closed => {
            log::warn!("⚠️ [AUTH] Session fermée pendant le renouvellement du jeton");
            return Err(AppError::Auth("Session fermée, reconnectez-vous".to_string()));
        }
    }

    if identity != session.identity {
        let refreshed = UserSession {
            identity: identity.clone(),
            ..session
        };
        if let Err(e) = OfflineService::new().save_session(&refreshed) {
            log::warn!("⚠️ [AUTH] Jeton renouvelé non enregistré: {}", e);
        }
        auth.set_session(Some(refreshed));
    }
    Ok(FirestoreClient::new(Some(identity.id_token)))
}
