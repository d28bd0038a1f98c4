// ============================================================================
// AUTH SERVICE - Firebase Identity Toolkit + búsqueda de rol en Firestore
// ============================================================================

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use crate::config::CONFIG;
use crate::error::AppError;
use crate::models::{AuthIdentity, CourierProfile, Role, UserSession};
use crate::services::firestore::FirestoreClient;
use crate::services::firestore_query::StructuredQuery;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

/// Respuesta de securetoken (snake_case)
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct FirebaseErrorBody {
    error: FirebaseErrorDetail,
}

#[derive(Deserialize)]
struct FirebaseErrorDetail {
    message: String,
}

fn expires_at(now_ms: f64, expires_in: &str) -> f64 {
    let seconds = expires_in.trim().parse::<f64>().unwrap_or(3600.0);
    now_ms + seconds * 1000.0
}

/// Códigos de error de Identity Toolkit → mensaje para el usuario
pub fn auth_error_message(code: &str) -> String {
    // "TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account..." → primer token
    let code = code.split(|c: char| c == ' ' || c == ':').next().unwrap_or(code);
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Email ou mot de passe incorrect".to_string()
        }
        "INVALID_EMAIL" => "Adresse email invalide".to_string(),
        "MISSING_PASSWORD" => "Mot de passe manquant".to_string(),
        "USER_DISABLED" => "Ce compte a été désactivé".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Trop de tentatives, réessayez plus tard".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" => "Session expirée, reconnectez-vous".to_string(),
        other => other.to_string(),
    }
}

async fn auth_failure(response: gloo_net::http::Response) -> AppError {
    let status = response.status();
    match response.json::<FirebaseErrorBody>().await {
        Ok(body) => AppError::Auth(auth_error_message(&body.error.message)),
        Err(_) => AppError::Auth(format!("HTTP {}", status)),
    }
}

/// Login con email/contraseña
pub async fn sign_in(email: &str, password: &str, now_ms: f64) -> Result<AuthIdentity, AppError> {
    log::info!("🔐 [AUTH] Connexion de {}", email);
    let body = SignInRequest {
        email: email.trim(),
        password,
        return_secure_token: true,
    };

    let response = Request::post(&CONFIG.sign_in_url())
        .json(&body)?
        .send()
        .await?;
    if !response.ok() {
        let err = auth_failure(response).await;
        log::warn!("❌ [AUTH] {}", err);
        return Err(err);
    }

    let data: SignInResponse = response.json().await?;
    Ok(AuthIdentity {
        uid: data.local_id,
        email: data.email.unwrap_or_else(|| email.trim().to_string()),
        id_token: data.id_token,
        refresh_token: data.refresh_token,
        expires_at_ms: expires_at(now_ms, &data.expires_in),
    })
}

/// Renueva el ID token con el refresh token
pub async fn refresh(identity: &AuthIdentity, now_ms: f64) -> Result<AuthIdentity, AppError> {
    log::info!("🔄 [AUTH] Renouvellement du jeton");
    let form = format!("grant_type=refresh_token&refresh_token={}", identity.refresh_token);

    let response = Request::post(&CONFIG.refresh_url())
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form)?
        .send()
        .await?;
    if !response.ok() {
        return Err(auth_failure(response).await);
    }

    let data: RefreshResponse = response.json().await?;
    Ok(AuthIdentity {
        uid: data.user_id.unwrap_or_else(|| identity.uid.clone()),
        email: identity.email.clone(),
        id_token: data.id_token,
        refresh_token: data.refresh_token,
        expires_at_ms: expires_at(now_ms, &data.expires_in),
    })
}

/// Identidad con token válido (renueva si hace falta)
pub async fn ensure_fresh(identity: &AuthIdentity, now_ms: f64) -> Result<AuthIdentity, AppError> {
    if identity.is_expired(now_ms) {
        refresh(identity, now_ms).await
    } else {
        Ok(identity.clone())
    }
}

/// Id del primer documento de `role.collection()` con ese email
async fn find_profile_id(client: &FirestoreClient, role: Role, email: &str) -> Result<Option<String>, AppError> {
    let query = StructuredQuery::collection(role.collection())
        .where_eq("email", email)
        .limit(1);
    let docs = client.run_query(&query).await?;
    Ok(docs.into_iter().next().map(|d| d.id))
}

/// Decide si la cuenta puede entrar por la puerta elegida
pub fn check_entrance(expected: Role, own_profile: Option<String>, other_role_found: bool) -> Result<String, AppError> {
    match own_profile {
        Some(id) => Ok(id),
        None if other_role_found => Err(AppError::AccessDenied(expected.wrong_entrance_message().to_string())),
        None => Err(AppError::AccessDenied(expected.unknown_account_message().to_string())),
    }
}

fn other_role(role: Role) -> Role {
    match role {
        Role::Client => Role::Courier,
        Role::Courier => Role::Client,
    }
}

/// Login completo para un rol: auth + comprobación de rol en Firestore.
/// Una cuenta del otro rol (o desconocida) no obtiene sesión.
pub async fn login(role: Role, email: &str, password: &str, now_ms: f64) -> Result<UserSession, AppError> {
    let identity = sign_in(email, password, now_ms).await?;
    let client = FirestoreClient::new(Some(identity.id_token.clone()));

    let own = find_profile_id(&client, role, &identity.email).await?;
    let other_found = match own {
        Some(_) => false,
        None => find_profile_id(&client, other_role(role), &identity.email).await?.is_some(),
    };

    match check_entrance(role, own, other_found) {
        Ok(profile_id) => {
            log::info!("✅ [AUTH] {} connecté ({:?}, profil {})", identity.email, role, profile_id);
            Ok(UserSession { identity, role, profile_id })
        }
        Err(err) => {
            log::warn!("⛔ [AUTH] Accès refusé pour {}: {}", identity.email, err);
            Err(err)
        }
    }
}

/// Perfil del repartidor: `Livreur/{uid}`, o el documento encontrado por email
pub async fn fetch_courier_profile(session: &UserSession) -> Result<Option<CourierProfile>, AppError> {
    let client = FirestoreClient::new(Some(session.identity.id_token.clone()));
    let doc = match client.get_document(&format!("Livreur/{}", session.identity.uid)).await? {
        Some(doc) => Some(doc),
        None if session.profile_id != session.identity.uid => {
            client.get_document(&format!("Livreur/{}", session.profile_id)).await?
        }
        None => None,
    };
    match doc {
        Some(doc) => Ok(Some(serde_json::from_value(doc.fields)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_identity_toolkit_codes() {
        assert_eq!(auth_error_message("INVALID_LOGIN_CREDENTIALS"), "Email ou mot de passe incorrect");
        assert_eq!(
            auth_error_message("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"),
            "Trop de tentatives, réessayez plus tard"
        );
        assert_eq!(auth_error_message("WEIRD_CODE"), "WEIRD_CODE");
    }

    #[test]
    fn expiry_is_relative_to_now() {
        assert_eq!(expires_at(1_000.0, "3600"), 3_601_000.0);
        assert_eq!(expires_at(0.0, "garbage"), 3_600_000.0);
    }

    #[test]
    fn entrance_is_symmetric() {
        assert_eq!(check_entrance(Role::Client, Some("c1".into()), false), Ok("c1".to_string()));
        assert_eq!(
            check_entrance(Role::Client, None, true),
            Err(AppError::AccessDenied(Role::Client.wrong_entrance_message().into()))
        );
        assert_eq!(
            check_entrance(Role::Courier, None, true),
            Err(AppError::AccessDenied(Role::Courier.wrong_entrance_message().into()))
        );
        assert_eq!(
            check_entrance(Role::Courier, None, false),
            Err(AppError::AccessDenied(Role::Courier.unknown_account_message().into()))
        );
    }

    #[test]
    fn sign_in_response_shape() {
        let data: SignInResponse = serde_json::from_value(serde_json::json!({
            "localId": "uid1",
            "email": "a@b.fr",
            "idToken": "id",
            "refreshToken": "rt",
            "expiresIn": "3600",
            "registered": true
        }))
        .unwrap();
        assert_eq!(data.local_id, "uid1");
        assert_eq!(data.expires_in, "3600");
    }
}
