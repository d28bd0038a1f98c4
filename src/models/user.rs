use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::lenient;

/// Rol con el que se entra en la app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Client,
    Courier,
}

impl Role {
    /// Colección Firestore donde vive el perfil del rol
    pub fn collection(&self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Courier => "Livreur",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Role::Client => "Connexion Client",
            Role::Courier => "Connexion Livreur",
        }
    }

    /// Mensaje cuando la cuenta pertenece al otro rol
    pub fn wrong_entrance_message(&self) -> &'static str {
        match self {
            Role::Client => "Compte de livreur détecté. Vous ne pouvez pas accéder à cette section.",
            Role::Courier => "Compte client détecté. Vous ne pouvez pas accéder à cette section.",
        }
    }

    pub fn unknown_account_message(&self) -> &'static str {
        match self {
            Role::Client => "Compte non trouvé dans la collection Client.",
            Role::Courier => "Compte non trouvé dans la collection Livreur.",
        }
    }
}

/// Identidad devuelta por Identity Toolkit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Instante de expiración del ID token (ms desde epoch)
    pub expires_at_ms: f64,
}

impl AuthIdentity {
    /// Margen de un minuto antes de la expiración real
    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms + 60_000.0 >= self.expires_at_ms
    }
}

/// Sesión persistida: identidad + rol + id del documento de perfil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub identity: AuthIdentity,
    pub role: Role,
    pub profile_id: String,
}

/// Perfil de repartidor (`Livreur/{uid}`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourierProfile {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub prenom: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub email: String,
}

impl CourierProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

/// Perfil de cliente (`Client/{id}`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub prenom: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub email: String,
    #[serde(rename = "expoPushToken", default)]
    pub push_token: Option<String>,
    /// Claves de dirección ("adresse_N") de los paniers del cliente
    #[serde(default)]
    pub panier: Option<Value>,
}

impl ClientProfile {
    pub fn from_fields(id: &str, fields: Value) -> Result<Self, serde_json::Error> {
        let mut profile: ClientProfile = serde_json::from_value(fields)?;
        profile.id = id.to_string();
        profile.push_token = profile.push_token.filter(|t| !t.trim().is_empty());
        Ok(profile)
    }

    pub fn has_basket_at(&self, address_key: &str) -> bool {
        self.panier
            .as_ref()
            .and_then(Value::as_object)
            .map(|map| map.get(address_key).map(|v| !v.is_null()).unwrap_or(false))
            .unwrap_or(false)
    }

    pub fn display_name(&self) -> &str {
        if self.prenom.is_empty() { "Client" } else { &self.prenom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_expires_one_minute_early() {
        let identity = AuthIdentity {
            uid: "u1".into(),
            email: "a@b.fr".into(),
            id_token: "t".into(),
            refresh_token: "r".into(),
            expires_at_ms: 1_000_000.0,
        };
        assert!(!identity.is_expired(900_000.0));
        assert!(identity.is_expired(940_000.0));
    }

    #[test]
    fn client_profile_matches_basket_addresses() {
        let client = ClientProfile::from_fields("c1", json!({
            "email": "marie@exemple.fr",
            "prenom": "Marie",
            "expoPushToken": "ExponentPushToken[abc]",
            "panier": { "adresse_2": { "familial": 1 }, "adresse_9": null }
        })).unwrap();
        assert_eq!(client.id, "c1");
        assert!(client.has_basket_at("adresse_2"));
        assert!(!client.has_basket_at("adresse_9"));
        assert!(!client.has_basket_at("adresse_1"));
        assert_eq!(client.push_token.as_deref(), Some("ExponentPushToken[abc]"));
    }

    #[test]
    fn blank_push_token_is_ignored() {
        let client = ClientProfile::from_fields("c2", json!({ "expoPushToken": "  " })).unwrap();
        assert_eq!(client.push_token, None);
        assert_eq!(client.display_name(), "Client");
    }

    #[test]
    fn courier_name_is_trimmed() {
        let courier: CourierProfile = serde_json::from_value(json!({ "prenom": "Paul" })).unwrap();
        assert_eq!(courier.full_name(), "Paul");
        assert_eq!(Role::Courier.collection(), "Livreur");
    }
}
