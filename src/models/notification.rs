use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use chrono::{DateTime, Utc};

pub const DELIVERY_TITLE: &str = "Votre panier a été livré!";
pub const DELIVERY_KIND: &str = "delivery_completed";

/// Mensaje enviado al relay de push de Expo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub sound: &'static str,
    pub title: String,
    pub body: String,
    pub data: Value,
}

impl PushMessage {
    pub fn new(token: &str, title: &str, body: &str, data: Value) -> Self {
        Self {
            to: token.to_string(),
            sound: "default",
            title: title.to_string(),
            body: body.to_string(),
            data: if data.is_null() { json!({}) } else { data },
        }
    }

    /// Aviso de entrega de un panier a un cliente
    pub fn delivery(token: &str, depot_label: &str, city: &str, basket_id: &str, client_id: &str) -> Self {
        Self::new(
            token,
            DELIVERY_TITLE,
            &format!("Votre panier a été livré au dépôt {} à {}", depot_label, city),
            json!({
                "type": DELIVERY_KIND,
                "panierID": basket_id,
                "clientId": client_id,
            }),
        )
    }

    /// Cliente destinatario, si el mensaje lleva uno en `data.clientId`
    pub fn client_id(&self) -> Option<&str> {
        self.data.get("clientId").and_then(Value::as_str).filter(|id| !id.is_empty())
    }
}

/// Entrada del historial (`Notifications/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NotificationRecord {
    pub fn from_message(id: &str, message: &PushMessage, client_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            client_id: client_id.to_string(),
            title: message.title.clone(),
            body: message.body.clone(),
            data: message.data.clone(),
            timestamp: Some(now),
        }
    }

    pub fn from_fields(id: &str, fields: Value) -> Result<Self, serde_json::Error> {
        let mut record: NotificationRecord = serde_json::from_value(fields)?;
        record.id = id.to_string();
        Ok(record)
    }

    /// Campos a escribir en Firestore (sin el id, que es la clave del documento)
    pub fn to_fields(&self) -> Value {
        json!({
            "clientId": self.client_id,
            "title": self.title,
            "body": self.body,
            "data": self.data,
            "timestamp": self.timestamp.map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        })
    }

    pub fn time_label(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M").to_string(),
            None => "Date inconnue".to_string(),
        }
    }
}

/// Más recientes primero; sin fecha al final
pub fn sort_newest_first(records: &mut [NotificationRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
