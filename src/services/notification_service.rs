// ============================================================================
// NOTIFICATION SERVICE - Push Expo + historial en Firestore
// ============================================================================
// Los envíos son best-effort: los fallos se registran y nunca bloquean
// el flujo de entrega.
// ============================================================================

use std::collections::HashSet;
use gloo_net::http::Request;
use serde_json::json;
use crate::config::CONFIG;
use crate::error::AppError;
use crate::models::notification::sort_newest_first;
use crate::models::{BasketOrder, ClientProfile, NotificationRecord, PushMessage};
use crate::services::basket_service::{delivered_orders_query, fetch_orders};
use crate::services::firestore::FirestoreClient;
use crate::services::firestore_codec::{encode_fields, timestamp_value};
use crate::services::firestore_query::StructuredQuery;

pub const NOTIFICATIONS_COLLECTION: &str = "Notifications";
const CLIENT_COLLECTION: &str = "Client";
const HISTORY_LIMIT: u32 = 100;

/// Envía un push; si lleva `clientId` lo guarda en el historial
pub async fn send_push(client: &FirestoreClient, message: &PushMessage) {
    let sent = Request::post(&CONFIG.expo_push_url)
        .header("Accept", "application/json")
        .json(message)
        .map_err(AppError::from);
    let result = match sent {
        Ok(request) => request.send().await.map_err(AppError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(response) if response.ok() => log::info!("📨 [PUSH] Notification envoyée à {}", message.to),
        Ok(response) => log::warn!("⚠️ [PUSH] Relais push HTTP {}", response.status()),
        Err(e) => {
            log::error!("❌ [PUSH] Erreur d'envoi: {}", e);
            return;
        }
    }

    if let Some(client_id) = message.client_id() {
        if let Err(e) = record_notification(client, message, client_id).await {
            log::error!("❌ [PUSH] Historique non enregistré: {}", e);
        }
    }
}

/// `Notifications/{uuid}` con {clientId, title, body, data, timestamp}
pub async fn record_notification(client: &FirestoreClient, message: &PushMessage, client_id: &str) -> Result<String, AppError> {
    let id = format!("notification_{}", uuid::Uuid::new_v4().simple());
    let record = NotificationRecord::from_message(&id, message, client_id, chrono::Utc::now());
    client
        .set_document(&format!("{}/{}", NOTIFICATIONS_COLLECTION, id), &record_fields(&record))
        .await?;
    log::info!("💾 [PUSH] Notification {} enregistrée", id);
    Ok(id)
}

/// Campos tipados; el timestamp va como timestampValue
pub fn record_fields(record: &NotificationRecord) -> serde_json::Value {
    let mut fields = encode_fields(&json!({
        "clientId": record.client_id,
        "title": record.title,
        "body": record.body,
        "data": record.data,
    }));
    if let Some(at) = record.timestamp {
        fields["timestamp"] = timestamp_value(at);
    }
    fields
}

/// Un aviso por cliente con panier en la dirección de un pedido entregado
pub fn delivery_messages(
    delivered: &[BasketOrder],
    clients: &[ClientProfile],
    depot_label: &str,
    city: &str,
) -> Vec<PushMessage> {
    let mut notified = HashSet::new();
    let mut messages = Vec::new();
    for order in delivered {
        if order.address_key.is_empty() {
            log::warn!("⚠️ [PUSH] Panier {} sans adresse", order.id);
            continue;
        }
        for client in clients.iter().filter(|c| c.has_basket_at(&order.address_key)) {
            let Some(token) = client.push_token.as_deref() else {
                log::info!("⚠️ [PUSH] Pas de jeton push pour {}", client.email);
                continue;
            };
            if notified.insert(client.id.clone()) {
                messages.push(PushMessage::delivery(token, depot_label, city, &order.id, &client.id));
            }
        }
    }
    messages
}

pub async fn fetch_clients(client: &FirestoreClient) -> Result<Vec<ClientProfile>, AppError> {
    let docs = client.run_query(&StructuredQuery::collection(CLIENT_COLLECTION)).await?;
    Ok(docs
        .into_iter()
        .filter_map(|doc| ClientProfile::from_fields(&doc.id, doc.fields).ok())
        .collect())
}

/// Avisos de entrega de un depósito; devuelve cuántos se enviaron
pub async fn send_delivery_notifications(
    client: &FirestoreClient,
    address_key: &str,
    depot_label: &str,
    day: &str,
    city: &str,
) -> usize {
    log::info!("🔔 [PUSH] Notifications du dépôt {} ({}) à {}", depot_label, day, city);

    let delivered = match fetch_orders(client, &delivered_orders_query(day, address_key)).await {
        Ok(orders) if orders.is_empty() => {
            log::info!("[PUSH] Aucun panier livré pour ce dépôt");
            return 0;
        }
        Ok(orders) => orders,
        Err(e) => {
            log::error!("❌ [PUSH] Paniers livrés illisibles: {}", e);
            return 0;
        }
    };
    let clients = match fetch_clients(client).await {
        Ok(clients) => clients,
        Err(e) => {
            log::error!("❌ [PUSH] Clients illisibles: {}", e);
            return 0;
        }
    };

    let messages = delivery_messages(&delivered, &clients, depot_label, city);
    for message in &messages {
        send_push(client, message).await;
    }
    log::info!("🎉 [PUSH] {} notifications envoyées", messages.len());
    messages.len()
}

/// Guarda el token push en `Client/{id}` si el documento existe
pub async fn register_push_token(client: &FirestoreClient, client_id: &str, token: &str) -> Result<bool, AppError> {
    let path = format!("{}/{}", CLIENT_COLLECTION, client_id);
    if client.get_document(&path).await?.is_none() {
        log::error!("❌ [PUSH] Client {} introuvable, jeton non enregistré", client_id);
        return Ok(false);
    }
    client.update_fields(&path, &json!({ "expoPushToken": token })).await?;
    log::info!("✅ [PUSH] Jeton enregistré pour {}", client_id);
    Ok(true)
}

pub fn history_query(client_id: &str) -> StructuredQuery {
    StructuredQuery::collection(NOTIFICATIONS_COLLECTION)
        .where_eq("clientId", client_id)
        .order_by_desc("timestamp")
        .limit(HISTORY_LIMIT)
}

/// Historial del cliente, más recientes primero
pub async fn fetch_history(client: &FirestoreClient, client_id: &str) -> Result<Vec<NotificationRecord>, AppError> {
    let docs = client.run_query(&history_query(client_id)).await?;
    let mut records: Vec<NotificationRecord> = docs
        .into_iter()
        .filter_map(|doc| NotificationRecord::from_fields(&doc.id, doc.fields).ok())
        .collect();
    sort_newest_first(&mut records);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn delivered(id: &str, key: &str) -> BasketOrder {
        BasketOrder::from_fields(id, json!({ "adresse": key, "statut": "Livré", "panier": { "simple": 1 } })).unwrap()
    }

    fn client(id: &str, token: Option<&str>, keys: &[&str]) -> ClientProfile {
        let panier: serde_json::Map<String, serde_json::Value> =
            keys.iter().map(|k| (k.to_string(), json!({ "simple": 1 }))).collect();
        ClientProfile::from_fields(id, json!({
            "email": format!("{}@exemple.fr", id),
            "expoPushToken": token,
            "panier": panier,
        }))
        .unwrap()
    }

    #[test]
    fn one_message_per_client_with_a_token() {
        let orders = vec![delivered("p1", "adresse_1"), delivered("p2", "adresse_1"), delivered("p3", "")];
        let clients = vec![
            client("c1", Some("tok1"), &["adresse_1"]),
            client("c2", None, &["adresse_1"]),
            client("c3", Some("tok3"), &["adresse_2"]),
        ];
        let messages = delivery_messages(&orders, &clients, "12", "Lyon");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].to, "tok1");
        assert_eq!(messages[0].data["panierID"], "p1");
        assert_eq!(messages[0].client_id(), Some("c1"));
    }

    #[test]
    fn record_fields_use_typed_timestamp() {
        let msg = PushMessage::delivery("t", "7", "Bron", "p9", "c4");
        let at = chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let record = NotificationRecord::from_message("n1", &msg, "c4", at);
        let fields = record_fields(&record);
        assert_eq!(fields["clientId"], json!({ "stringValue": "c4" }));
        assert_eq!(fields["timestamp"], json!({ "timestampValue": "2023-11-14T22:13:20.000Z" }));
        assert_eq!(fields["data"]["mapValue"]["fields"]["type"], json!({ "stringValue": "delivery_completed" }));
    }

    #[test]
    fn history_is_newest_first_for_one_client() {
        let body = history_query("c1").to_body();
        assert_eq!(body["structuredQuery"]["where"]["fieldFilter"]["field"]["fieldPath"], "clientId");
        assert_eq!(body["structuredQuery"]["orderBy"][0]["direction"], "DESCENDING");
    }
}
