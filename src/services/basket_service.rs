// ============================================================================
// BASKET SERVICE - Consultas y escrituras de documentos Panier
// ============================================================================

use serde_json::json;
use crate::error::AppError;
use crate::models::{BasketOrder, BasketStatus};
use crate::services::firestore::FirestoreClient;
use crate::services::firestore_codec::Document;
use crate::services::firestore_query::StructuredQuery;

pub const PANIER_COLLECTION: &str = "Panier";

/// Paniers por entregar de un depósito (clave de dirección + día)
pub fn depot_orders_query(day: &str, address_key: &str) -> StructuredQuery {
    StructuredQuery::collection(PANIER_COLLECTION)
        .where_eq("tourneeid", day.trim().to_lowercase())
        .where_eq("adresse", address_key)
        .where_in(
            "statut",
            vec![BasketStatus::Pending.as_str(), BasketStatus::InProgress.as_str()],
        )
}

/// Todos los paniers de una ciudad para el día (recapitulativo)
pub fn city_orders_query(day: &str, city: &str) -> StructuredQuery {
    StructuredQuery::collection(PANIER_COLLECTION)
        .where_eq("ville", city)
        .where_eq("tourneeid", day.trim().to_lowercase())
}

/// Paniers ya entregados de un depósito
pub fn delivered_orders_query(day: &str, address_key: &str) -> StructuredQuery {
    StructuredQuery::collection(PANIER_COLLECTION)
        .where_eq("tourneeid", day.trim().to_lowercase())
        .where_eq("adresse", address_key)
        .where_eq("statut", BasketStatus::Delivered.as_str())
}

/// Documentos ilegibles se descartan con un aviso
pub fn orders_from_documents(docs: Vec<Document>) -> Vec<BasketOrder> {
    docs.into_iter()
        .filter_map(|doc| match BasketOrder::from_fields(&doc.id, doc.fields) {
            Ok(order) => Some(order),
            Err(e) => {
                log::warn!("⚠️ [BASKET] Panier {} ignoré: {}", doc.id, e);
                None
            }
        })
        .collect()
}

pub async fn fetch_orders(client: &FirestoreClient, query: &StructuredQuery) -> Result<Vec<BasketOrder>, AppError> {
    let docs = client.run_query(query).await?;
    let orders = orders_from_documents(docs);
    log::info!("📦 [BASKET] {} paniers chargés", orders.len());
    Ok(orders)
}

pub async fn fetch_depot_orders(client: &FirestoreClient, day: &str, address_key: &str) -> Result<Vec<BasketOrder>, AppError> {
    fetch_orders(client, &depot_orders_query(day, address_key)).await
}

pub async fn fetch_city_orders(client: &FirestoreClient, day: &str, city: &str) -> Result<Vec<BasketOrder>, AppError> {
    fetch_orders(client, &city_orders_query(day, city)).await
}

/// Actualiza `statut`; cualquier fallo se reporta como PersistenceFailure
pub async fn update_status(client: &FirestoreClient, order_id: &str, status: BasketStatus) -> Result<(), AppError> {
    let path = format!("{}/{}", PANIER_COLLECTION, order_id);
    client
        .update_fields(&path, &json!({ "statut": status.as_str() }))
        .await
        .map_err(AppError::into_persistence)?;
    log::info!("✅ [BASKET] Statut du panier {} mis à jour: {}", order_id, status);
    Ok(())
}

/// Llegada al depósito: "En cours" para los pendientes (sin bloquear si falla)
pub async fn mark_in_progress(client: &FirestoreClient, orders: &[BasketOrder]) -> usize {
    let mut updated = 0;
    for order in orders.iter().filter(|o| o.status == BasketStatus::Pending) {
        match update_status(client, &order.id, BasketStatus::InProgress).await {
            Ok(()) => updated += 1,
            Err(e) => log::warn!("⚠️ [BASKET] Statut En cours non enregistré pour {}: {}", order.id, e),
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn filter_fields(body: &Value) -> Vec<String> {
        body["structuredQuery"]["where"]["compositeFilter"]["filters"]
            .as_array()
            .map(|filters| {
                filters
                    .iter()
                    .map(|f| f["fieldFilter"]["field"]["fieldPath"].as_str().unwrap_or("").to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn depot_query_joins_on_address_key() {
        let body = depot_orders_query("Lundi", "adresse_2").to_body();
        assert_eq!(filter_fields(&body), vec!["tourneeid", "adresse", "statut"]);
        let filters = &body["structuredQuery"]["where"]["compositeFilter"]["filters"];
        assert_eq!(filters[0]["fieldFilter"]["value"]["stringValue"], "lundi");
        assert_eq!(filters[2]["fieldFilter"]["op"], "IN");
    }

    #[test]
    fn recap_query_filters_city_and_day() {
        let body = city_orders_query("mardi", "Lyon").to_body();
        assert_eq!(filter_fields(&body), vec!["ville", "tourneeid"]);
    }

    #[test]
    fn unreadable_documents_are_skipped() {
        let docs = vec![
            Document { id: "ok".into(), name: "x/ok".into(), fields: json!({ "panier": { "simple": 1 } }) },
            Document { id: "bad".into(), name: "x/bad".into(), fields: json!({ "panier": "oops" }) },
        ];
        let orders = orders_from_documents(docs);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "ok");
    }
}
