// ============================================================================
// ROUTE SERVICE - Lectura de la tournée del día
// ============================================================================

use crate::error::AppError;
use crate::models::Route;
use crate::services::firestore::FirestoreClient;

pub fn tournee_path(day: &str) -> String {
    format!("Tournee/{}", day.trim().to_lowercase())
}

/// `Tournee/{jour}`; documento ausente → RouteDataMissing
pub async fn fetch_route(client: &FirestoreClient, day: &str) -> Result<Route, AppError> {
    let path = tournee_path(day);
    log::info!("🗺️ [ROUTE] Chargement de {}", path);

    let doc = client
        .get_document(&path)
        .await
        .map_err(AppError::into_route_missing)?
        .ok_or_else(|| AppError::RouteDataMissing(format!("Tournée {} introuvable", day)))?;

    let route = Route::from_fields(day, &doc.fields)?;
    log::info!(
        "✅ [ROUTE] Tournée {}: {} villes, {} dépôts",
        route.day,
        route.cities.len(),
        route.depot_count()
    );
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_is_lowercased() {
        assert_eq!(tournee_path(" Lundi "), "Tournee/lundi");
    }
}
