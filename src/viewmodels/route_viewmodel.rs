// ============================================================================
// ROUTE VIEWMODEL - Tournée del día y récapitulatif de ciudad
// ============================================================================

use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use crate::error::AppError;
use crate::models::{basket::totals, BasketOrder, BasketStatus, BasketType, Route};
use crate::services::{basket_service, route_service, OfflineService};
use crate::state::{AppState, BlockingAlert, Screen};
use crate::viewmodels::auth_viewmodel::authorized_client;

/// Línea del récapitulatif: "3 Paniers Familiaux"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecapLine {
    pub kind: BasketType,
    pub quantity: u32,
    pub label: String,
}

/// Totales por tipo, solo los que tienen cantidad
pub fn recap_lines(orders: &[BasketOrder]) -> Vec<RecapLine> {
    let counts = totals(orders);
    BasketType::ALL
        .iter()
        .map(|&kind| (kind, counts.get(kind)))
        .filter(|(_, quantity)| *quantity > 0)
        .map(|(kind, quantity)| RecapLine {
            kind,
            quantity,
            label: kind.label(quantity),
        })
        .collect()
}

/// Número de pedidos en cada estado
pub fn status_summary(orders: &[BasketOrder]) -> Vec<(BasketStatus, usize)> {
    BasketStatus::ALL
        .iter()
        .map(|&status| (status, orders.iter().filter(|o| o.status == status).count()))
        .collect()
}

pub struct RouteViewModel;

impl RouteViewModel {
    /// Tournée del día seleccionado (cacheada en el estado)
    pub async fn load_route(state: &AppState) -> Result<Route, AppError> {
        let day = state.route.get_day();
        if let Some(route) = state.route.get_route().filter(|r| r.day == day) {
            return Ok(route);
        }
        let client = authorized_client(&state.auth).await?;
        let route = route_service::fetch_route(&client, &day).await?;
        if !route.active {
            log::warn!("⚠️ [ROUTE] La tournée du {} est marquée inactive", day);
        }
        state.route.set_route(Some(route.clone()));
        Ok(route)
    }

    /// Carga en segundo plano; un fallo abre la alerta con "Réessayer"
    pub fn refresh_route(state: &AppState) {
        let state = state.clone();
        state.set_loading(true);
        spawn_local(async move {
            let result = Self::load_route(&state).await;
            state.set_loading(false);
            match result {
                Ok(route) => {
                    log::info!("🗺️ [ROUTE] {} villes, {} dépôts", route.cities.len(), route.depot_count());
                    state.notify_subscribers();
                }
                Err(e) => Self::show_route_error(&state, e),
            }
        });
    }

    pub fn change_day(state: &AppState, day: &str) {
        state.route.set_day(day);
        if let Err(e) = OfflineService::new().save_last_day(day) {
            log::warn!("⚠️ [ROUTE] Jour non mémorisé: {}", e);
        }
        Self::refresh_route(state);
    }

    /// Paniers de la ciudad para el récapitulatif
    pub fn load_recap(state: &AppState, day: &str, city: &str) {
        let state = state.clone();
        let (day, city) = (day.to_string(), city.to_string());
        state.set_loading(true);
        state.route.set_recap_orders(Vec::new());
        spawn_local(async move {
            let result = match authorized_client(&state.auth).await {
                Ok(client) => basket_service::fetch_city_orders(&client, &day, &city).await,
                Err(e) => Err(e),
            };
            state.set_loading(false);
            match result {
                Ok(orders) => {
                    log::info!("📋 [ROUTE] Récapitulatif {}: {} paniers", city, orders.len());
                    state.route.set_recap_orders(orders);
                    state.notify_subscribers();
                }
                Err(e) => {
                    let retry_state = state.clone();
                    let alert = BlockingAlert::from_error(&e, Screen::CourierHome).with_retry(Rc::new(move || {
                        Self::load_recap(&retry_state, &day, &city)
                    }));
                    state.show_alert(alert);
                }
            }
        });
    }

    /// Cambio manual del estado de un panier desde el récapitulatif
    pub fn change_status(state: &AppState, order_id: &str, status: BasketStatus) {
        let state = state.clone();
        let order_id = order_id.to_string();
        spawn_local(async move {
            let result = match authorized_client(&state.auth).await {
                Ok(client) => basket_service::update_status(&client, &order_id, status).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    for order in state.route.recap_orders.borrow_mut().iter_mut() {
                        if order.id == order_id {
                            order.status = status;
                        }
                    }
                    state.set_toast(Some(format!("Statut mis à jour: {}", status)));
                    state.notify_subscribers();
                }
                Err(e) => {
                    let back_to = state.get_screen();
                    let retry_state = state.clone();
                    let alert = BlockingAlert::from_error(&e, back_to).with_retry(Rc::new(move || {
                        Self::change_status(&retry_state, &order_id, status)
                    }));
                    state.show_alert(alert);
                }
            }
        });
    }

    fn show_route_error(state: &AppState, error: AppError) {
        let error = error.into_route_missing();
        let retry_state = state.clone();
        let alert = BlockingAlert::from_error(&error, Screen::CourierHome)
            .with_retry(Rc::new(move || Self::refresh_route(&retry_state)));
        state.show_alert(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(id: &str, familial: u32, oeuf: u32, statut: &str) -> BasketOrder {
        BasketOrder::from_fields(
            id,
            json!({ "panier": { "familial": familial, "oeuf": oeuf }, "statut": statut, "ville": "Lyon" }),
        )
        .unwrap()
    }

    #[test]
    fn recap_lists_only_present_types() {
        let orders = vec![order("p1", 2, 0, "En attente"), order("p2", 1, 1, "Livré")];
        let lines = recap_lines(&orders);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].kind, BasketType::Familial);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[1].label, "1 Boîte d'Œufs");
        assert!(recap_lines(&[]).is_empty());
    }

    #[test]
    fn status_summary_counts_every_status() {
        let orders = vec![order("p1", 1, 0, "En attente"), order("p2", 1, 0, "Livré"), order("p3", 1, 0, "Livré")];
        assert_eq!(
            status_summary(&orders),
            vec![
                (BasketStatus::Pending, 1),
                (BasketStatus::InProgress, 0),
                (BasketStatus::Delivered, 2),
            ]
        );
    }
}
