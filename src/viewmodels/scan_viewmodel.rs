// ============================================================================
// SCAN VIEWMODEL - Llegada al depósito, validación de paniers y cierre
// ============================================================================
// Llegada (QR del depósito) → "En cours" → escaneo por pedido → "Livré"
// guardado uno a uno → notificaciones → depósito siguiente.
// Un pedido solo pasa a entregado localmente cuando la escritura ha ido bien.
// ============================================================================

use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use crate::config::CONFIG;
use crate::error::AppError;
use crate::models::{route::find_by_address_key, route::find_by_depot_number, BasketStatus, BasketType, DepotStop};
use crate::scan::{DepotCheck, DepotDelivery, DepotOutcome, ScanOutcome};
use crate::services::{basket_service, notification_service};
use crate::state::{AppState, BlockingAlert, ScanMessage, ScanTarget, Screen};
use crate::utils::{barcode_ffi, now_ms};
use crate::viewmodels::auth_viewmodel::authorized_client;

/// Qué queda por hacer tras guardar un pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepotProgress {
    /// Quedan pedidos por escanear o guardar
    InProgress,
    /// Todos escaneados y guardados
    Complete,
}

/// Lectura del escáner para el pedido activo
pub fn apply_basket_payload(delivery: &mut DepotDelivery, payload: &str, now_ms: f64) -> ScanOutcome {
    match delivery.current_mut() {
        Some(progress) => progress.validator.scan(payload, now_ms),
        None => ScanOutcome::Ignored,
    }
}

/// Marca el pedido como guardado y avanza la cola
pub fn record_persisted(delivery: &mut DepotDelivery, order_id: &str) -> DepotProgress {
    if !delivery.mark_persisted(order_id) {
        log::warn!("⚠️ [SCAN] Panier {} absent ou incomplet", order_id);
    }
    delivery.advance_to_pending();
    if delivery.is_complete() {
        DepotProgress::Complete
    } else {
        DepotProgress::InProgress
    }
}

/// Texto "Dépôt 3, 4" para avisos y notificaciones
pub fn depot_label(stop: &DepotStop) -> String {
    stop.depot_numbers_label()
}

pub struct ScanViewModel;

impl ScanViewModel {
    /// Depósito de la pantalla actual (por número o por la cola abierta)
    pub fn current_stop(state: &AppState) -> Result<DepotStop, AppError> {
        let (city, depot_number) = match state.get_screen() {
            Screen::DepotScan { city, depot_number, .. } | Screen::BasketScan { city, depot_number, .. } => {
                (city, depot_number)
            }
            other => return Err(AppError::RouteDataMissing(format!("Aucun dépôt actif ({:?})", other))),
        };
        let stops = state.route.stops(&city)?;
        let address_key = state.scan.get_delivery().map(|d| d.address_key);
        let stop = match address_key {
            Some(key) => find_by_address_key(&stops, &key),
            None => find_by_depot_number(&stops, depot_number),
        };
        stop.cloned()
            .ok_or_else(|| AppError::RouteDataMissing(format!("Dépôt {} introuvable à {}", depot_number, city)))
    }

    // ------------------------------------------------------------------
    // Llegada al depósito
    // ------------------------------------------------------------------

    /// Abre la pantalla de llegada para `stop`
    pub fn begin_arrival(state: &AppState, city: &str, day: &str, stop: &DepotStop) {
        let Some(depot_number) = stop.primary_depot_number() else {
            let error = AppError::RouteDataMissing(format!("Le dépôt {} n'a pas de numéro", stop.address));
            state.show_alert(BlockingAlert::from_error(&error, state.get_screen()));
            return;
        };
        state.scan.clear();
        state.scan.set_depot_check(Some(DepotCheck::new(depot_number, CONFIG.scan_config)));
        state.route.select_stop(Some(stop.address_key.clone()));
        state.navigate(Screen::DepotScan {
            city: city.to_string(),
            day: day.to_string(),
            depot_number,
        });
    }

    pub fn handle_depot_payload(state: &AppState, payload: &str) {
        let outcome = match state.scan.depot_check.borrow_mut().as_mut() {
            Some(check) => check.check(payload, now_ms()),
            None => DepotOutcome::Ignored,
        };
        match outcome {
            DepotOutcome::Validated(number) => {
                barcode_ffi::stop_qr_scanner();
                state.scan.close_scanner();
                state.scan.set_message(Some(ScanMessage::info(format!("Dépôt {} validé !", number))));
                state.notify_subscribers();
            }
            DepotOutcome::Rejected(err) => Self::show_scanner_message(state, ScanMessage::error(err.to_string())),
            DepotOutcome::Ignored => {}
        }
    }

    /// "Plus tard": se vuelve a pedir el QR del depósito
    pub fn postpone_arrival(state: &AppState) {
        if let Some(check) = state.scan.depot_check.borrow_mut().as_mut() {
            check.reset();
        }
        state.scan.set_message(None);
        state.go_back();
    }

    /// Carga los paniers del depósito, los pasa a "En cours" y abre la validación
    pub fn start_basket_delivery(state: &AppState) {
        let Screen::DepotScan { city, day, depot_number } = state.get_screen() else {
            return;
        };
        let stop = match Self::current_stop(state) {
            Ok(stop) => stop,
            Err(e) => {
                state.show_alert(BlockingAlert::from_error(&e, Screen::DeliveryDepot { city, day }));
                return;
            }
        };

        let state = state.clone();
        state.set_loading(true);
        state.notify_subscribers();
        spawn_local(async move {
            let result = match authorized_client(&state.auth).await {
                Ok(client) => match basket_service::fetch_depot_orders(&client, &day, &stop.address_key).await {
                    Ok(orders) => {
                        let updated = basket_service::mark_in_progress(&client, &orders).await;
                        log::info!("🚚 [SCAN] {} paniers passés En cours", updated);
                        Ok(orders)
                    }
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            state.set_loading(false);

            match result {
                Ok(mut orders) => {
                    for order in orders.iter_mut().filter(|o| o.status == BasketStatus::Pending) {
                        order.status = BasketStatus::InProgress;
                    }
                    log::info!("📦 [SCAN] Dépôt {}: {} commandes à valider", stop.address_key, orders.len());
                    let delivery = DepotDelivery::new(&stop.address_key, orders, CONFIG.scan_config);
                    let empty = delivery.is_empty();
                    state.scan.set_delivery(Some(delivery));
                    state.navigate(Screen::BasketScan { city, day, depot_number });
                    if empty {
                        Self::finish_depot(&state);
                    }
                }
                Err(e) => {
                    let retry_state = state.clone();
                    let alert = BlockingAlert::from_error(&e, Screen::DeliveryDepot { city, day })
                        .with_retry(Rc::new(move || Self::start_basket_delivery(&retry_state)));
                    state.show_alert(alert);
                }
            }
        });
    }

    // ------------------------------------------------------------------
    // Validación de paniers
    // ------------------------------------------------------------------

    /// Botón "Scanner" de un tipo del pedido activo
    pub fn open_basket_scanner(state: &AppState, kind: BasketType) {
        let started = match state.scan.delivery.borrow_mut().as_mut().and_then(|d| d.current_mut()) {
            Some(progress) => progress.validator.start(kind),
            None => return,
        };
        match started {
            Ok(()) => {
                state.scan.set_message(None);
                state.scan.open_scanner(ScanTarget::Basket(kind));
            }
            Err(err) => state.scan.set_message(Some(ScanMessage::error(err.to_string()))),
        }
        state.notify_subscribers();
    }

    pub fn open_depot_scanner(state: &AppState) {
        state.scan.set_message(None);
        state.scan.open_scanner(ScanTarget::Depot);
        state.notify_subscribers();
    }

    pub fn close_scanner(state: &AppState) {
        barcode_ffi::stop_qr_scanner();
        if let Some(progress) = state.scan.delivery.borrow_mut().as_mut().and_then(|d| d.current_mut()) {
            progress.validator.close();
        }
        state.scan.close_scanner();
        state.notify_subscribers();
    }

    /// Texto leído por el escáner, según lo que se esté escaneando
    pub fn handle_payload(state: &AppState, payload: &str) {
        match state.scan.get_scanner() {
            Some(ScanTarget::Depot) => Self::handle_depot_payload(state, payload),
            Some(ScanTarget::Basket(_)) => Self::handle_basket_payload(state, payload),
            None => log::debug!("[SCAN] Lecture hors scanner ignorée"),
        }
    }

    pub fn handle_basket_payload(state: &AppState, payload: &str) {
        let outcome = match state.scan.delivery.borrow_mut().as_mut() {
            Some(delivery) => apply_basket_payload(delivery, payload, now_ms()),
            None => ScanOutcome::Ignored,
        };
        let Some(text) = outcome.message() else {
            return;
        };

        match outcome {
            ScanOutcome::Counted { .. } => Self::show_scanner_message(state, ScanMessage::info(text)),
            ScanOutcome::Rejected(_) => Self::show_scanner_message(state, ScanMessage::error(text)),
            ScanOutcome::TypeComplete { all_complete, .. } => {
                barcode_ffi::stop_qr_scanner();
                state.scan.close_scanner();
                state.scan.set_message(Some(ScanMessage::info(text)));
                state.notify_subscribers();
                if all_complete {
                    Self::persist_completed(state);
                }
            }
            ScanOutcome::Ignored => {}
        }
    }

    /// Confirmación manual de las cajas de huevos del pedido activo
    pub fn confirm_unscannable(state: &AppState, kind: BasketType) {
        let result = match state.scan.delivery.borrow_mut().as_mut().and_then(|d| d.current_mut()) {
            Some(progress) => progress.validator.confirm_unscannable(kind).map(|all_complete| {
                let quantity = progress.validator.requirement(kind).map(|r| r.required_quantity).unwrap_or(0);
                (all_complete, quantity)
            }),
            None => return,
        };
        match result {
            Ok((all_complete, quantity)) => {
                state.scan.set_message(Some(ScanMessage::info(format!("{} confirmé(s)", kind.label(quantity)))));
                state.notify_subscribers();
                if all_complete {
                    Self::persist_completed(state);
                }
            }
            Err(err) => {
                state.scan.set_message(Some(ScanMessage::error(err.to_string())));
                state.notify_subscribers();
            }
        }
    }

    /// "Passer": el pedido activo va al final de la cola
    pub fn skip_order(state: &AppState) {
        let skipped = state
            .scan
            .delivery
            .borrow_mut()
            .as_mut()
            .map(DepotDelivery::skip)
            .unwrap_or(false);
        let message = if skipped {
            ScanMessage::info("Commande passée, elle reviendra en fin de liste")
        } else {
            ScanMessage::error("Aucune autre commande dans ce dépôt")
        };
        state.scan.set_message(Some(message));
        state.notify_subscribers();
    }

    /// Guarda "Livré" para cada pedido completo aún sin guardar
    pub fn persist_completed(state: &AppState) {
        if state.scan.get_saving() {
            return;
        }
        let pending = state
            .scan
            .get_delivery()
            .map(|d| d.pending_persistence())
            .unwrap_or_default();
        if pending.is_empty() {
            return;
        }

        let state = state.clone();
        state.scan.set_saving(true);
        state.notify_subscribers();
        spawn_local(async move {
            let client = match authorized_client(&state.auth).await {
                Ok(client) => client,
                Err(e) => {
                    Self::show_persistence_error(&state, e.into_persistence());
                    return;
                }
            };

            let mut progress = DepotProgress::InProgress;
            for order_id in pending {
                if let Err(e) = basket_service::update_status(&client, &order_id, BasketStatus::Delivered).await {
                    Self::show_persistence_error(&state, e);
                    return;
                }
                if let Some(delivery) = state.scan.delivery.borrow_mut().as_mut() {
                    progress = record_persisted(delivery, &order_id);
                }
            }

            state.scan.set_saving(false);
            state.notify_subscribers();
            if progress == DepotProgress::Complete {
                Self::finish_depot(&state);
            }
        });
    }

    fn show_persistence_error(state: &AppState, error: AppError) {
        state.scan.set_saving(false);
        let retry_state = state.clone();
        let alert = BlockingAlert::from_error(&error, state.get_screen().back())
            .with_retry(Rc::new(move || Self::persist_completed(&retry_state)));
        state.show_alert(alert);
    }

    // ------------------------------------------------------------------
    // Cierre del depósito
    // ------------------------------------------------------------------

    /// Notifica a los clientes del depósito (una sola vez) y habilita el siguiente
    pub fn finish_depot(state: &AppState) {
        if !state.scan.delivery_complete() {
            return;
        }
        let Screen::BasketScan { city, day, .. } = state.get_screen() else {
            return;
        };
        let stop = match Self::current_stop(state) {
            Ok(stop) => stop,
            Err(e) => {
                log::error!("❌ [SCAN] {}", e);
                return;
            }
        };
        // El turno solo se consume cuando el dépôt se puede cerrar
        if !state.scan.take_notification_turn() {
            return;
        }
        state.route.mark_completed(&stop.address_key);
        state.set_toast(Some("Tous les paniers de ce dépôt sont livrés !".to_string()));
        state.notify_subscribers();

        let state = state.clone();
        spawn_local(async move {
            let sent = match authorized_client(&state.auth).await {
                Ok(client) => {
                    notification_service::send_delivery_notifications(
                        &client,
                        &stop.address_key,
                        &depot_label(&stop),
                        &day,
                        &city,
                    )
                    .await
                }
                Err(e) => {
                    log::error!("❌ [PUSH] Notifications non envoyées: {}", e);
                    0
                }
            };
            if sent > 0 {
                state.set_toast(Some(format!("{} client(s) notifié(s)", sent)));
                state.notify_subscribers();
            }
        });
    }

    /// "Dépôt suivant": selecciona el siguiente o vuelve al inicio al final
    pub fn go_to_next_depot(state: &AppState) {
        let Screen::BasketScan { city, day, .. } = state.get_screen() else {
            return;
        };
        let next = Self::current_stop(state)
            .and_then(|current| Ok(state.route.advance(&state.route.stops(&city)?, &current)));
        state.scan.clear();
        match next {
            Ok(Some(next)) => {
                log::info!("➡️ [SCAN] Dépôt suivant: {}", next.address);
                state.navigate(Screen::DeliveryDepot { city, day });
            }
            Ok(None) => {
                state.set_toast(Some("Tournée terminée, merci !".to_string()));
                state.navigate(Screen::CourierHome);
            }
            Err(e) => state.show_alert(BlockingAlert::from_error(&e, Screen::CourierHome)),
        }
    }

    /// Aviso dentro del modal sin re-render (la cámara sigue abierta)
    fn show_scanner_message(state: &AppState, message: ScanMessage) {
        if let Err(e) = crate::dom::update_scanner_status(&message) {
            log::debug!("[SCAN] Statut du scanner non affiché: {:?}", e);
            state.scan.set_message(Some(message));
            state.notify_subscribers();
            return;
        }
        state.scan.set_message(Some(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BasketOrder;
    use serde_json::json;

    fn order(id: &str, familial: u32, code: i64) -> BasketOrder {
        BasketOrder::from_fields(
            id,
            json!({
                "adresse": "adresse_1",
                "statut": "En cours",
                "panier": { "familial": familial },
                "panierCode": { "codeFamilial": code }
            }),
        )
        .unwrap()
    }

    fn delivery() -> DepotDelivery {
        DepotDelivery::new(
            "adresse_1",
            vec![order("p1", 1, 101), order("p2", 2, 202)],
            CONFIG.scan_config,
        )
    }

    #[test]
    fn payload_goes_to_the_active_order() {
        let mut d = delivery();
        d.current_mut().unwrap().validator.start(BasketType::Familial).unwrap();
        let outcome = apply_basket_payload(&mut d, "101", 0.0);
        assert_eq!(
            outcome,
            ScanOutcome::TypeComplete { kind: BasketType::Familial, required: 1, all_complete: true }
        );
        assert_eq!(d.pending_persistence(), vec!["p1".to_string()]);

        let mut empty = DepotDelivery::new("adresse_9", Vec::new(), CONFIG.scan_config);
        assert_eq!(apply_basket_payload(&mut empty, "101", 0.0), ScanOutcome::Ignored);
    }

    #[test]
    fn depot_completes_only_after_every_order_is_saved() {
        let mut d = delivery();
        d.current_mut().unwrap().validator.start(BasketType::Familial).unwrap();
        apply_basket_payload(&mut d, "101", 0.0);

        assert_eq!(record_persisted(&mut d, "p1"), DepotProgress::InProgress);
        assert_eq!(d.current().unwrap().order.id, "p2");

        d.current_mut().unwrap().validator.start(BasketType::Familial).unwrap();
        apply_basket_payload(&mut d, "202", 10_000.0);
        apply_basket_payload(&mut d, "202", 20_000.0);
        assert!(!d.is_complete());
        assert_eq!(record_persisted(&mut d, "p2"), DepotProgress::Complete);
    }

    #[test]
    fn missing_route_keeps_the_notification_turn() {
        let state = AppState::new();
        state.navigate(Screen::BasketScan { city: "Lyon".into(), day: "lundi".into(), depot_number: 3 });
        state.scan.set_delivery(Some(DepotDelivery::new("adresse_3", Vec::new(), CONFIG.scan_config)));
        assert!(state.scan.delivery_complete());

        ScanViewModel::finish_depot(&state);
        assert!(state.scan.take_notification_turn());
        assert!(!state.scan.take_notification_turn());
    }

    #[test]
    fn unknown_order_does_not_complete_the_depot() {
        let mut d = delivery();
        assert_eq!(record_persisted(&mut d, "ghost"), DepotProgress::InProgress);
    }
}
