// ============================================================================
// SCAN STATE - Llegada al depósito y validación de paniers
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::BasketType;
use crate::scan::{DepotCheck, DepotDelivery};

/// Qué está leyendo el escáner abierto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTarget {
    Depot,
    Basket(BasketType),
}

/// Último aviso mostrado bajo el escáner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMessage {
    pub text: String,
    pub is_error: bool,
}

impl ScanMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

#[derive(Clone)]
pub struct ScanState {
    pub depot_check: Rc<RefCell<Option<DepotCheck>>>,
    pub delivery: Rc<RefCell<Option<DepotDelivery>>>,
    pub scanner: Rc<RefCell<Option<ScanTarget>>>,
    pub message: Rc<RefCell<Option<ScanMessage>>>,
    /// Escritura de "Livré" en curso
    pub saving: Rc<RefCell<bool>>,
    /// Notificaciones del depósito ya enviadas
    pub notified: Rc<RefCell<bool>>,
}

impl ScanState {
    pub fn new() -> Self {
        Self {
            depot_check: Rc::new(RefCell::new(None)),
            delivery: Rc::new(RefCell::new(None)),
            scanner: Rc::new(RefCell::new(None)),
            message: Rc::new(RefCell::new(None)),
            saving: Rc::new(RefCell::new(false)),
            notified: Rc::new(RefCell::new(false)),
        }
    }

    pub fn set_depot_check(&self, check: Option<DepotCheck>) {
        *self.depot_check.borrow_mut() = check;
    }

    pub fn depot_validated(&self) -> bool {
        self.depot_check
            .borrow()
            .as_ref()
            .map(DepotCheck::is_validated)
            .unwrap_or(false)
    }

    /// Nuevo depósito: reinicia la cola y los avisos
    pub fn set_delivery(&self, delivery: Option<DepotDelivery>) {
        *self.delivery.borrow_mut() = delivery;
        *self.notified.borrow_mut() = false;
        self.set_message(None);
    }

    pub fn get_delivery(&self) -> Option<DepotDelivery> {
        self.delivery.borrow().clone()
    }

    /// Depósito terminado (todo escaneado y guardado)
    pub fn delivery_complete(&self) -> bool {
        self.delivery
            .borrow()
            .as_ref()
            .map(DepotDelivery::is_complete)
            .unwrap_or(false)
    }

    pub fn open_scanner(&self, target: ScanTarget) {
        *self.scanner.borrow_mut() = Some(target);
    }

    pub fn close_scanner(&self) {
        *self.scanner.borrow_mut() = None;
    }

    pub fn get_scanner(&self) -> Option<ScanTarget> {
        *self.scanner.borrow()
    }

    pub fn set_message(&self, message: Option<ScanMessage>) {
        *self.message.borrow_mut() = message;
    }

    pub fn get_message(&self) -> Option<ScanMessage> {
        self.message.borrow().clone()
    }

    pub fn set_saving(&self, saving: bool) {
        *self.saving.borrow_mut() = saving;
    }

    pub fn get_saving(&self) -> bool {
        *self.saving.borrow()
    }

    /// Marca las notificaciones como enviadas; false si ya lo estaban
    pub fn take_notification_turn(&self) -> bool {
        let mut notified = self.notified.borrow_mut();
        if *notified {
            false
        } else {
            *notified = true;
            true
        }
    }

    pub fn clear(&self) {
        self.set_depot_check(None);
        self.set_delivery(None);
        self.close_scanner();
        self.set_saving(false);
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;

    #[test]
    fn depot_validation_is_read_from_the_check() {
        let state = ScanState::new();
        assert!(!state.depot_validated());

        let mut check = DepotCheck::new(7, ScanConfig::default());
        check.check("7", 0.0);
        state.set_depot_check(Some(check));
        assert!(state.depot_validated());
    }

    #[test]
    fn notifications_are_sent_once_per_depot() {
        let state = ScanState::new();
        assert!(state.take_notification_turn());
        assert!(!state.take_notification_turn());

        state.set_delivery(Some(DepotDelivery::new("adresse_1", Vec::new(), ScanConfig::default())));
        assert!(state.take_notification_turn());
    }

    #[test]
    fn empty_depot_counts_as_complete() {
        let state = ScanState::new();
        assert!(!state.delivery_complete());
        state.set_delivery(Some(DepotDelivery::new("adresse_1", Vec::new(), ScanConfig::default())));
        assert!(state.delivery_complete());
    }
}
