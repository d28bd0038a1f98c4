// ============================================================================
// CLIENT STATE - Perfil del cliente e historial de notificaciones
// ============================================================================
// El historial se refresca con un Interval; la suscripción pertenece a este
// estado y se cancela explícitamente al cerrar sesión.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use gloo_timers::callback::Interval;
use crate::models::{ClientProfile, NotificationRecord};

/// Refresco periódico del historial (dropear = cancelar)
pub struct NotificationSubscription {
    interval: Interval,
}

impl NotificationSubscription {
    pub fn start<F>(period_seconds: u32, on_tick: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let millis = period_seconds.max(1).saturating_mul(1000);
        log::info!("🔔 [CLIENT] Suivi des notifications toutes les {}s", period_seconds);
        Self {
            interval: Interval::new(millis, on_tick),
        }
    }

    pub fn cancel(self) {
        log::info!("🔕 [CLIENT] Suivi des notifications arrêté");
        self.interval.cancel();
    }
}

#[derive(Clone)]
pub struct ClientState {
    pub profile: Rc<RefCell<Option<ClientProfile>>>,
    pub notifications: Rc<RefCell<Vec<NotificationRecord>>>,
    pub push_registered: Rc<RefCell<bool>>,
    pub subscription: Rc<RefCell<Option<NotificationSubscription>>>,
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            profile: Rc::new(RefCell::new(None)),
            notifications: Rc::new(RefCell::new(Vec::new())),
            push_registered: Rc::new(RefCell::new(false)),
            subscription: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_profile(&self, profile: Option<ClientProfile>) {
        *self.profile.borrow_mut() = profile;
    }

    pub fn get_profile(&self) -> Option<ClientProfile> {
        self.profile.borrow().clone()
    }

    /// Sustituye el historial; true si cambió
    pub fn set_notifications(&self, notifications: Vec<NotificationRecord>) -> bool {
        let mut current = self.notifications.borrow_mut();
        if *current == notifications {
            return false;
        }
        *current = notifications;
        true
    }

    pub fn get_notifications(&self) -> Vec<NotificationRecord> {
        self.notifications.borrow().clone()
    }

    pub fn set_push_registered(&self, registered: bool) {
        *self.push_registered.borrow_mut() = registered;
    }

    pub fn get_push_registered(&self) -> bool {
        *self.push_registered.borrow()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Sustituye la suscripción activa (la anterior se cancela)
    pub fn set_subscription(&self, subscription: NotificationSubscription) {
        let previous = self.subscription.borrow_mut().replace(subscription);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    pub fn cancel_subscription(&self) {
        let current = self.subscription.borrow_mut().take();
        if let Some(subscription) = current {
            subscription.cancel();
        }
    }

    pub fn clear(&self) {
        self.cancel_subscription();
        self.set_profile(None);
        self.notifications.borrow_mut().clear();
        self.set_push_registered(false);
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}
