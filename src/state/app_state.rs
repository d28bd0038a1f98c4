// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::error::AppError;
use crate::models::Role;
use crate::state::{AuthState, ClientState, RouteState, ScanState};

/// Pantallas de la aplicación
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    ChooseRole,
    Login(Role),
    CourierHome,
    Profile,
    BasketRecap { city: String, day: String },
    DeliveryDepot { city: String, day: String },
    DepotScan { city: String, day: String, depot_number: i64 },
    BasketScan { city: String, day: String, depot_number: i64 },
    ClientHome,
}

impl Screen {
    /// Pantalla de inicio de un rol ya autenticado
    pub fn home(role: Role) -> Self {
        match role {
            Role::Client => Screen::ClientHome,
            Role::Courier => Screen::CourierHome,
        }
    }

    /// Destino del botón "retour"
    pub fn back(&self) -> Screen {
        match self {
            Screen::ChooseRole | Screen::Login(_) => Screen::ChooseRole,
            Screen::CourierHome | Screen::Profile => Screen::CourierHome,
            Screen::BasketRecap { .. } | Screen::DeliveryDepot { .. } => Screen::CourierHome,
            Screen::DepotScan { city, day, .. } | Screen::BasketScan { city, day, .. } => {
                Screen::DeliveryDepot { city: city.clone(), day: day.clone() }
            }
            Screen::ClientHome => Screen::ClientHome,
        }
    }

    /// Rol necesario para ver la pantalla (None = pública)
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Screen::ChooseRole | Screen::Login(_) => None,
            Screen::ClientHome => Some(Role::Client),
            _ => Some(Role::Courier),
        }
    }
}

/// Alerta modal que bloquea la pantalla hasta que el usuario elige
#[derive(Clone)]
pub struct BlockingAlert {
    pub title: String,
    pub message: String,
    /// Vuelve a lanzar la operación fallida
    pub retry: Option<Rc<dyn Fn()>>,
    /// Pantalla de "Retour"
    pub back_to: Screen,
}

impl BlockingAlert {
    pub fn from_error(error: &AppError, back_to: Screen) -> Self {
        let title = match error {
            AppError::PersistenceFailure(_) => "Erreur d'enregistrement",
            AppError::RouteDataMissing(_) => "Tournée introuvable",
            AppError::Auth(_) | AppError::AccessDenied(_) => "Accès refusé",
            AppError::Network(_) => "Problème de connexion",
            _ => "Erreur",
        };
        Self {
            title: title.to_string(),
            message: error.to_string(),
            retry: None,
            back_to,
        }
    }

    pub fn with_retry(mut self, retry: Rc<dyn Fn()>) -> Self {
        self.retry = Some(retry);
        self
    }
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub route: RouteState,
    pub scan: ScanState,
    pub client: ClientState,

    pub screen: Rc<RefCell<Screen>>,
    pub alert: Rc<RefCell<Option<BlockingAlert>>>,
    pub toast: Rc<RefCell<Option<String>>>,
    pub loading: Rc<RefCell<bool>>,

    // Reactivity: callbacks para notificar cambios
    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            auth: AuthState::new(),
            route: RouteState::new(),
            scan: ScanState::new(),
            client: ClientState::new(),
            screen: Rc::new(RefCell::new(Screen::ChooseRole)),
            alert: Rc::new(RefCell::new(None)),
            toast: Rc::new(RefCell::new(None)),
            loading: Rc::new(RefCell::new(false)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn get_screen(&self) -> Screen {
        self.screen.borrow().clone()
    }

    /// Cambia de pantalla y re-renderiza
    pub fn navigate(&self, screen: Screen) {
        log::info!("🧭 [NAV] {:?}", screen);
        *self.screen.borrow_mut() = screen;
        self.notify_subscribers();
    }

    pub fn go_back(&self) {
        let target = self.get_screen().back();
        self.navigate(target);
    }

    pub fn set_loading(&self, loading: bool) {
        *self.loading.borrow_mut() = loading;
    }

    pub fn get_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn show_alert(&self, alert: BlockingAlert) {
        log::warn!("🚨 [APP] {}: {}", alert.title, alert.message);
        *self.alert.borrow_mut() = Some(alert);
        self.notify_subscribers();
    }

    pub fn get_alert(&self) -> Option<BlockingAlert> {
        self.alert.borrow().clone()
    }

    pub fn dismiss_alert(&self) {
        *self.alert.borrow_mut() = None;
    }

    pub fn set_toast(&self, message: Option<String>) {
        *self.toast.borrow_mut() = message;
    }

    pub fn get_toast(&self) -> Option<String> {
        self.toast.borrow().clone()
    }

    /// Vuelve al estado inicial tras cerrar sesión
    pub fn reset(&self) {
        self.auth.logout();
        self.route.clear();
        self.scan.clear();
        self.client.clear();
        self.dismiss_alert();
        self.set_toast(None);
        self.set_loading(false);
        *self.screen.borrow_mut() = Screen::ChooseRole;
    }

    /// Suscribirse a cambios de estado
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Notificar a todos los suscriptores
    pub fn notify_subscribers(&self) {
        // Clonar la lista para no mantener el borrow durante los callbacks
        let subscribers: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn scan_screen() -> Screen {
        Screen::BasketScan { city: "Lyon".into(), day: "lundi".into(), depot_number: 7 }
    }

    #[test]
    fn back_from_scanning_returns_to_the_depot() {
        assert_eq!(
            scan_screen().back(),
            Screen::DeliveryDepot { city: "Lyon".into(), day: "lundi".into() }
        );
        assert_eq!(Screen::Login(Role::Client).back(), Screen::ChooseRole);
        assert_eq!(
            Screen::BasketRecap { city: "Lyon".into(), day: "lundi".into() }.back(),
            Screen::CourierHome
        );
        assert_eq!(Screen::ClientHome.back(), Screen::ClientHome);
    }

    #[test]
    fn screens_are_guarded_by_role() {
        assert_eq!(Screen::ChooseRole.required_role(), None);
        assert_eq!(Screen::ClientHome.required_role(), Some(Role::Client));
        assert_eq!(scan_screen().required_role(), Some(Role::Courier));
        assert_eq!(Screen::home(Role::Courier), Screen::CourierHome);
    }

    #[test]
    fn alert_titles_follow_the_error() {
        let alert = BlockingAlert::from_error(
            &AppError::PersistenceFailure("HTTP 503".into()),
            Screen::CourierHome,
        );
        assert_eq!(alert.title, "Erreur d'enregistrement");
        assert!(alert.message.contains("503"));
        assert!(alert.retry.is_none());

        let missing = BlockingAlert::from_error(&AppError::RouteDataMissing("jeudi".into()), Screen::CourierHome)
            .with_retry(Rc::new(|| {}));
        assert_eq!(missing.title, "Tournée introuvable");
        assert!(missing.retry.is_some());
    }

    #[test]
    fn navigation_notifies_subscribers() {
        let state = AppState::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        state.subscribe_to_changes(move || counter.set(counter.get() + 1));

        state.navigate(scan_screen());
        state.go_back();
        assert_eq!(calls.get(), 2);
        assert_eq!(state.get_screen(), Screen::DeliveryDepot { city: "Lyon".into(), day: "lundi".into() });
    }

    #[test]
    fn reset_returns_to_role_choice() {
        let state = AppState::new();
        state.navigate(Screen::Profile);
        state.set_toast(Some("ok".into()));
        state.reset();
        assert_eq!(state.get_screen(), Screen::ChooseRole);
        assert!(state.get_toast().is_none());
    }
}
