// ============================================================================
// AUTH STATE - Sesión Firebase y formulario de login
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::{CourierProfile, Role, UserSession};

#[derive(Clone)]
pub struct AuthState {
    pub session: Rc<RefCell<Option<UserSession>>>,
    pub courier_profile: Rc<RefCell<Option<CourierProfile>>>,

    // Formulario
    pub email: Rc<RefCell<String>>,
    pub password: Rc<RefCell<String>>,
    pub error: Rc<RefCell<Option<String>>>,
    pub submitting: Rc<RefCell<bool>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            session: Rc::new(RefCell::new(None)),
            courier_profile: Rc::new(RefCell::new(None)),
            email: Rc::new(RefCell::new(String::new())),
            password: Rc::new(RefCell::new(String::new())),
            error: Rc::new(RefCell::new(None)),
            submitting: Rc::new(RefCell::new(false)),
        }
    }

    pub fn set_session(&self, session: Option<UserSession>) {
        *self.session.borrow_mut() = session;
    }

    pub fn get_session(&self) -> Option<UserSession> {
        self.session.borrow().clone()
    }

    pub fn get_role(&self) -> Option<Role> {
        self.session.borrow().as_ref().map(|s| s.role)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn set_courier_profile(&self, profile: Option<CourierProfile>) {
        *self.courier_profile.borrow_mut() = profile;
    }

    pub fn get_courier_profile(&self) -> Option<CourierProfile> {
        self.courier_profile.borrow().clone()
    }

    pub fn set_error(&self, error: Option<String>) {
        *self.error.borrow_mut() = error;
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_submitting(&self, submitting: bool) {
        *self.submitting.borrow_mut() = submitting;
    }

    pub fn get_submitting(&self) -> bool {
        *self.submitting.borrow()
    }

    /// Vacía el formulario (al cambiar de puerta de entrada)
    pub fn clear_form(&self) {
        self.email.borrow_mut().clear();
        self.password.borrow_mut().clear();
        self.set_error(None);
        self.set_submitting(false);
    }

    /// Logout - limpiar todo
    pub fn logout(&self) {
        self.set_session(None);
        self.set_courier_profile(None);
        self.clear_form();
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
