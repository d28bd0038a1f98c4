// ============================================================================
// APP - Aplicación principal: raíz del DOM, sesión guardada y re-render
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use gloo_timers::callback::Timeout;
use crate::dom::{append_child, get_element_by_id, set_inner_html};
use crate::services::OfflineService;
use crate::state::AppState;
use crate::utils::barcode_ffi;
use crate::viewmodels::AuthViewModel;
use crate::views::render_app;

/// Marca de re-render ya programado
#[derive(Clone, Default)]
struct RenderGate {
    pending: Rc<Cell<bool>>,
}

impl RenderGate {
    /// true si no había ningún render en cola
    fn try_schedule(&self) -> bool {
        !self.pending.replace(true)
    }

    fn release(&self) {
        self.pending.set(false);
    }
}

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Element,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();

        // Último día elegido por el livreur
        if let Some(day) = OfflineService::new().load_last_day() {
            state.route.set_day(&day);
        }

        // Suscribirse a cambios de estado para re-renderizar automáticamente
        // Un solo render pendiente: los avisos que llegan antes del Timeout se agrupan
        let gate = RenderGate::default();
        state.subscribe_to_changes(move || {
            if !gate.try_schedule() {
                return;
            }
            let gate = gate.clone();
            Timeout::new(0, move || {
                gate.release();
                crate::rerender_app();
            })
            .forget();
        });

        // Sesión guardada: se entra directamente en el accueil del rol
        let auth = AuthViewModel::new();
        if let Some(session) = auth.restore() {
            log::info!("💾 [APP] Session restaurée ({:?})", session.role);
            auth.start_session(&state, session);
        }

        Ok(Self { state, root })
    }

    /// Renderizar aplicación
    pub fn render(&mut self) -> Result<(), JsValue> {
        // La cámara se libera antes de destruir el modal; se reabre si sigue activo
        if get_element_by_id("scanner-modal").is_some() {
            barcode_ffi::stop_qr_scanner();
        }

        set_inner_html(&self.root, "");
        let app_view = render_app(&self.state)?;
        append_child(&self.root, &app_view)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_before_the_render_share_one_timeout() {
        let gate = RenderGate::default();
        let subscriber = gate.clone();
        assert!(subscriber.try_schedule());
        assert!(!subscriber.try_schedule());
        assert!(!gate.try_schedule());

        gate.release();
        assert!(subscriber.try_schedule());
    }
}
