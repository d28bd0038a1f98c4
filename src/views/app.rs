// ============================================================================
// APP VIEW - Router de pantallas + alerta bloqueante + aviso flotante
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use gloo_timers::callback::Timeout;
use crate::dom::{append_child, text_element, ElementBuilder};
use crate::state::{AppState, BlockingAlert, Screen};
use crate::utils::constants::TOAST_DURATION_MS;
use crate::views::*;

/// Pantalla permitida para la sesión actual (sin sesión → elección de rol)
pub fn resolve_screen(requested: Screen, role: Option<crate::models::Role>) -> Screen {
    match (requested.required_role(), role) {
        (None, Some(role)) => Screen::home(role),
        (None, None) => requested,
        (Some(required), Some(role)) if required == role => requested,
        (Some(_), Some(role)) => Screen::home(role),
        (Some(_), None) => Screen::ChooseRole,
    }
}

/// Renderizar aplicación completa
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let requested = state.get_screen();
    let screen = resolve_screen(requested.clone(), state.auth.get_role());
    if screen != requested {
        log::info!("🔒 [APP] Écran {:?} redirigé vers {:?}", requested, screen);
        *state.screen.borrow_mut() = screen.clone();
    }

    let container = ElementBuilder::new("div")?.class("app-container").build();

    let content = match &screen {
        Screen::ChooseRole => render_choose_role(state)?,
        Screen::Login(role) => render_login(state, *role)?,
        Screen::CourierHome => render_home(state)?,
        Screen::Profile => render_profile(state)?,
        Screen::BasketRecap { city, day } => render_basket_recap(state, city, day)?,
        Screen::DeliveryDepot { city, day } => render_delivery_depot(state, city, day)?,
        Screen::DepotScan { city, day, depot_number } => render_depot_scan(state, city, day, *depot_number)?,
        Screen::BasketScan { city, day, depot_number } => render_basket_scan(state, city, day, *depot_number)?,
        Screen::ClientHome => render_client_home(state)?,
    };
    append_child(&container, &content)?;

    if state.get_loading() {
        let loading = ElementBuilder::new("div")?
            .class("loading-overlay")
            .child(ElementBuilder::new("div")?.class("spinner").build())?
            .build();
        append_child(&container, &loading)?;
    }

    if let Some(toast) = state.get_toast() {
        append_child(&container, &render_toast(state, &toast)?)?;
    }

    if let Some(alert) = state.get_alert() {
        append_child(&container, &render_alert(state, alert)?)?;
    }

    Ok(container)
}

fn render_toast(state: &AppState, message: &str) -> Result<Element, JsValue> {
    let toast = text_element("div", "toast", message)?;

    // Se borra solo si sigue siendo el mismo aviso
    let state_clone = state.clone();
    let shown = message.to_string();
    Timeout::new(TOAST_DURATION_MS, move || {
        if state_clone.get_toast().as_deref() == Some(shown.as_str()) {
            state_clone.set_toast(None);
            state_clone.notify_subscribers();
        }
    })
    .forget();

    Ok(toast)
}

/// Alerta bloqueante: "Réessayer" (si hay acción) y "Retour"
fn render_alert(state: &AppState, alert: BlockingAlert) -> Result<Element, JsValue> {
    let actions = ElementBuilder::new("div")?.class("alert-actions").build();

    if let Some(retry) = alert.retry.clone() {
        let state_clone = state.clone();
        let retry_btn = ElementBuilder::new("button")?
            .class("btn-primary")
            .text("Réessayer")
            .on_click(move |_| {
                state_clone.dismiss_alert();
                state_clone.notify_subscribers();
                retry();
            })?
            .build();
        append_child(&actions, &retry_btn)?;
    }

    let state_clone = state.clone();
    let back_to = alert.back_to.clone();
    let back_btn = ElementBuilder::new("button")?
        .class("btn-secondary")
        .text("Retour")
        .on_click(move |_| {
            state_clone.dismiss_alert();
            state_clone.set_loading(false);
            state_clone.navigate(back_to.clone());
        })?
        .build();
    append_child(&actions, &back_btn)?;

    let dialog = ElementBuilder::new("div")?
        .class("alert-dialog")
        .attr("role", "alertdialog")?
        .child(text_element("h2", "alert-title", &alert.title)?)?
        .child(text_element("p", "alert-message", &alert.message)?)?
        .child(actions)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("alert-overlay")
        .child(dialog)?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn public_screens_redirect_signed_in_users_home() {
        assert_eq!(resolve_screen(Screen::ChooseRole, Some(Role::Courier)), Screen::CourierHome);
        assert_eq!(resolve_screen(Screen::Login(Role::Client), Some(Role::Client)), Screen::ClientHome);
        assert_eq!(resolve_screen(Screen::Login(Role::Client), None), Screen::Login(Role::Client));
    }

    #[test]
    fn protected_screens_need_the_matching_role() {
        let recap = Screen::BasketRecap { city: "Lyon".into(), day: "lundi".into() };
        assert_eq!(resolve_screen(recap.clone(), Some(Role::Courier)), recap);
        assert_eq!(resolve_screen(recap.clone(), Some(Role::Client)), Screen::ClientHome);
        assert_eq!(resolve_screen(recap, None), Screen::ChooseRole);
        assert_eq!(resolve_screen(Screen::ClientHome, Some(Role::Courier)), Screen::CourierHome);
    }
}
