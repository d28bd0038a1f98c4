// ============================================================================
// PROFILE VIEW - Datos del livreur y déconnexion
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, text_element, ElementBuilder};
use crate::state::AppState;
use crate::views::render_header;
use crate::viewmodels::AuthViewModel;

pub fn render_profile(state: &AppState) -> Result<Element, JsValue> {
    let screen = ElementBuilder::new("div")?
        .class("profile-screen")
        .child(render_header(state, "Profil", true, false)?)?
        .build();

    let card = ElementBuilder::new("div")?.class("profile-card").build();
    append_child(&card, &text_element("div", "profile-avatar", "🚚")?)?;

    match state.auth.get_courier_profile() {
        Some(profile) => {
            append_child(&card, &text_element("h2", "profile-name", &profile.full_name())?)?;
            append_child(&card, &text_element("p", "profile-email", &profile.email)?)?;
        }
        None => {
            let email = state
                .auth
                .get_session()
                .map(|s| s.identity.email)
                .unwrap_or_default();
            append_child(&card, &text_element("h2", "profile-name", "Livreur")?)?;
            append_child(&card, &text_element("p", "profile-email", &email)?)?;
        }
    }

    let day = format!("Tournée sélectionnée: {}", crate::models::route::capitalize(&state.route.get_day()));
    append_child(&card, &text_element("p", "profile-day", &day)?)?;
    append_child(&screen, &card)?;

    let state_clone = state.clone();
    let logout_btn = ElementBuilder::new("button")?
        .class("btn-logout")
        .text("Se déconnecter")
        .on_click(move |_| AuthViewModel::new().logout(&state_clone))?
        .build();
    append_child(&screen, &logout_btn)?;

    Ok(screen)
}
