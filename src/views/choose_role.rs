// ============================================================================
// CHOOSE ROLE VIEW - Puerta de entrada: client o livreur
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{text_element, ElementBuilder};
use crate::models::Role;
use crate::state::{AppState, Screen};

pub fn render_choose_role(state: &AppState) -> Result<Element, JsValue> {
    let entrance = |role: Role, icon: &str, label: &str| -> Result<Element, JsValue> {
        let state_clone = state.clone();
        Ok(ElementBuilder::new("button")?
            .class("role-card")
            .child(text_element("span", "role-icon", icon)?)?
            .child(text_element("span", "role-label", label)?)?
            .on_click(move |_| {
                state_clone.auth.clear_form();
                state_clone.navigate(Screen::Login(role));
            })?
            .build())
    };

    let header = ElementBuilder::new("div")?
        .class("login-header")
        .child(text_element("div", "logo-icon", "🧺")?)?
        .child(text_element("h1", "", "Paniers de la Ferme")?)?
        .child(text_element("p", "", "Qui êtes-vous ?")?)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("choose-role-screen")
        .child(header)?
        .child(entrance(Role::Client, "🏠", "Je suis client")?)?
        .child(entrance(Role::Courier, "🚚", "Je suis livreur")?)?
        .build())
}
