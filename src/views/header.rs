// ============================================================================
// HEADER - Barra superior con retour y acceso al perfil
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::state::{AppState, Screen};

/// Cabecera de pantalla. `back` muestra el botón "←"; `profile` el acceso al perfil.
pub fn render_header(state: &AppState, title: &str, back: bool, profile: bool) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("header")?.class("app-header").build();

    if back {
        let state_clone = state.clone();
        let back_btn = ElementBuilder::new("button")?
            .class("btn-back")
            .attr("aria-label", "Retour")?
            .text("←")
            .on_click(move |_| state_clone.go_back())?
            .build();
        append_child(&header, &back_btn)?;
    }

    let title = ElementBuilder::new("h1")?.class("header-title").text(title).build();
    append_child(&header, &title)?;

    if profile {
        let state_clone = state.clone();
        let profile_btn = ElementBuilder::new("button")?
            .class("btn-profile")
            .attr("aria-label", "Profil")?
            .text("👤")
            .on_click(move |_| state_clone.navigate(Screen::Profile))?
            .build();
        append_child(&header, &profile_btn)?;
    }

    Ok(header)
}
