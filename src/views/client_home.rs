// ============================================================================
// CLIENT HOME VIEW - Accueil client e historial de avisos de entrega
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use crate::dom::{append_child, text_element, ElementBuilder};
use crate::models::NotificationRecord;
use crate::state::AppState;
use crate::viewmodels::client_viewmodel::delivered_count;
use crate::viewmodels::{AuthViewModel, ClientViewModel};

pub fn render_client_home(state: &AppState) -> Result<Element, JsValue> {
    let name = state
        .client
        .get_profile()
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|| "Client".to_string());

    let state_clone = state.clone();
    let logout_btn = ElementBuilder::new("button")?
        .class("btn-logout")
        .text("Se déconnecter")
        .on_click(move |_| AuthViewModel::new().logout(&state_clone))?
        .build();

    let header = ElementBuilder::new("header")?
        .class("app-header")
        .child(text_element("h1", "header-title", "Mes livraisons")?)?
        .child(logout_btn)?
        .build();

    let screen = ElementBuilder::new("div")?
        .class("client-home-screen")
        .child(header)?
        .child(text_element("h2", "greeting", &format!("Bonjour {} !", name))?)?
        .build();

    let push_text = if state.client.get_push_registered() {
        "🔔 Notifications activées"
    } else {
        "🔕 Notifications push indisponibles sur cet appareil"
    };
    append_child(&screen, &text_element("p", "push-status", push_text)?)?;

    let notifications = state.client.get_notifications();
    let delivered = delivered_count(&notifications);
    if delivered > 0 {
        let summary = format!("{} livraison(s) reçue(s)", delivered);
        append_child(&screen, &text_element("p", "delivery-count", &summary)?)?;
    }

    let list = ElementBuilder::new("div")?.class("notification-list").build();
    if notifications.is_empty() {
        append_child(&list, &text_element("p", "empty", "Aucune notification pour le moment")?)?;
    }
    for record in &notifications {
        append_child(&list, &render_notification(record)?)?;
    }
    append_child(&screen, &list)?;

    let refresh_state = state.clone();
    let refresh_btn = ElementBuilder::new("button")?
        .class("btn-secondary")
        .text("Actualiser")
        .on_click(move |_| {
            let state = refresh_state.clone();
            spawn_local(async move {
                ClientViewModel::refresh_history(&state).await;
            });
        })?
        .build();
    append_child(&screen, &refresh_btn)?;

    Ok(screen)
}

fn render_notification(record: &NotificationRecord) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("notification-card")
        .child(text_element("h4", "notification-title", &record.title)?)?
        .child(text_element("p", "notification-body", &record.body)?)?
        .child(text_element("span", "notification-time", &record.time_label())?)?
        .build())
}
