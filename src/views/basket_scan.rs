// ============================================================================
// BASKET SCAN VIEW - Validación de los paniers del pedido activo
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, text_element, ElementBuilder};
use crate::error::ScanError;
use crate::models::{BasketRequirement, BasketType};
use crate::scan::{DepotDelivery, OrderProgress};
use crate::state::{AppState, ScanTarget};
use crate::views::{render_header, render_scanner};
use crate::viewmodels::ScanViewModel;

pub fn render_basket_scan(state: &AppState, city: &str, day: &str, depot_number: i64) -> Result<Element, JsValue> {
    log::debug!("[BASKET] Validation au dépôt {} ({} / {})", depot_number, city, day);
    let screen = ElementBuilder::new("div")?
        .class("basket-scan-screen")
        .child(render_header(state, &format!("Dépôt {}", depot_number), true, false)?)?
        .build();

    let Some(delivery) = state.scan.get_delivery() else {
        append_child(&screen, &text_element("p", "empty", "Aucune livraison en cours")?)?;
        return Ok(screen);
    };

    if let Some(message) = state.scan.get_message() {
        let class = if message.is_error { "scan-message error" } else { "scan-message success" };
        append_child(&screen, &text_element("p", class, &message.text)?)?;
    }

    if state.scan.get_saving() {
        append_child(&screen, &text_element("p", "saving", "Enregistrement en cours...")?)?;
    }

    if delivery.is_complete() {
        append_child(&screen, &render_depot_done(state, &delivery)?)?;
        return Ok(screen);
    }

    let remaining = format!("Paniers restants: {}", delivery.remaining_baskets());
    append_child(&screen, &text_element("p", "baskets-remaining", &remaining)?)?;

    if let Some(progress) = delivery.current() {
        append_child(&screen, &render_current_order(state, &delivery, progress)?)?;
    }

    if let Some(ScanTarget::Basket(kind)) = state.scan.get_scanner() {
        let close_state = state.clone();
        let payload_state = state.clone();
        let scanner = render_scanner(
            &format!("Scanner: {}", kind_title(kind)),
            state.scan.get_message(),
            Rc::new(move || ScanViewModel::close_scanner(&close_state)),
            Rc::new(move |payload: String| ScanViewModel::handle_payload(&payload_state, &payload)),
        )?;
        append_child(&screen, &scanner)?;
    }

    Ok(screen)
}

fn kind_title(kind: BasketType) -> &'static str {
    match kind {
        BasketType::Familial => "Panier Familial",
        BasketType::Simple => "Panier Simple",
        BasketType::Egg => "Boîte d'Œufs",
    }
}

fn render_current_order(state: &AppState, delivery: &DepotDelivery, progress: &OrderProgress) -> Result<Element, JsValue> {
    let done = delivery.orders().filter(|p| p.is_complete()).count();
    let position = format!("Commande {}/{}", (done + 1).min(delivery.len()), delivery.len());

    let card = ElementBuilder::new("div")?
        .class("order-card")
        .child(text_element("p", "order-position", &position)?)?
        .child(text_element("h3", "order-title", progress.order.title())?)?
        .build();

    if let Some(comment) = progress.order.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        append_child(&card, &text_element("p", "order-comment", comment)?)?;
    }

    let saving = state.scan.get_saving();
    let active = progress.validator.active_type();
    for requirement in progress.validator.requirements() {
        let is_active = active == Some(requirement.kind);
        append_child(&card, &render_requirement(state, requirement, saving, is_active)?)?;
    }

    if progress.awaiting_persistence() && !saving {
        let state_clone = state.clone();
        let save_btn = ElementBuilder::new("button")?
            .class("btn-primary")
            .text("Enregistrer la livraison")
            .on_click(move |_| ScanViewModel::persist_completed(&state_clone))?
            .build();
        append_child(&card, &save_btn)?;
    }

    if delivery.len() > 1 && !progress.is_complete() {
        let state_clone = state.clone();
        let skip_btn = ElementBuilder::new("button")?
            .class("btn-secondary")
            .text("Passer cette commande")
            .on_click(move |_| ScanViewModel::skip_order(&state_clone))?
            .build();
        append_child(&card, &skip_btn)?;
    }

    Ok(card)
}

fn render_requirement(
    state: &AppState,
    requirement: &BasketRequirement,
    saving: bool,
    is_active: bool,
) -> Result<Element, JsValue> {
    let kind = requirement.kind;
    let count = format!("{}/{}", requirement.scanned_count(), requirement.required_quantity);
    let class = match (requirement.is_complete(), is_active) {
        (true, _) => "requirement-row complete",
        (false, true) => "requirement-row active",
        (false, false) => "requirement-row",
    };
    let row = ElementBuilder::new("div")?
        .class(class)
        .child(text_element("span", "requirement-label", &kind.label(requirement.required_quantity))?)?
        .child(text_element("span", "requirement-count", &count)?)?
        .build();

    if requirement.is_complete() {
        append_child(&row, &text_element("span", "requirement-done", "✅")?)?;
        return Ok(row);
    }

    let state_clone = state.clone();
    let action = if requirement.is_scannable() {
        ElementBuilder::new("button")?
            .class("btn-primary btn-scan")
            .text("Scanner")
            .disabled(saving)?
            .on_click(move |_| ScanViewModel::open_basket_scanner(&state_clone, kind))?
            .build()
    } else if kind == BasketType::Egg {
        ElementBuilder::new("button")?
            .class("btn-secondary")
            .text("Confirmer")
            .disabled(saving)?
            .on_click(move |_| ScanViewModel::confirm_unscannable(&state_clone, kind))?
            .build()
    } else {
        // Pedido sin código: no se puede validar desde la app
        text_element("span", "requirement-missing-code", &ScanError::NoCodeConfigured(kind).to_string())?
    };
    append_child(&row, &action)?;
    Ok(row)
}

fn render_depot_done(state: &AppState, delivery: &DepotDelivery) -> Result<Element, JsValue> {
    let summary = format!("{} commande(s) livrée(s)", delivery.len());
    let state_clone = state.clone();
    Ok(ElementBuilder::new("div")?
        .class("depot-done")
        .child(text_element("h3", "", "Tous les paniers de ce dépôt sont livrés !")?)?
        .child(text_element("p", "", &summary)?)?
        .child(
            ElementBuilder::new("button")?
                .class("btn-primary")
                .text("Dépôt suivant")
                .on_click(move |_| ScanViewModel::go_to_next_depot(&state_clone))?
                .build(),
        )?
        .build())
}
