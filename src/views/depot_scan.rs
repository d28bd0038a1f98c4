// ============================================================================
// DEPOT SCAN VIEW - Llegada: QR del depósito y confirmación
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, text_element, ElementBuilder};
use crate::state::{AppState, ScanTarget};
use crate::views::{render_header, render_scanner};
use crate::viewmodels::ScanViewModel;

pub fn render_depot_scan(state: &AppState, city: &str, day: &str, depot_number: i64) -> Result<Element, JsValue> {
    log::debug!("[DEPOT] Arrivée au dépôt {} ({} / {})", depot_number, city, day);
    let screen = ElementBuilder::new("div")?
        .class("depot-scan-screen")
        .child(render_header(state, &format!("Dépôt {}", depot_number), true, false)?)?
        .build();

    let address = ScanViewModel::current_stop(state).map(|s| s.address).unwrap_or_default();
    if !address.is_empty() {
        append_child(&screen, &text_element("p", "depot-address", &address)?)?;
    }

    if let Some(message) = state.scan.get_message() {
        let class = if message.is_error { "scan-message error" } else { "scan-message success" };
        append_child(&screen, &text_element("p", class, &message.text)?)?;
    }

    if state.scan.depot_validated() {
        let confirm = ElementBuilder::new("div")?
            .class("depot-confirm")
            .child(text_element("h3", "", "Commencer la validation des paniers ?")?)?
            .build();

        let start_state = state.clone();
        let start_btn = ElementBuilder::new("button")?
            .class("btn-primary")
            .text("Commencer la validation")
            .on_click(move |_| ScanViewModel::start_basket_delivery(&start_state))?
            .build();
        let later_state = state.clone();
        let later_btn = ElementBuilder::new("button")?
            .class("btn-secondary")
            .text("Plus tard")
            .on_click(move |_| ScanViewModel::postpone_arrival(&later_state))?
            .build();

        append_child(&confirm, &start_btn)?;
        append_child(&confirm, &later_btn)?;
        append_child(&screen, &confirm)?;
    } else {
        append_child(
            &screen,
            &text_element("p", "scan-hint", "Scannez le QR code affiché au dépôt pour confirmer votre arrivée")?,
        )?;
        let state_clone = state.clone();
        let scan_btn = ElementBuilder::new("button")?
            .class("btn-primary btn-scan")
            .text("📷 Scanner le dépôt")
            .on_click(move |_| ScanViewModel::open_depot_scanner(&state_clone))?
            .build();
        append_child(&screen, &scan_btn)?;
    }

    if state.scan.get_scanner() == Some(ScanTarget::Depot) {
        let close_state = state.clone();
        let payload_state = state.clone();
        let scanner = render_scanner(
            &format!("QR du dépôt {}", depot_number),
            state.scan.get_message(),
            Rc::new(move || ScanViewModel::close_scanner(&close_state)),
            Rc::new(move |payload: String| ScanViewModel::handle_payload(&payload_state, &payload)),
        )?;
        append_child(&screen, &scanner)?;
    }

    Ok(screen)
}
