// ============================================================================
// DELIVERY DEPOT VIEW - Mapa de depósitos, depósito actual y lista
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, text_element, ElementBuilder};
use crate::models::DepotStop;
use crate::state::AppState;
use crate::utils::constants::MAP_CONTAINER_ID;
use crate::utils::map_ffi::open_directions;
use crate::views::render_header;
use crate::viewmodels::{MapViewModel, ScanViewModel};

pub fn render_delivery_depot(state: &AppState, city: &str, day: &str) -> Result<Element, JsValue> {
    let screen = ElementBuilder::new("div")?
        .class("delivery-screen")
        .child(render_header(state, &format!("Livraison · {}", city), true, false)?)?
        .build();

    let stops = match state.route.stops(city) {
        Ok(stops) => stops,
        Err(e) => {
            log::warn!("⚠️ [DEPOT] {}", e);
            append_child(&screen, &text_element("p", "empty", &e.to_string())?)?;
            return Ok(screen);
        }
    };
    if stops.is_empty() {
        append_child(&screen, &text_element("p", "empty", "Aucun dépôt dans cette ville")?)?;
        return Ok(screen);
    }

    let current = state.route.current_stop(&stops);
    let selected = current.as_ref().map(|s| s.address_key.clone());

    // Mapa (se rellena tras montar el contenedor)
    let map = ElementBuilder::new("div")?
        .id(MAP_CONTAINER_ID)?
        .class("depot-map")
        .build();
    append_child(&screen, &map)?;
    let route = state.route.clone();
    let markers = MapViewModel::prepare_markers(&stops, selected.as_deref(), |key| route.is_completed(key));
    MapViewModel::show_depots(markers, MapViewModel::region_for(&stops));

    let done = stops.iter().filter(|s| state.route.is_completed(&s.address_key)).count();
    let progress = format!("{}/{} dépôts livrés", done, stops.len());
    append_child(&screen, &text_element("p", "depot-progress", &progress)?)?;

    if let Some(stop) = &current {
        append_child(&screen, &render_current_stop(state, city, day, stop)?)?;
    }

    let list = ElementBuilder::new("div")?.class("depot-list").build();
    for stop in &stops {
        let is_current = selected.as_deref() == Some(stop.address_key.as_str());
        append_child(&list, &render_stop_row(state, stop, is_current)?)?;
    }
    append_child(&screen, &list)?;

    Ok(screen)
}

fn render_current_stop(state: &AppState, city: &str, day: &str, stop: &DepotStop) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("div")?
        .class("current-depot")
        .child(text_element("h3", "depot-title", &format!("Dépôt {}", stop.depot_numbers_label()))?)?
        .child(text_element("p", "depot-address", &stop.address)?)?
        .build();
    if !stop.schedule.is_empty() {
        append_child(&card, &text_element("p", "depot-schedule", &stop.schedule)?)?;
    }

    let actions = ElementBuilder::new("div")?.class("depot-actions").build();

    if let Some(coords) = stop.coordinates {
        let directions = ElementBuilder::new("button")?
            .class("btn-secondary")
            .text("Itinéraire")
            .on_click(move |_| open_directions(coords.latitude, coords.longitude))?
            .build();
        append_child(&actions, &directions)?;
    }

    if state.route.is_completed(&stop.address_key) {
        append_child(&actions, &text_element("span", "depot-done", "✅ Livré")?)?;
    } else {
        let state_clone = state.clone();
        let (city, day, stop) = (city.to_string(), day.to_string(), stop.clone());
        let arrive = ElementBuilder::new("button")?
            .class("btn-primary")
            .text("Je suis arrivé")
            .on_click(move |_| ScanViewModel::begin_arrival(&state_clone, &city, &day, &stop))?
            .build();
        append_child(&actions, &arrive)?;
    }

    append_child(&card, &actions)?;
    Ok(card)
}

fn render_stop_row(state: &AppState, stop: &DepotStop, is_current: bool) -> Result<Element, JsValue> {
    let status = if state.route.is_completed(&stop.address_key) {
        "Livré"
    } else {
        stop.delivery_status.label()
    };
    let class = if is_current { "depot-row selected" } else { "depot-row" };

    let state_clone = state.clone();
    let key = stop.address_key.clone();
    Ok(ElementBuilder::new("div")?
        .class(class)
        .child(text_element("span", "depot-number", &format!("Dépôt {}", stop.depot_numbers_label()))?)?
        .child(text_element("span", "depot-address", &stop.address)?)?
        .child(text_element("span", "depot-status", status)?)?
        .on_click(move |_| {
            state_clone.route.select_stop(Some(key.clone()));
            state_clone.notify_subscribers();
        })?
        .build())
}
