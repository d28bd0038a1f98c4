// ============================================================================
// HOME VIEW - Accueil livreur: saludo, día y ciudades de la tournée
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, create_element, on_select_change, set_attribute, set_class_name, text_element, ElementBuilder};
use crate::models::route::capitalize;
use crate::state::{AppState, Screen};
use crate::utils::constants::WEEK_DAYS;
use crate::views::render_header;
use crate::viewmodels::RouteViewModel;

pub fn render_home(state: &AppState) -> Result<Element, JsValue> {
    let screen = ElementBuilder::new("div")?
        .class("home-screen")
        .child(render_header(state, "Tournées", false, true)?)?
        .build();

    let greeting = match state.auth.get_courier_profile() {
        Some(profile) if !profile.prenom.is_empty() => format!("Bonjour {} !", profile.prenom),
        _ => "Bonjour !".to_string(),
    };
    append_child(&screen, &text_element("h2", "greeting", &greeting)?)?;

    let day = state.route.get_day();
    append_child(&screen, &render_day_selector(state, &day)?)?;

    let route = state.route.get_route().filter(|r| r.day == day);
    match route {
        Some(route) => {
            if let Some(info) = &route.info {
                append_child(&screen, &text_element("p", "route-info", info)?)?;
            }
            if !route.active {
                append_child(&screen, &text_element("p", "route-inactive", "Tournée inactive ce jour")?)?;
            }

            let list = ElementBuilder::new("div")?.class("city-list").build();
            for city in route.city_names() {
                let count = route.cities.get(&city).map(Vec::len).unwrap_or(0);
                append_child(&list, &render_city_card(state, &city, &day, count)?)?;
            }
            if route.cities.is_empty() {
                append_child(&list, &text_element("p", "empty", "Aucune ville pour ce jour")?)?;
            }
            append_child(&screen, &list)?;
        }
        None if state.get_loading() => {
            append_child(&screen, &text_element("p", "loading-text", "Chargement de la tournée...")?)?;
        }
        None => {
            let state_clone = state.clone();
            let retry = ElementBuilder::new("button")?
                .class("btn-secondary")
                .text("Charger la tournée")
                .on_click(move |_| RouteViewModel::refresh_route(&state_clone))?
                .build();
            append_child(&screen, &retry)?;
        }
    }

    Ok(screen)
}

fn render_day_selector(state: &AppState, selected: &str) -> Result<Element, JsValue> {
    let select = create_element("select")?;
    set_class_name(&select, "day-select");
    set_attribute(&select, "aria-label", "Jour de la tournée")?;
    for day in WEEK_DAYS {
        let option = ElementBuilder::new("option")?
            .attr("value", day)?
            .text(&capitalize(day))
            .build();
        if day == selected {
            set_attribute(&option, "selected", "true")?;
        }
        append_child(&select, &option)?;
    }

    let state_clone = state.clone();
    on_select_change(&select, move |day| {
        log::info!("📅 [ROUTE] Jour sélectionné: {}", day);
        RouteViewModel::change_day(&state_clone, &day);
        state_clone.notify_subscribers();
    })?;

    ElementBuilder::new("div")?
        .class("day-selector")
        .child(text_element("label", "", "Jour")?)?
        .child(select)
        .map(ElementBuilder::build)
}

fn render_city_card(state: &AppState, city: &str, day: &str, depot_count: usize) -> Result<Element, JsValue> {
    let recap_btn = {
        let state_clone = state.clone();
        let (city, day) = (city.to_string(), day.to_string());
        ElementBuilder::new("button")?
            .class("btn-secondary")
            .text("Récapitulatif")
            .on_click(move |_| {
                RouteViewModel::load_recap(&state_clone, &day, &city);
                state_clone.navigate(Screen::BasketRecap { city: city.clone(), day: day.clone() });
            })?
            .build()
    };

    let delivery_btn = {
        let state_clone = state.clone();
        let (city, day) = (city.to_string(), day.to_string());
        ElementBuilder::new("button")?
            .class("btn-primary")
            .text("Livraison")
            .on_click(move |_| {
                state_clone.route.select_stop(None);
                state_clone.navigate(Screen::DeliveryDepot { city: city.clone(), day: day.clone() });
            })?
            .build()
    };

    let label = if depot_count > 1 {
        format!("{} dépôts", depot_count)
    } else {
        format!("{} dépôt", depot_count)
    };

    Ok(ElementBuilder::new("div")?
        .class("city-card")
        .child(text_element("h3", "city-name", city)?)?
        .child(text_element("p", "city-depots", &label)?)?
        .child(
            ElementBuilder::new("div")?
                .class("city-actions")
                .child(recap_btn)?
                .child(delivery_btn)?
                .build(),
        )?
        .build())
}
