// ============================================================================
// BASKET RECAP VIEW - Totales de la ciudad y estado de cada pedido
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, create_element, on_select_change, set_attribute, set_class_name, text_element, ElementBuilder};
use crate::models::{BasketOrder, BasketStatus, BasketType};
use crate::state::AppState;
use crate::views::render_header;
use crate::viewmodels::route_viewmodel::{recap_lines, status_summary};
use crate::viewmodels::RouteViewModel;

pub fn render_basket_recap(state: &AppState, city: &str, day: &str) -> Result<Element, JsValue> {
    let title = format!("{} · {}", city, crate::models::route::capitalize(day));
    let screen = ElementBuilder::new("div")?
        .class("recap-screen")
        .child(render_header(state, &title, true, false)?)?
        .build();

    let orders = state.route.get_recap_orders();
    if orders.is_empty() {
        let text = if state.get_loading() { "Chargement des paniers..." } else { "Aucun panier pour cette ville" };
        append_child(&screen, &text_element("p", "empty", text)?)?;
        return Ok(screen);
    }

    // Totales por tipo
    let lines = recap_lines(&orders)
        .iter()
        .map(|line| text_element("div", &format!("recap-line recap-{}", line.kind.key()), &line.label))
        .collect::<Result<Vec<_>, _>>()?;
    let totals = ElementBuilder::new("div")?.class("recap-totals").children(lines)?.build();
    append_child(&screen, &totals)?;

    let summary = ElementBuilder::new("div")?.class("recap-summary").build();
    for (status, count) in status_summary(&orders) {
        let class = format!("status-badge {}", status.css_class());
        append_child(&summary, &text_element("span", &class, &format!("{}: {}", status, count))?)?;
    }
    append_child(&screen, &summary)?;

    let list = ElementBuilder::new("div")?.class("order-list").build();
    for order in &orders {
        append_child(&list, &render_order_row(state, order)?)?;
    }
    append_child(&screen, &list)?;

    Ok(screen)
}

fn render_order_row(state: &AppState, order: &BasketOrder) -> Result<Element, JsValue> {
    let contents: Vec<String> = BasketType::ALL
        .iter()
        .map(|&kind| (kind, order.counts.get(kind)))
        .filter(|(_, quantity)| *quantity > 0)
        .map(|(kind, quantity)| kind.label(quantity))
        .collect();

    let row = ElementBuilder::new("div")?
        .class(&format!("order-row {}", order.status.css_class()))
        .child(text_element("h4", "order-title", order.title())?)?
        .child(text_element("p", "order-contents", &contents.join(", "))?)?
        .build();

    if let Some(comment) = order.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        append_child(&row, &text_element("p", "order-comment", comment)?)?;
    }

    let select = create_element("select")?;
    set_class_name(&select, "status-select");
    set_attribute(&select, "aria-label", "Statut du panier")?;
    for status in BasketStatus::ALL {
        let option = ElementBuilder::new("option")?
            .attr("value", status.as_str())?
            .text(status.as_str())
            .build();
        if status == order.status {
            set_attribute(&option, "selected", "true")?;
        }
        append_child(&select, &option)?;
    }

    let state_clone = state.clone();
    let order_id = order.id.clone();
    let current = order.status;
    on_select_change(&select, move |value| {
        let status = BasketStatus::parse(&value);
        if status != current {
            RouteViewModel::change_status(&state_clone, &order_id, status);
        }
    })?;
    append_child(&row, &select)?;

    Ok(row)
}
