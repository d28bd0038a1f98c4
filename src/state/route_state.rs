// ============================================================================
// ROUTE STATE - Tournée del día, récap de ciudad y depósito seleccionado
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use crate::error::AppError;
use crate::models::{route::next_stop, BasketOrder, DepotStop, Route};

#[derive(Clone)]
pub struct RouteState {
    pub day: Rc<RefCell<String>>,
    pub route: Rc<RefCell<Option<Route>>>,
    pub recap_orders: Rc<RefCell<Vec<BasketOrder>>>,
    /// address_key del depósito mostrado en "Livraison"
    pub selected_stop: Rc<RefCell<Option<String>>>,
    /// Depósitos terminados en esta sesión
    pub completed_stops: Rc<RefCell<HashSet<String>>>,
}

impl RouteState {
    pub fn new() -> Self {
        Self {
            day: Rc::new(RefCell::new(crate::models::route::today_key().to_string())),
            route: Rc::new(RefCell::new(None)),
            recap_orders: Rc::new(RefCell::new(Vec::new())),
            selected_stop: Rc::new(RefCell::new(None)),
            completed_stops: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    pub fn set_day(&self, day: &str) {
        let changed = *self.day.borrow() != day;
        *self.day.borrow_mut() = day.to_string();
        if changed {
            self.set_route(None);
            self.completed_stops.borrow_mut().clear();
        }
    }

    pub fn get_day(&self) -> String {
        self.day.borrow().clone()
    }

    pub fn set_route(&self, route: Option<Route>) {
        *self.route.borrow_mut() = route;
        *self.selected_stop.borrow_mut() = None;
    }

    pub fn get_route(&self) -> Option<Route> {
        self.route.borrow().clone()
    }

    /// Tournée cargada para ese día
    pub fn has_route_for(&self, day: &str) -> bool {
        self.route.borrow().as_ref().map(|r| r.day == day).unwrap_or(false)
    }

    /// Depósitos de una ciudad, en orden de pasada
    pub fn stops(&self, city: &str) -> Result<Vec<DepotStop>, AppError> {
        let route = self.route.borrow();
        let route = route
            .as_ref()
            .ok_or_else(|| AppError::RouteDataMissing(format!("Tournée du {}", self.get_day())))?;
        Ok(route.stops(city)?.to_vec())
    }

    pub fn set_recap_orders(&self, orders: Vec<BasketOrder>) {
        *self.recap_orders.borrow_mut() = orders;
    }

    pub fn get_recap_orders(&self) -> Vec<BasketOrder> {
        self.recap_orders.borrow().clone()
    }

    pub fn select_stop(&self, address_key: Option<String>) {
        *self.selected_stop.borrow_mut() = address_key;
    }

    /// Depósito seleccionado; por defecto el primero no terminado
    pub fn current_stop(&self, stops: &[DepotStop]) -> Option<DepotStop> {
        if let Some(key) = self.selected_stop.borrow().as_ref() {
            if let Some(stop) = stops.iter().find(|s| &s.address_key == key) {
                return Some(stop.clone());
            }
        }
        let completed = self.completed_stops.borrow();
        stops
            .iter()
            .find(|s| !completed.contains(&s.address_key))
            .or_else(|| stops.first())
            .cloned()
    }

    pub fn mark_completed(&self, address_key: &str) {
        self.completed_stops.borrow_mut().insert(address_key.to_string());
    }

    pub fn is_completed(&self, address_key: &str) -> bool {
        self.completed_stops.borrow().contains(address_key)
    }

    /// Selecciona el depósito siguiente; None al final de la tournée
    pub fn advance(&self, stops: &[DepotStop], current: &DepotStop) -> Option<DepotStop> {
        let next = next_stop(stops, current).cloned();
        self.select_stop(next.as_ref().map(|s| s.address_key.clone()));
        next
    }

    pub fn clear(&self) {
        self.set_route(None);
        self.recap_orders.borrow_mut().clear();
        self.completed_stops.borrow_mut().clear();
    }
}

impl Default for RouteState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route() -> Route {
        Route::from_fields(
            "lundi",
            &json!({
                "villes": { "Lyon": {
                    "adresse_1": { "adresse": "1 place Bellecour", "num_depot": [7], "ordre": 1 },
                    "adresse_2": { "adresse": "2 rue Mercière", "num_depot": [8], "ordre": 2 },
                    "adresse_3": { "adresse": "3 quai Rambaud", "num_depot": [9], "ordre": 3 }
                }}
            }),
        )
        .unwrap()
    }

    #[test]
    fn stops_require_a_loaded_route() {
        let state = RouteState::new();
        assert!(matches!(state.stops("Lyon"), Err(AppError::RouteDataMissing(_))));
        state.set_route(Some(route()));
        assert_eq!(state.stops("Lyon").unwrap().len(), 3);
        assert!(matches!(state.stops("Paris"), Err(AppError::RouteDataMissing(_))));
    }

    #[test]
    fn current_stop_skips_completed_depots() {
        let state = RouteState::new();
        state.set_route(Some(route()));
        let stops = state.stops("Lyon").unwrap();
        assert_eq!(state.current_stop(&stops).unwrap().address_key, "adresse_1");

        state.mark_completed("adresse_1");
        assert_eq!(state.current_stop(&stops).unwrap().address_key, "adresse_2");

        state.select_stop(Some("adresse_3".into()));
        assert_eq!(state.current_stop(&stops).unwrap().address_key, "adresse_3");
    }

    #[test]
    fn advance_walks_the_sequence_and_stops_at_the_end() {
        let state = RouteState::new();
        state.set_route(Some(route()));
        let stops = state.stops("Lyon").unwrap();
        let next = state.advance(&stops, &stops[1]).unwrap();
        assert_eq!(next.address_key, "adresse_3");
        assert_eq!(state.selected_stop.borrow().as_deref(), Some("adresse_3"));
        assert!(state.advance(&stops, &stops[2]).is_none());
    }

    #[test]
    fn changing_day_drops_the_loaded_route() {
        let state = RouteState::new();
        state.set_day("lundi");
        state.set_route(Some(route()));
        assert!(state.has_route_for("lundi"));
        state.set_day("mardi");
        assert!(state.get_route().is_none());
    }
}
