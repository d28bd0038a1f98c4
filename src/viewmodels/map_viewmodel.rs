// ============================================================================
// MAP VIEWMODEL - Lógica de negocio del mapa
// ============================================================================
// SOLO lógica de preparación de datos - Sin estado
// ============================================================================

use gloo_timers::callback::Timeout;
use serde::Serialize;
use crate::config::CONFIG;
use crate::models::{DeliveryStatus, DepotStop, MapRegion};
use crate::utils::constants::{MAP_CONTAINER_ID, MAP_INIT_DELAY_MS};
use crate::utils::map_ffi::*;

/// Estructura para enviar al mapa
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub label: String,
    pub address: String,
    pub coords: [f64; 2], // [lat, lng]
    pub status: String,
    pub selected: bool,
}

/// ViewModel del mapa - SOLO lógica de negocio
pub struct MapViewModel;

impl MapViewModel {
    /// Inicializar mapa (detecta dark mode)
    pub fn initialize_map() {
        let is_dark = web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok())
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false);

        log::info!("🗺️ [MAP] Initialisation de la carte (dark mode: {})", is_dark);
        init_depot_map(MAP_CONTAINER_ID, is_dark);
    }

    /// Un marcador por depósito con coordenadas válidas
    pub fn prepare_markers(
        stops: &[DepotStop],
        selected: Option<&str>,
        is_completed: impl Fn(&str) -> bool,
    ) -> Vec<MapMarker> {
        let markers: Vec<MapMarker> = stops
            .iter()
            .filter_map(|stop| {
                let coords = stop.coordinates?;
                let status = if is_completed(&stop.address_key) {
                    DeliveryStatus::Delivered
                } else {
                    stop.delivery_status
                };
                Some(MapMarker {
                    id: stop.address_key.clone(),
                    label: format!("Dépôt {}", stop.depot_numbers_label()),
                    address: stop.address.clone(),
                    coords: [coords.latitude, coords.longitude],
                    status: status.label().to_string(),
                    selected: selected == Some(stop.address_key.as_str()),
                })
            })
            .collect();

        log::info!("📍 [MAP] {} dépôts sur la carte (sur {})", markers.len(), stops.len());
        markers
    }

    /// Inicializa el mapa y envía marcadores y región tras el render
    pub fn show_depots(markers: Vec<MapMarker>, region: MapRegion) {
        let json = match serde_json::to_string(&markers) {
            Ok(json) => json,
            Err(e) => {
                log::error!("❌ [MAP] Erreur de sérialisation des dépôts: {}", e);
                return;
            }
        };

        Timeout::new(MAP_INIT_DELAY_MS, move || {
            Self::initialize_map();
            set_depot_markers(&json);
            fit_map_region(
                region.latitude,
                region.longitude,
                region.latitude_delta,
                region.longitude_delta,
            );
        })
        .forget();
    }

    /// Región que encuadra los depósitos de la ciudad
    pub fn region_for(stops: &[DepotStop]) -> MapRegion {
        MapRegion::fit(stops, &CONFIG.map_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Route;
    use serde_json::json;

    fn stops() -> Vec<DepotStop> {
        let route = Route::from_fields(
            "mardi",
            &json!({ "villes": { "Vienne": {
                "adresse_1": {
                    "adresse": "Place de l'Hôtel de Ville",
                    "coordonnées": { "latitude": 45.52, "longitude": 4.87 },
                    "num_depot": [3, 4],
                    "ordre": 1
                },
                "adresse_2": {
                    "adresse": "Sans coordonnées",
                    "coordonnées": { "latitude": "n/a", "longitude": 4.9 },
                    "num_depot": [5],
                    "ordre": 2
                }
            }}}),
        )
        .unwrap();
        route.stops("Vienne").unwrap().to_vec()
    }

    #[test]
    fn depots_without_coordinates_stay_off_the_map() {
        let markers = MapViewModel::prepare_markers(&stops(), Some("adresse_1"), |_| false);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "adresse_1");
        assert_eq!(markers[0].label, "Dépôt 3, 4");
        assert_eq!(markers[0].coords, [45.52, 4.87]);
        assert!(markers[0].selected);
        assert_eq!(markers[0].status, "En attente");
    }

    #[test]
    fn completed_depots_are_shown_delivered() {
        let markers = MapViewModel::prepare_markers(&stops(), None, |key| key == "adresse_1");
        assert_eq!(markers[0].status, "Livré");
        assert!(!markers[0].selected);
    }
}
