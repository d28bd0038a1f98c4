// ============================================================================
// MAP FFI - Foreign Function Interface para JavaScript
// ============================================================================
// Solo wrappers para funciones JS del mapa de la página - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = initDepotMap)]
    pub fn init_depot_map(container_id: &str, is_dark: bool);

    #[wasm_bindgen(js_name = setDepotMarkers)]
    pub fn set_depot_markers(markers_json: &str);

    #[wasm_bindgen(js_name = fitMapRegion)]
    pub fn fit_map_region(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64);
}

/// Helper: abrir el itinerario hacia un depósito en la app de mapas del sistema
pub fn open_directions(latitude: f64, longitude: f64) {
    if let Some(window) = web_sys::window() {
        let url = format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            latitude, longitude
        );
        if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
            log::warn!("⚠️ [MAP] Impossible d'ouvrir l'itinéraire: {:?}", e);
        }
    }
}
