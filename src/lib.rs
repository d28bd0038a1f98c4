// ============================================================================
// PANIER TOURNÉE - FRONTEND MVVM (RUST PURO)
// ============================================================================
// Arquitectura MVVM:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Lógica UI sobre el estado compartido
// - Services: SOLO comunicación Firebase / Expo
// - Scan: Validación de QR pura, sin DOM
// - State: State Management con Rc<RefCell>
// - Models: Documentos Firestore tipados
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod scan;
pub mod services;
pub mod state;
pub mod viewmodels;
mod dom;
mod views;
mod utils;
mod app;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;
use std::cell::RefCell;
use crate::app::App;
use crate::config::CONFIG;

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    // Inicializar logging (nivel según ENABLE_LOGGING)
    wasm_logger::init(Config::new(CONFIG.log_level()));
    log::info!("🚀 Panier Tournée - Rust Puro + MVVM");

    // Crear y renderizar app
    let mut app = App::new()?;
    app.render()?;

    // Guardar app en variable global
    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|app_cell| {
        log::debug!("🔄 [RERENDER] Re-render completo");
        match app_cell.try_borrow_mut() {
            Ok(mut app) => match app.as_mut() {
                Some(app) => {
                    if let Err(e) = app.render() {
                        log::error!("❌ [RERENDER] Erreur de rendu: {:?}", e);
                    }
                }
                None => log::warn!("⚠️ [RERENDER] App no está inicializada"),
            },
            // Render en curso: el siguiente aviso volverá a pintar
            Err(_) => log::debug!("[RERENDER] Render déjà en cours"),
        }
    });
}

/// Función pública WASM para re-renderizar la app (llamable desde JavaScript)
#[wasm_bindgen]
pub fn rerender_app_wasm() {
    rerender_app();
}
