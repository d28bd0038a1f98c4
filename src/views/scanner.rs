// ============================================================================
// SCANNER VIEW - Lector QR de la página (Rust puro)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Element;
use std::rc::Rc;
use gloo_timers::callback::Timeout;
use crate::dom::{append_child, ElementBuilder};
use crate::state::ScanMessage;
use crate::utils::barcode_ffi;
use crate::utils::constants::{SCANNER_INIT_DELAY_MS, SCANNER_STATUS_ID, SCANNER_VIEWPORT_ID};

/// Renderizar scanner
pub fn render_scanner(
    title: &str,
    message: Option<ScanMessage>,
    on_close: Rc<dyn Fn()>,
    on_payload: Rc<dyn Fn(String)>,
) -> Result<Element, JsValue> {
    // Modal container
    let modal = ElementBuilder::new("div")?
        .id("scanner-modal")?
        .class("scanner-modal active")
        .build();

    // Overlay (cierra al hacer click)
    let on_close_overlay = on_close.clone();
    let overlay = ElementBuilder::new("div")?
        .class("scanner-overlay")
        .on_click(move |_| {
            barcode_ffi::stop_qr_scanner();
            on_close_overlay();
        })?
        .build();
    append_child(&modal, &overlay)?;

    // Content (click dentro no cierra)
    let content = ElementBuilder::new("div")?
        .class("scanner-content")
        .on_click(|e: web_sys::MouseEvent| e.stop_propagation())?
        .build();

    // Header
    let on_close_btn = on_close.clone();
    let close_btn = ElementBuilder::new("button")?
        .class("btn-close")
        .text("✕")
        .on_click(move |_| {
            barcode_ffi::stop_qr_scanner();
            on_close_btn();
        })?
        .build();
    let header = ElementBuilder::new("div")?
        .class("scanner-header")
        .child(ElementBuilder::new("h2")?.text(title).build())?
        .child(close_btn)?
        .build();
    append_child(&content, &header)?;

    // Contenedor de vídeo (ID debe coincidir con el script de la página)
    let viewport = ElementBuilder::new("div")?
        .id(SCANNER_VIEWPORT_ID)?
        .class("scanner-viewport")
        .build();
    append_child(&content, &viewport)?;

    // Línea de estado, actualizada sin re-render entre lecturas
    let (status_text, status_class) = match &message {
        Some(m) if m.is_error => (m.text.as_str(), "scanner-status error"),
        Some(m) => (m.text.as_str(), "scanner-status success"),
        None => ("Placez le QR code dans le cadre", "scanner-status"),
    };
    let status = ElementBuilder::new("p")?
        .id(SCANNER_STATUS_ID)?
        .class(status_class)
        .text(status_text)
        .build();
    append_child(&content, &status)?;

    // Inicializar el lector con delay para que el DOM esté listo
    {
        let on_detected = Closure::wrap(Box::new(move |payload: JsValue| {
            if let Some(text) = payload.as_string() {
                log::info!("📱 [SCANNER] QR lu: {}", text);
                on_payload(text);
            }
        }) as Box<dyn FnMut(JsValue)>);

        let on_error = Closure::wrap(Box::new(move |error: JsValue| {
            log::error!("❌ [SCANNER] Caméra indisponible: {:?}", error);
            barcode_ffi::show_scanner_error();
        }) as Box<dyn FnMut(JsValue)>);

        let on_ready = Closure::wrap(Box::new(move |_ready: JsValue| {
            log::info!("✅ [SCANNER] Lecteur prêt");
            barcode_ffi::hide_scanner_error();
        }) as Box<dyn FnMut(JsValue)>);

        Timeout::new(SCANNER_INIT_DELAY_MS, move || {
            log::info!("📷 [SCANNER] Initialisation du lecteur QR...");
            barcode_ffi::init_qr_scanner(
                SCANNER_VIEWPORT_ID,
                on_detected.as_ref().unchecked_ref(),
                on_error.as_ref().unchecked_ref(),
                on_ready.as_ref().unchecked_ref(),
            );

            // Mantener closures vivos (se liberarán cuando el elemento se destruya)
            on_detected.forget();
            on_error.forget();
            on_ready.forget();
        })
        .forget();
    }

    append_child(&modal, &content)?;
    Ok(modal)
}
