// ============================================================================
// QR SCANNER FFI - Foreign Function Interface para JavaScript
// ============================================================================
// Wrappers para el lector QR de la página - Sin estado, sin lógica.
// El decodificado lo hace la página; aquí solo llega el texto leído.
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = initQrScanner)]
    pub fn init_qr_scanner(
        container_id: &str,
        on_detected: &js_sys::Function,
        on_error: &js_sys::Function,
        on_ready: &js_sys::Function,
    );

    #[wasm_bindgen(js_name = stopQrScanner)]
    pub fn stop_qr_scanner();

    #[wasm_bindgen(js_name = showScannerError)]
    pub fn show_scanner_error();

    #[wasm_bindgen(js_name = hideScannerError)]
    pub fn hide_scanner_error();
}
