// ============================================================================
// INCREMENTAL UPDATES - Actualizaciones DOM sin re-render completo
// ============================================================================
// Mientras la cámara está abierta un re-render destruiría el vídeo; las
// lecturas intermedias solo tocan la línea de estado del escáner.
// ============================================================================

use wasm_bindgen::prelude::*;
use crate::dom::{get_element_by_id, set_class_name, set_text_content};
use crate::state::ScanMessage;
use crate::utils::constants::SCANNER_STATUS_ID;

/// Actualiza la línea de estado del modal del escáner
pub fn update_scanner_status(message: &ScanMessage) -> Result<(), JsValue> {
    let element = get_element_by_id(SCANNER_STATUS_ID)
        .ok_or_else(|| JsValue::from_str("Scanner status not found, needs full render"))?;
    set_text_content(&element, &message.text);
    set_class_name(
        &element,
        if message.is_error { "scanner-status error" } else { "scanner-status success" },
    );
    Ok(())
}
