// ============================================================================
// PUSH FFI - Token de notificaciones push provisto por la página anfitriona
// ============================================================================
// La página expone `window.getPushToken()` (Promise<string | null>).
// ============================================================================

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Token push del dispositivo, si la página lo ofrece y hay permiso
pub async fn request_push_token() -> Option<String> {
    let window = web_sys::window()?;
    let get_token = js_sys::Reflect::get(&window, &JsValue::from_str("getPushToken")).ok()?;
    let func = get_token.dyn_ref::<js_sys::Function>()?;

    let result = match func.call0(&JsValue::NULL) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("⚠️ [PUSH] getPushToken a échoué: {:?}", e);
            return None;
        }
    };

    let value = match result.dyn_into::<js_sys::Promise>() {
        Ok(promise) => match JsFuture::from(promise).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("⚠️ [PUSH] Permission refusée ou erreur: {:?}", e);
                return None;
            }
        },
        Err(value) => value,
    };

    value.as_string().filter(|token| !token.trim().is_empty())
}
