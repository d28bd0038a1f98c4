// Utils compartidos

pub mod constants;
pub mod storage;
pub mod map_ffi;
pub mod barcode_ffi;
pub mod push_ffi;

pub use constants::*;

/// Marca de tiempo del navegador (ms desde epoch)
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
