// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod auth_state;
pub mod route_state;
pub mod scan_state;
pub mod client_state;
pub mod app_state;

pub use auth_state::*;
pub use route_state::*;
pub use scan_state::*;
pub use client_state::*;
pub use app_state::*;
