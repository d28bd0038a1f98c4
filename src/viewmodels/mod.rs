pub mod auth_viewmodel;
pub mod route_viewmodel;
pub mod scan_viewmodel;
pub mod client_viewmodel;
pub mod map_viewmodel;

pub use auth_viewmodel::AuthViewModel;
pub use route_viewmodel::RouteViewModel;
pub use scan_viewmodel::ScanViewModel;
pub use client_viewmodel::ClientViewModel;
pub use map_viewmodel::MapViewModel;
