pub mod app;
pub mod header;
pub mod scanner;
pub mod choose_role;
pub mod login;
pub mod home;
pub mod profile;
pub mod basket_recap;
pub mod delivery_depot;
pub mod depot_scan;
pub mod basket_scan;
pub mod client_home;

pub use app::{render_app, resolve_screen};
pub use header::render_header;
pub use scanner::render_scanner;
pub use choose_role::render_choose_role;
pub use login::render_login;
pub use home::render_home;
pub use profile::render_profile;
pub use basket_recap::render_basket_recap;
pub use delivery_depot::render_delivery_depot;
pub use depot_scan::render_depot_scan;
pub use basket_scan::render_basket_scan;
pub use client_home::render_client_home;
