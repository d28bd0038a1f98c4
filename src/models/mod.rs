pub mod lenient;
pub mod basket;
pub mod route;
pub mod user;
pub mod notification;

pub use basket::{BasketCodes, BasketCounts, BasketOrder, BasketRequirement, BasketStatus, BasketType};
pub use route::{Coordinates, DeliveryStatus, DepotStop, MapRegion, Route};
pub use user::{AuthIdentity, ClientProfile, CourierProfile, Role, UserSession};
pub use notification::{NotificationRecord, PushMessage};
