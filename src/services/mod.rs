// ============================================================================
// SERVICES - SOLO comunicación externa (HTTP / storage)
// ============================================================================

pub mod firestore_codec;
pub mod firestore_query;
pub mod firestore;
pub mod auth_service;
pub mod route_service;
pub mod basket_service;
pub mod notification_service;
pub mod offline_service;

pub use firestore::FirestoreClient;
pub use offline_service::OfflineService;
