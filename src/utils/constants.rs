/// Contenedor del mapa en la pantalla "Livraison"
pub const MAP_CONTAINER_ID: &str = "depot-map";

/// Contenedor de vídeo del lector QR (debe coincidir con el script de la página)
pub const SCANNER_VIEWPORT_ID: &str = "scanner-viewport";

/// Línea de estado dentro del modal del escáner
pub const SCANNER_STATUS_ID: &str = "scanner-status";

/// Espera antes de tocar nodos recién montados (mapa, cámara)
pub const MAP_INIT_DELAY_MS: u32 = 100;
pub const SCANNER_INIT_DELAY_MS: u32 = 100;

/// Duración del aviso flotante
pub const TOAST_DURATION_MS: u32 = 3000;

/// Días de la semana en el orden del selector
pub const WEEK_DAYS: [&str; 7] = ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"];
