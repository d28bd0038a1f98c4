// ============================================================================
// TOURNÉE - Ruta del día agrupada por ciudad y depósitos ordenados
// ============================================================================

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{Datelike, Weekday};
use crate::config::MapConfig;
use crate::error::AppError;
use crate::models::basket::{BasketOrder, BasketStatus};
use crate::models::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Coordenadas numéricas (o texto numérico) dentro de los límites terrestres
    pub fn from_value(value: &Value) -> Option<Self> {
        let latitude = lenient::value_as_f64(value.get("latitude")?)?;
        let longitude = lenient::value_as_f64(value.get("longitude")?)?;
        Self::checked(latitude, longitude)
    }

    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self { latitude, longitude })
    }
}

/// Estado de entrega de un depósito, derivado de sus paniers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    InProgress,
    Delivered,
}

impl DeliveryStatus {
    /// Todos entregados → Delivered; alguno empezado → InProgress
    pub fn from_orders(orders: &[BasketOrder]) -> Self {
        if !orders.is_empty() && orders.iter().all(|o| o.status == BasketStatus::Delivered) {
            DeliveryStatus::Delivered
        } else if orders.iter().any(|o| o.status != BasketStatus::Pending) {
            DeliveryStatus::InProgress
        } else {
            DeliveryStatus::Pending
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "En attente",
            DeliveryStatus::InProgress => "En cours",
            DeliveryStatus::Delivered => "Livré",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawDepot {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    adresse: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    horaire: String,
    #[serde(rename = "coordonnées", default)]
    coordonnees: Option<Value>,
    #[serde(default, deserialize_with = "lenient::i64_list")]
    num_depot: Vec<i64>,
    #[serde(default, deserialize_with = "lenient::optional_i64")]
    ordre: Option<i64>,
}

/// Parada de depósito dentro de la tournée de una ciudad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotStop {
    /// Clave en el mapa de la ciudad ("adresse_N")
    pub address_key: String,
    pub address: String,
    pub schedule: String,
    pub coordinates: Option<Coordinates>,
    pub depot_numbers: Vec<i64>,
    pub sequence_order: i64,
    pub delivery_status: DeliveryStatus,
}

impl DepotStop {
    fn from_raw(address_key: &str, raw: RawDepot) -> Self {
        let coordinates = raw.coordonnees.as_ref().and_then(Coordinates::from_value);
        if coordinates.is_none() {
            log::warn!("⚠️ [ROUTE] Coordonnées invalides pour {} ({})", address_key, raw.adresse);
        }
        Self {
            address_key: address_key.to_string(),
            address: raw.adresse,
            schedule: raw.horaire,
            coordinates,
            depot_numbers: raw.num_depot,
            sequence_order: raw.ordre.unwrap_or(0),
            delivery_status: DeliveryStatus::Pending,
        }
    }

    pub fn has_depot_number(&self, number: i64) -> bool {
        self.depot_numbers.contains(&number)
    }

    /// Número que se espera leer en el QR de llegada
    pub fn primary_depot_number(&self) -> Option<i64> {
        self.depot_numbers.first().copied()
    }

    pub fn depot_numbers_label(&self) -> String {
        self.depot_numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Documento "Tournee/{jour}"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub day: String,
    pub active: bool,
    pub info: Option<String>,
    pub kind: Option<String>,
    pub week_order: Option<i64>,
    /// Ciudad → depósitos ordenados por `ordre` ascendente
    pub cities: BTreeMap<String, Vec<DepotStop>>,
}

impl Route {
    pub fn from_fields(day: &str, fields: &Value) -> Result<Self, AppError> {
        let villes = fields
            .get("villes")
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::RouteDataMissing(format!("Tournée {} sans villes", day)))?;

        let mut cities = BTreeMap::new();
        for (city, depots) in villes {
            let Some(depots) = depots.as_object() else {
                log::warn!("⚠️ [ROUTE] Ville {} ignorée: format inattendu", city);
                continue;
            };
            let mut stops = Vec::with_capacity(depots.len());
            for (key, depot) in depots {
                let raw: RawDepot = serde_json::from_value(depot.clone())?;
                stops.push(DepotStop::from_raw(key, raw));
            }
            stops.sort_by(|a, b| {
                a.sequence_order
                    .cmp(&b.sequence_order)
                    .then_with(|| a.address_key.cmp(&b.address_key))
            });
            cities.insert(city.clone(), stops);
        }

        Ok(Self {
            day: day.to_lowercase(),
            active: fields.get("active").and_then(Value::as_bool).unwrap_or(true),
            info: fields.get("infos").and_then(Value::as_str).map(str::to_string),
            kind: fields.get("type").and_then(Value::as_str).map(str::to_string),
            week_order: fields.get("ordre_semaine").and_then(lenient::value_as_i64),
            cities,
        })
    }

    pub fn city_names(&self) -> Vec<String> {
        self.cities.keys().cloned().collect()
    }

    pub fn stops(&self, city: &str) -> Result<&[DepotStop], AppError> {
        self.cities
            .get(city)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::RouteDataMissing(format!("Aucun dépôt trouvé pour {}", city)))
    }

    pub fn depot_count(&self) -> usize {
        self.cities.values().map(Vec::len).sum()
    }
}

/// Depósito que contiene el número escaneado
pub fn find_by_depot_number(stops: &[DepotStop], number: i64) -> Option<&DepotStop> {
    stops.iter().find(|s| s.has_depot_number(number))
}

pub fn find_by_address_key<'a>(stops: &'a [DepotStop], address_key: &str) -> Option<&'a DepotStop> {
    stops.iter().find(|s| s.address_key == address_key)
}

/// Siguiente depósito por orden ascendente; None al final de la tournée
pub fn next_stop<'a>(stops: &'a [DepotStop], current: &DepotStop) -> Option<&'a DepotStop> {
    stops
        .iter()
        .filter(|s| {
            s.sequence_order > current.sequence_order
                || (s.sequence_order == current.sequence_order && s.address_key > current.address_key)
        })
        .min_by(|a, b| {
            a.sequence_order
                .cmp(&b.sequence_order)
                .then_with(|| a.address_key.cmp(&b.address_key))
        })
}

/// Región visible del mapa
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

const MIN_REGION_SPAN: f64 = 0.02;
const REGION_MARGIN: f64 = 1.5;

impl MapRegion {
    /// Caja englobante de los depósitos con coordenadas válidas
    pub fn fit(stops: &[DepotStop], defaults: &MapConfig) -> Self {
        let coords: Vec<Coordinates> = stops.iter().filter_map(|s| s.coordinates).collect();
        if coords.is_empty() {
            return Self {
                latitude: defaults.default_center_lat,
                longitude: defaults.default_center_lng,
                latitude_delta: defaults.default_span,
                longitude_delta: defaults.default_span,
            };
        }

        let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
        let (mut min_lng, mut max_lng) = (f64::MAX, f64::MIN);
        for c in &coords {
            min_lat = min_lat.min(c.latitude);
            max_lat = max_lat.max(c.latitude);
            min_lng = min_lng.min(c.longitude);
            max_lng = max_lng.max(c.longitude);
        }

        Self {
            latitude: (min_lat + max_lat) / 2.0,
            longitude: (min_lng + max_lng) / 2.0,
            latitude_delta: ((max_lat - min_lat) * REGION_MARGIN).max(MIN_REGION_SPAN),
            longitude_delta: ((max_lng - min_lng) * REGION_MARGIN).max(MIN_REGION_SPAN),
        }
    }
}

/// Clave del documento Tournee para un día de la semana
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    }
}

pub fn today_key() -> &'static str {
    weekday_key(chrono::Local::now().weekday())
}

/// "lundi" → "Lundi"
pub fn capitalize(day: &str) -> String {
    let mut chars = day.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tournee() -> Value {
        json!({
            "active": true,
            "infos": "Livraison du matin",
            "jour": "Lundi",
            "ordre_semaine": "1",
            "type": "hebdo",
            "villes": {
                "Lyon": {
                    "adresse_2": {
                        "adresse": "2 rue Garibaldi",
                        "horaire": "10h-11h",
                        "coordonnées": { "latitude": "45.76", "longitude": 4.85 },
                        "num_depot": [12, "13"],
                        "ordre": 2
                    },
                    "adresse_1": {
                        "adresse": "1 place Bellecour",
                        "horaire": "9h-10h",
                        "coordonnées": { "latitude": 45.75, "longitude": 4.83 },
                        "num_depot": ["7"],
                        "ordre": 1
                    },
                    "adresse_3": {
                        "adresse": "Quai perdu",
                        "horaire": "11h",
                        "coordonnées": { "latitude": 120.0, "longitude": 4.9 },
                        "num_depot": [20],
                        "ordre": 3
                    }
                },
                "Villeurbanne": {}
            }
        })
    }

    #[test]
    fn parses_cities_sorted_by_order() {
        let route = Route::from_fields("Lundi", &tournee()).unwrap();
        assert_eq!(route.day, "lundi");
        assert_eq!(route.week_order, Some(1));
        assert_eq!(route.city_names(), vec!["Lyon".to_string(), "Villeurbanne".to_string()]);
        let stops = route.stops("Lyon").unwrap();
        let keys: Vec<&str> = stops.iter().map(|s| s.address_key.as_str()).collect();
        assert_eq!(keys, vec!["adresse_1", "adresse_2", "adresse_3"]);
        assert_eq!(stops[1].depot_numbers, vec![12, 13]);
        assert_eq!(stops[1].coordinates, Some(Coordinates { latitude: 45.76, longitude: 4.85 }));
    }

    #[test]
    fn out_of_range_coordinates_are_dropped() {
        let route = Route::from_fields("lundi", &tournee()).unwrap();
        let stops = route.stops("Lyon").unwrap();
        assert_eq!(stops[2].coordinates, None);
        assert_eq!(Coordinates::checked(-90.0, 180.0), Some(Coordinates { latitude: -90.0, longitude: 180.0 }));
        assert_eq!(Coordinates::checked(f64::NAN, 0.0), None);
    }

    #[test]
    fn unknown_city_is_route_data_missing() {
        let route = Route::from_fields("lundi", &tournee()).unwrap();
        assert!(matches!(route.stops("Paris"), Err(AppError::RouteDataMissing(_))));
        assert!(matches!(
            Route::from_fields("lundi", &json!({ "active": true })),
            Err(AppError::RouteDataMissing(_))
        ));
    }

    #[test]
    fn next_stop_follows_sequence_and_ends() {
        let route = Route::from_fields("lundi", &tournee()).unwrap();
        let stops = route.stops("Lyon").unwrap();
        assert_eq!(next_stop(stops, &stops[0]).map(|s| s.address_key.as_str()), Some("adresse_2"));
        assert_eq!(next_stop(stops, &stops[1]).map(|s| s.address_key.as_str()), Some("adresse_3"));
        assert_eq!(next_stop(stops, &stops[2]), None);
    }

    #[test]
    fn finds_depot_by_scanned_number() {
        let route = Route::from_fields("lundi", &tournee()).unwrap();
        let stops = route.stops("Lyon").unwrap();
        assert_eq!(find_by_depot_number(stops, 13).map(|s| s.address_key.as_str()), Some("adresse_2"));
        assert!(find_by_depot_number(stops, 99).is_none());
        assert_eq!(stops[1].primary_depot_number(), Some(12));
        assert_eq!(stops[1].depot_numbers_label(), "12, 13");
    }

    #[test]
    fn region_fits_valid_depots_with_margin() {
        let route = Route::from_fields("lundi", &tournee()).unwrap();
        let region = MapRegion::fit(route.stops("Lyon").unwrap(), &MapConfig::default());
        assert!((region.latitude - 45.755).abs() < 1e-9);
        assert!((region.longitude - 4.84).abs() < 1e-9);
        assert!((region.latitude_delta - 0.02).abs() < 1e-9);
        assert!((region.longitude_delta - 0.03).abs() < 1e-9);
    }

    #[test]
    fn empty_region_defaults_to_france() {
        let region = MapRegion::fit(&[], &MapConfig::default());
        assert_eq!(region.latitude, 46.603354);
        assert_eq!(region.longitude, 1.888334);
        assert_eq!(region.latitude_delta, 10.0);
    }

    #[test]
    fn weekday_keys_are_french() {
        assert_eq!(weekday_key(Weekday::Mon), "lundi");
        assert_eq!(weekday_key(Weekday::Sun), "dimanche");
        assert_eq!(capitalize("mercredi"), "Mercredi");
    }

    #[test]
    fn delivery_status_follows_orders() {
        let order = |statut: &str| {
            BasketOrder::from_fields("x", json!({ "statut": statut, "panier": { "simple": 1 } })).unwrap()
        };
        assert_eq!(DeliveryStatus::from_orders(&[]), DeliveryStatus::Pending);
        assert_eq!(DeliveryStatus::from_orders(&[order("En attente")]), DeliveryStatus::Pending);
        assert_eq!(
            DeliveryStatus::from_orders(&[order("Livré"), order("En attente")]),
            DeliveryStatus::InProgress
        );
        assert_eq!(DeliveryStatus::from_orders(&[order("Livré"), order("Livré")]), DeliveryStatus::Delivered);
    }
}
