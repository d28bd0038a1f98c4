use serde::{Deserialize, Serialize};
use std::fmt;
use crate::models::lenient;

// ============================================================================
// PANIERS - Pedidos de cestas (colección "Panier")
// ============================================================================

/// Tipo de cesta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasketType {
    #[serde(rename = "familial")]
    Familial,
    #[serde(rename = "simple")]
    Simple,
    #[serde(rename = "oeuf")]
    Egg,
}

impl BasketType {
    pub const ALL: [BasketType; 3] = [BasketType::Familial, BasketType::Simple, BasketType::Egg];

    pub fn key(&self) -> &'static str {
        match self {
            BasketType::Familial => "familial",
            BasketType::Simple => "simple",
            BasketType::Egg => "oeuf",
        }
    }

    /// Etiqueta con plural francés
    pub fn label(&self, quantity: u32) -> String {
        let plural = quantity > 1;
        match self {
            BasketType::Familial => format!(
                "{} Panier{} Familial{}",
                quantity,
                if plural { "s" } else { "" },
                if plural { "s" } else { "" }
            ),
            BasketType::Simple => format!(
                "{} Panier{} Simple{}",
                quantity,
                if plural { "s" } else { "" },
                if plural { "s" } else { "" }
            ),
            BasketType::Egg => format!("{} Boîte{} d'Œufs", quantity, if plural { "s" } else { "" }),
        }
    }
}

impl fmt::Display for BasketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Estado de un panier tal como se guarda en el campo `statut`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BasketStatus {
    #[default]
    #[serde(rename = "En attente")]
    Pending,
    #[serde(rename = "En cours")]
    InProgress,
    #[serde(rename = "Livré")]
    Delivered,
}

impl BasketStatus {
    pub const ALL: [BasketStatus; 3] = [BasketStatus::Pending, BasketStatus::InProgress, BasketStatus::Delivered];

    pub fn as_str(&self) -> &'static str {
        match self {
            BasketStatus::Pending => "En attente",
            BasketStatus::InProgress => "En cours",
            BasketStatus::Delivered => "Livré",
        }
    }

    /// Valores desconocidos se tratan como "En attente"
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "En cours" => BasketStatus::InProgress,
            "Livré" => BasketStatus::Delivered,
            _ => BasketStatus::Pending,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            BasketStatus::Pending => "status-pending",
            BasketStatus::InProgress => "status-in-progress",
            BasketStatus::Delivered => "status-delivered",
        }
    }
}

impl fmt::Display for BasketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cantidades por tipo (`panier: {familial, oeuf, simple}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasketCounts {
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub familial: u32,
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub oeuf: u32,
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub simple: u32,
}

impl BasketCounts {
    pub fn get(&self, kind: BasketType) -> u32 {
        match kind {
            BasketType::Familial => self.familial,
            BasketType::Simple => self.simple,
            BasketType::Egg => self.oeuf,
        }
    }

    /// Las cantidades llegan acotadas a u32::MAX: las sumas saturan
    pub fn total(&self) -> u32 {
        self.familial.saturating_add(self.simple).saturating_add(self.oeuf)
    }

    pub fn add(&mut self, other: &BasketCounts) {
        self.familial = self.familial.saturating_add(other.familial);
        self.simple = self.simple.saturating_add(other.simple);
        self.oeuf = self.oeuf.saturating_add(other.oeuf);
    }
}

/// Códigos QR esperados (`panierCode: {codeFamilial, codeSimple}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasketCodes {
    #[serde(rename = "codeFamilial", default, deserialize_with = "lenient::optional_code")]
    pub familial: Option<i64>,
    #[serde(rename = "codeSimple", default, deserialize_with = "lenient::optional_code")]
    pub simple: Option<i64>,
}

impl BasketCodes {
    /// Las cajas de huevos nunca llevan código
    pub fn get(&self, kind: BasketType) -> Option<i64> {
        match kind {
            BasketType::Familial => self.familial,
            BasketType::Simple => self.simple,
            BasketType::Egg => None,
        }
    }

    fn or(self, fallback: BasketCodes) -> BasketCodes {
        BasketCodes {
            familial: self.familial.or(fallback.familial),
            simple: self.simple.or(fallback.simple),
        }
    }
}

/// Documento "Panier" tal como llega de Firestore (ya decodificado)
#[derive(Debug, Clone, Deserialize)]
struct RawBasketOrder {
    #[serde(default)]
    panier: Option<BasketCounts>,
    #[serde(rename = "panierCode", default)]
    panier_code: Option<BasketCodes>,
    // Esquema antiguo: códigos al primer nivel
    #[serde(rename = "codeFamilial", default, deserialize_with = "lenient::optional_code")]
    code_familial: Option<i64>,
    #[serde(rename = "codeSimple", default, deserialize_with = "lenient::optional_code")]
    code_simple: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    statut: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    adresse: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    ville: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    tourneeid: String,
    #[serde(default)]
    nomadd: Option<String>,
    #[serde(default)]
    commentaire: Option<String>,
}

/// Pedido de cestas de un cliente en un depósito
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketOrder {
    pub id: String,
    pub counts: BasketCounts,
    pub codes: BasketCodes,
    pub status: BasketStatus,
    /// Clave de dirección del depósito ("adresse_N"), clave de unión canónica
    pub address_key: String,
    pub city: String,
    pub route_day: String,
    pub display_name: Option<String>,
    pub comment: Option<String>,
}

impl BasketOrder {
    /// Construir desde los campos decodificados de un documento Panier
    pub fn from_fields(id: &str, fields: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw: RawBasketOrder = serde_json::from_value(fields)?;
        let legacy = BasketCodes {
            familial: raw.code_familial,
            simple: raw.code_simple,
        };
        let codes = raw.panier_code.unwrap_or_default().or(legacy);

        Ok(Self {
            id: id.to_string(),
            counts: raw.panier.unwrap_or_default(),
            codes,
            status: BasketStatus::parse(&raw.statut),
            address_key: raw.adresse,
            city: raw.ville,
            route_day: raw.tourneeid,
            display_name: raw.nomadd.filter(|s| !s.trim().is_empty()),
            comment: raw.commentaire.filter(|s| !s.trim().is_empty()),
        })
    }

    /// Requisitos de escaneo: familial, simple, huevos (solo cantidades > 0).
    /// Siempre parte de scanned_count = 0.
    pub fn requirements(&self) -> Vec<BasketRequirement> {
        BasketType::ALL
            .iter()
            .filter(|kind| self.counts.get(**kind) > 0)
            .map(|kind| BasketRequirement::new(*kind, self.counts.get(*kind), self.codes.get(*kind)))
            .collect()
    }

    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.address_key)
    }
}

/// Requisito de escaneo de un tipo de cesta.
/// Invariante: scanned_count <= required_quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketRequirement {
    pub kind: BasketType,
    pub required_quantity: u32,
    pub expected_code: Option<i64>,
    scanned_count: u32,
}

impl BasketRequirement {
    pub fn new(kind: BasketType, required_quantity: u32, expected_code: Option<i64>) -> Self {
        Self {
            kind,
            required_quantity,
            expected_code: if kind == BasketType::Egg { None } else { expected_code },
            scanned_count: 0,
        }
    }

    pub fn scanned_count(&self) -> u32 {
        self.scanned_count
    }

    pub fn is_complete(&self) -> bool {
        self.scanned_count >= self.required_quantity
    }

    pub fn remaining(&self) -> u32 {
        self.required_quantity.saturating_sub(self.scanned_count)
    }

    /// Solo los tipos con código se ofrecen al escáner
    pub fn is_scannable(&self) -> bool {
        self.expected_code.is_some()
    }

    /// Incrementa sin superar nunca la cantidad requerida; devuelve si hubo cambio
    pub(crate) fn increment(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.scanned_count += 1;
        true
    }

    /// Entrega confirmada a mano (tipos sin código)
    pub(crate) fn fill(&mut self) {
        self.scanned_count = self.required_quantity;
    }
}

/// Totales por tipo de una lista de pedidos
pub fn totals(orders: &[BasketOrder]) -> BasketCounts {
    let mut total = BasketCounts::default();
    for order in orders {
        total.add(&order.counts);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_fields() -> serde_json::Value {
        json!({
            "panier": { "familial": 2, "oeuf": "1", "simple": 0 },
            "panierCode": { "codeFamilial": 111, "codeSimple": null },
            "statut": "En attente",
            "adresse": "adresse_1",
            "ville": "Lyon",
            "tourneeid": "lundi",
            "nomadd": "Mairie",
        })
    }

    #[test]
    fn parses_panier_document() {
        let order = BasketOrder::from_fields("p1", order_fields()).unwrap();
        assert_eq!(order.counts, BasketCounts { familial: 2, oeuf: 1, simple: 0 });
        assert_eq!(order.codes.familial, Some(111));
        assert_eq!(order.codes.simple, None);
        assert_eq!(order.status, BasketStatus::Pending);
        assert_eq!(order.address_key, "adresse_1");
        assert_eq!(order.title(), "Mairie");
        assert_eq!(order.comment, None);
    }

    #[test]
    fn falls_back_to_legacy_top_level_codes() {
        let order = BasketOrder::from_fields("p2", json!({
            "panier": { "simple": 1 },
            "codeSimple": "222",
            "statut": "En cours",
            "adresse": "adresse_3",
        })).unwrap();
        assert_eq!(order.codes.simple, Some(222));
        assert_eq!(order.status, BasketStatus::InProgress);
        assert_eq!(order.title(), "adresse_3");
    }

    #[test]
    fn requirements_follow_type_order_and_skip_empty_types() {
        let order = BasketOrder::from_fields("p1", order_fields()).unwrap();
        let reqs = order.requirements();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].kind, BasketType::Familial);
        assert_eq!(reqs[0].expected_code, Some(111));
        assert_eq!(reqs[1].kind, BasketType::Egg);
        assert_eq!(reqs[1].expected_code, None);
        assert!(reqs.iter().all(|r| r.scanned_count() == 0));
    }

    #[test]
    fn rebuilding_requirements_is_deterministic() {
        let first = BasketOrder::from_fields("p1", order_fields()).unwrap().requirements();
        let second = BasketOrder::from_fields("p1", order_fields()).unwrap().requirements();
        assert_eq!(first, second);
    }

    #[test]
    fn egg_requirement_never_carries_a_code() {
        let req = BasketRequirement::new(BasketType::Egg, 2, Some(42));
        assert_eq!(req.expected_code, None);
        assert!(!req.is_scannable());
    }

    #[test]
    fn increment_is_capped() {
        let mut req = BasketRequirement::new(BasketType::Simple, 1, Some(5));
        assert!(req.increment());
        assert!(!req.increment());
        assert_eq!(req.scanned_count(), 1);
        assert_eq!(req.remaining(), 0);
    }

    #[test]
    fn status_round_trips_through_french_labels() {
        for status in BasketStatus::ALL {
            assert_eq!(BasketStatus::parse(status.as_str()), status);
        }
        assert_eq!(BasketStatus::parse("inconnu"), BasketStatus::Pending);
    }

    #[test]
    fn labels_use_plural_forms() {
        assert_eq!(BasketType::Familial.label(1), "1 Panier Familial");
        assert_eq!(BasketType::Simple.label(3), "3 Paniers Simples");
        assert_eq!(BasketType::Egg.label(2), "2 Boîtes d'Œufs");
    }

    #[test]
    fn totals_sum_every_order() {
        let a = BasketOrder::from_fields("a", order_fields()).unwrap();
        let b = BasketOrder::from_fields("b", json!({ "panier": { "simple": 4 } })).unwrap();
        assert_eq!(totals(&[a, b]), BasketCounts { familial: 2, oeuf: 1, simple: 4 });
    }

    #[test]
    fn oversized_quantities_saturate_instead_of_overflowing() {
        let order = BasketOrder::from_fields("big", json!({
            "panier": { "familial": "99999999999", "simple": 5 },
        })).unwrap();
        assert_eq!(order.counts.familial, u32::MAX);
        assert_eq!(order.counts.total(), u32::MAX);

        let sum = totals(&[order.clone(), order]);
        assert_eq!(sum.familial, u32::MAX);
        assert_eq!(sum.simple, 10);
    }
}
