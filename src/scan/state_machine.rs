// ============================================================================
// SCAN STATE MACHINE - Validación de QR de paniers y de llegada al depósito
// ============================================================================
// Idle → Scanning(tipo) → Idle ... → AllComplete
// El bloqueo (scan_locked) es un debounce: el contador nunca supera la
// cantidad requerida aunque lleguen lecturas duplicadas.
// ============================================================================

use std::collections::VecDeque;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::basket::{BasketOrder, BasketRequirement, BasketStatus, BasketType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Scanning(BasketType),
    AllComplete,
}

/// Resultado de una lectura del escáner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Lectura válida, el tipo sigue incompleto y el escáner abierto
    Counted { kind: BasketType, scanned: u32, required: u32 },
    /// El tipo ha llegado a su cantidad: el escáner se cierra
    TypeComplete { kind: BasketType, required: u32, all_complete: bool },
    /// Lectura rechazada, el estado no cambia
    Rejected(ScanError),
    /// Bloqueado (cooldown) o sin tipo activo
    Ignored,
}

impl ScanOutcome {
    pub fn message(&self) -> Option<String> {
        match self {
            ScanOutcome::Counted { kind, scanned, required } => {
                Some(format!("Panier {} validé ! ({}/{})", kind, scanned, required))
            }
            ScanOutcome::TypeComplete { kind, required, all_complete } => Some(if *all_complete {
                "Tous les paniers ont été scannés !".to_string()
            } else {
                format!("Panier {} validé ! ({}/{})", kind, required, required)
            }),
            ScanOutcome::Rejected(err) => Some(err.to_string()),
            ScanOutcome::Ignored => None,
        }
    }
}

/// Parseo estricto: entero tras quitar espacios
pub fn parse_payload(payload: &str) -> Result<i64, ScanError> {
    payload
        .trim()
        .parse::<i64>()
        .map_err(|_| ScanError::MalformedPayload(payload.to_string()))
}

/// Ventana de re-armado tras una lectura
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScanLock {
    until_ms: Option<f64>,
}

impl ScanLock {
    fn new() -> Self {
        Self { until_ms: None }
    }

    fn is_locked(&self, now_ms: f64) -> bool {
        self.until_ms.map(|until| now_ms < until).unwrap_or(false)
    }

    fn engage(&mut self, now_ms: f64, duration_ms: u32) {
        self.until_ms = Some(now_ms + duration_ms as f64);
    }

    fn release(&mut self) {
        self.until_ms = None;
    }
}

/// Validador de escaneo de un pedido (un documento Panier)
#[derive(Debug, Clone, PartialEq)]
pub struct ScanValidator {
    requirements: Vec<BasketRequirement>,
    active: Option<BasketType>,
    lock: ScanLock,
    policy: ScanConfig,
}

impl ScanValidator {
    pub fn new(requirements: Vec<BasketRequirement>, policy: ScanConfig) -> Self {
        Self {
            requirements,
            active: None,
            lock: ScanLock::new(),
            policy,
        }
    }

    pub fn from_order(order: &BasketOrder, policy: ScanConfig) -> Self {
        Self::new(order.requirements(), policy)
    }

    pub fn requirements(&self) -> &[BasketRequirement] {
        &self.requirements
    }

    pub fn requirement(&self, kind: BasketType) -> Option<&BasketRequirement> {
        self.requirements.iter().find(|r| r.kind == kind)
    }

    pub fn active_type(&self) -> Option<BasketType> {
        self.active
    }

    pub fn phase(&self) -> ScanPhase {
        if self.is_all_complete() {
            ScanPhase::AllComplete
        } else {
            match self.active {
                Some(kind) => ScanPhase::Scanning(kind),
                None => ScanPhase::Idle,
            }
        }
    }

    pub fn is_all_complete(&self) -> bool {
        self.requirements.iter().all(BasketRequirement::is_complete)
    }

    pub fn is_locked(&self, now_ms: f64) -> bool {
        self.lock.is_locked(now_ms)
    }

    /// Paniers que faltan por validar en este pedido
    pub fn remaining(&self) -> u32 {
        self.requirements
            .iter()
            .map(BasketRequirement::remaining)
            .fold(0, u32::saturating_add)
    }

    /// Idle → Scanning(kind). Rechazado si el tipo no existe o ya está completo.
    pub fn start(&mut self, kind: BasketType) -> Result<(), ScanError> {
        let req = self.requirement(kind).ok_or(ScanError::UnknownType(kind))?;
        if req.is_complete() {
            return Err(ScanError::AlreadyComplete(kind));
        }
        self.active = Some(kind);
        self.lock.release();
        log::info!("📷 [SCAN] Scanner ouvert pour {}", kind);
        Ok(())
    }

    /// Cierre manual del escáner
    pub fn close(&mut self) {
        self.active = None;
    }

    /// Lectura para el tipo activo
    pub fn scan(&mut self, payload: &str, now_ms: f64) -> ScanOutcome {
        if self.lock.is_locked(now_ms) {
            log::debug!("⛔ [SCAN] Lecture ignorée (cooldown)");
            return ScanOutcome::Ignored;
        }
        match self.active {
            Some(kind) => self.scan_type(kind, payload, now_ms),
            None => ScanOutcome::Ignored,
        }
    }

    /// Lectura dirigida a un tipo concreto (lo deja como tipo activo si es válido)
    pub fn scan_type(&mut self, kind: BasketType, payload: &str, now_ms: f64) -> ScanOutcome {
        if self.lock.is_locked(now_ms) {
            return ScanOutcome::Ignored;
        }

        let outcome = self.validate(kind, payload);
        match &outcome {
            Ok(ScanOutcome::TypeComplete { .. }) => {
                self.active = None;
                self.lock.engage(now_ms, self.policy.success_cooldown_ms);
            }
            Ok(_) => {
                self.active = Some(kind);
                self.lock.engage(now_ms, self.policy.success_cooldown_ms);
            }
            Err(err) => {
                log::warn!("❌ [SCAN] {}", err);
                self.lock.engage(now_ms, self.policy.cooldown_ms);
            }
        }
        outcome.unwrap_or_else(ScanOutcome::Rejected)
    }

    fn validate(&mut self, kind: BasketType, payload: &str) -> Result<ScanOutcome, ScanError> {
        let index = self
            .requirements
            .iter()
            .position(|r| r.kind == kind)
            .ok_or(ScanError::UnknownType(kind))?;

        let expected = self.requirements[index]
            .expected_code
            .ok_or(ScanError::NoCodeConfigured(kind))?;
        let scanned = parse_payload(payload)?;
        if scanned != expected {
            return Err(ScanError::CodeMismatch { kind, scanned });
        }

        let req = &mut self.requirements[index];
        if !req.increment() {
            return Err(ScanError::AlreadyComplete(kind));
        }
        let (count, required) = (req.scanned_count(), req.required_quantity);
        log::info!("✅ [SCAN] Panier {} validé ({}/{})", kind, count, required);

        if count < required {
            Ok(ScanOutcome::Counted { kind, scanned: count, required })
        } else {
            Ok(ScanOutcome::TypeComplete {
                kind,
                required,
                all_complete: self.is_all_complete(),
            })
        }
    }

    /// Confirmación manual de un tipo sin código QR (cajas de huevos)
    pub fn confirm_unscannable(&mut self, kind: BasketType) -> Result<bool, ScanError> {
        let req = self
            .requirements
            .iter_mut()
            .find(|r| r.kind == kind)
            .ok_or(ScanError::UnknownType(kind))?;
        if req.is_scannable() {
            return Err(ScanError::CodeRequired(kind));
        }
        // Solo las cajas de huevos se confirman sin QR
        if kind != BasketType::Egg {
            return Err(ScanError::NoCodeConfigured(kind));
        }
        if req.is_complete() {
            return Err(ScanError::AlreadyComplete(kind));
        }
        req.fill();
        if self.active == Some(kind) {
            self.active = None;
        }
        log::info!("✋ [SCAN] {} confirmé manuellement", kind);
        Ok(self.is_all_complete())
    }
}

/// Resultado del escaneo de llegada al depósito
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepotOutcome {
    Validated(i64),
    Rejected(ScanError),
    Ignored,
}

/// Comprobación del QR de llegada: debe contener el número del depósito
#[derive(Debug, Clone, PartialEq)]
pub struct DepotCheck {
    expected: i64,
    validated: bool,
    lock: ScanLock,
    policy: ScanConfig,
}

impl DepotCheck {
    pub fn new(expected: i64, policy: ScanConfig) -> Self {
        Self {
            expected,
            validated: false,
            lock: ScanLock::new(),
            policy,
        }
    }

    pub fn expected(&self) -> i64 {
        self.expected
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn check(&mut self, payload: &str, now_ms: f64) -> DepotOutcome {
        if self.validated || self.lock.is_locked(now_ms) {
            return DepotOutcome::Ignored;
        }
        let result = parse_payload(payload).and_then(|scanned| {
            if scanned == self.expected {
                Ok(scanned)
            } else {
                Err(ScanError::DepotMismatch { expected: self.expected, scanned })
            }
        });
        match result {
            Ok(number) => {
                self.validated = true;
                log::info!("✅ [SCAN] Dépôt {} validé", number);
                DepotOutcome::Validated(number)
            }
            Err(err) => {
                log::warn!("❌ [SCAN] {}", err);
                self.lock.engage(now_ms, self.policy.cooldown_ms);
                DepotOutcome::Rejected(err)
            }
        }
    }

    /// Volver a escanear (p.ej. "Plus tard" en la confirmación)
    pub fn reset(&mut self) {
        self.validated = false;
        self.lock.release();
    }
}

/// Pedido en curso dentro de un depósito
#[derive(Debug, Clone, PartialEq)]
pub struct OrderProgress {
    pub order: BasketOrder,
    pub validator: ScanValidator,
    /// El estado "Livré" ya está guardado en Firestore
    pub persisted: bool,
}

impl OrderProgress {
    fn new(order: BasketOrder, policy: ScanConfig) -> Self {
        let validator = ScanValidator::from_order(&order, policy);
        Self { order, validator, persisted: false }
    }

    pub fn is_complete(&self) -> bool {
        self.validator.is_all_complete()
    }

    /// Completo localmente pero sin guardar todavía
    pub fn awaiting_persistence(&self) -> bool {
        self.is_complete() && !self.persisted
    }
}

/// Cola de pedidos de un depósito; el primero es el activo
#[derive(Debug, Clone, PartialEq)]
pub struct DepotDelivery {
    pub address_key: String,
    orders: VecDeque<OrderProgress>,
}

impl DepotDelivery {
    pub fn new(address_key: &str, orders: Vec<BasketOrder>, policy: ScanConfig) -> Self {
        Self {
            address_key: address_key.to_string(),
            orders: orders.into_iter().map(|o| OrderProgress::new(o, policy)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> impl Iterator<Item = &OrderProgress> {
        self.orders.iter()
    }

    pub fn current(&self) -> Option<&OrderProgress> {
        self.orders.front()
    }

    pub fn current_mut(&mut self) -> Option<&mut OrderProgress> {
        self.orders.front_mut()
    }

    pub fn find_mut(&mut self, order_id: &str) -> Option<&mut OrderProgress> {
        self.orders.iter_mut().find(|p| p.order.id == order_id)
    }

    /// Pasa el pedido activo al final de la cola
    pub fn skip(&mut self) -> bool {
        if self.orders.len() <= 1 {
            return false;
        }
        if let Some(mut current) = self.orders.pop_front() {
            current.validator.close();
            self.orders.push_back(current);
        }
        true
    }

    /// Tras completar el activo, avanza al siguiente pedido pendiente
    pub fn advance_to_pending(&mut self) {
        let pending = self.orders.iter().position(|p| !p.is_complete());
        if let Some(index) = pending {
            self.orders.rotate_left(index);
        }
    }

    pub fn mark_persisted(&mut self, order_id: &str) -> bool {
        match self.find_mut(order_id) {
            Some(progress) if progress.is_complete() => {
                progress.persisted = true;
                progress.order.status = BasketStatus::Delivered;
                true
            }
            _ => false,
        }
    }

    /// Todos los pedidos completos (y guardados)
    pub fn is_complete(&self) -> bool {
        self.orders.iter().all(|p| p.is_complete() && p.persisted)
    }

    pub fn remaining_baskets(&self) -> u32 {
        self.orders
            .iter()
            .map(|p| p.validator.remaining())
            .fold(0, u32::saturating_add)
    }

    pub fn pending_persistence(&self) -> Vec<String> {
        self.orders
            .iter()
            .filter(|p| p.awaiting_persistence())
            .map(|p| p.order.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const POLICY: ScanConfig = ScanConfig { cooldown_ms: 1000, success_cooldown_ms: 1500 };

    fn scenario() -> ScanValidator {
        ScanValidator::new(
            vec![
                BasketRequirement::new(BasketType::Familial, 2, Some(111)),
                BasketRequirement::new(BasketType::Simple, 1, Some(222)),
            ],
            POLICY,
        )
    }

    fn scanned(v: &ScanValidator, kind: BasketType) -> u32 {
        v.requirement(kind).map(|r| r.scanned_count()).unwrap_or(0)
    }

    #[test]
    fn walks_the_reference_scenario() {
        let mut v = scenario();
        assert_eq!(v.phase(), ScanPhase::Idle);
        v.start(BasketType::Familial).unwrap();

        let first = v.scan("111", 0.0);
        assert_eq!(first, ScanOutcome::Counted { kind: BasketType::Familial, scanned: 1, required: 2 });
        assert_eq!(v.phase(), ScanPhase::Scanning(BasketType::Familial));

        let second = v.scan("111", 2000.0);
        assert_eq!(
            second,
            ScanOutcome::TypeComplete { kind: BasketType::Familial, required: 2, all_complete: false }
        );
        assert_eq!(scanned(&v, BasketType::Familial), 2);
        assert_eq!(v.phase(), ScanPhase::Idle);

        let third = v.scan_type(BasketType::Simple, "222", 4000.0);
        assert_eq!(
            third,
            ScanOutcome::TypeComplete { kind: BasketType::Simple, required: 1, all_complete: true }
        );
        assert_eq!(v.phase(), ScanPhase::AllComplete);
        assert_eq!(v.remaining(), 0);
    }

    #[test]
    fn mismatch_keeps_count_and_scanner_open() {
        let mut v = scenario();
        v.start(BasketType::Familial).unwrap();
        let outcome = v.scan("999", 0.0);
        assert_eq!(
            outcome,
            ScanOutcome::Rejected(ScanError::CodeMismatch { kind: BasketType::Familial, scanned: 999 })
        );
        assert_eq!(scanned(&v, BasketType::Familial), 0);
        assert_eq!(v.phase(), ScanPhase::Scanning(BasketType::Familial));
        assert!(v.is_locked(500.0));
        assert!(!v.is_locked(1000.0));
    }

    #[test]
    fn cooldown_ignores_duplicate_frames() {
        let mut v = scenario();
        v.start(BasketType::Familial).unwrap();
        assert!(matches!(v.scan("111", 0.0), ScanOutcome::Counted { .. }));
        assert_eq!(v.scan("111", 100.0), ScanOutcome::Ignored);
        assert_eq!(v.scan("111", 1499.0), ScanOutcome::Ignored);
        assert_eq!(scanned(&v, BasketType::Familial), 1);
        assert!(matches!(v.scan("111", 1500.0), ScanOutcome::TypeComplete { .. }));
    }

    #[test]
    fn malformed_payload_is_reported_like_a_mismatch() {
        let mut v = scenario();
        v.start(BasketType::Simple).unwrap();
        let outcome = v.scan("abc", 0.0);
        assert_eq!(outcome, ScanOutcome::Rejected(ScanError::MalformedPayload("abc".into())));
        assert_eq!(v.phase(), ScanPhase::Scanning(BasketType::Simple));
        assert!(matches!(v.scan(" 222 ", 1000.0), ScanOutcome::TypeComplete { .. }));
    }

    #[test]
    fn correct_code_on_complete_type_is_already_complete() {
        let mut v = scenario();
        assert!(matches!(v.scan_type(BasketType::Simple, "222", 0.0), ScanOutcome::TypeComplete { .. }));
        let again = v.scan_type(BasketType::Simple, "222", 5000.0);
        assert_eq!(again, ScanOutcome::Rejected(ScanError::AlreadyComplete(BasketType::Simple)));
        assert_eq!(scanned(&v, BasketType::Simple), 1);
        assert_eq!(v.start(BasketType::Simple), Err(ScanError::AlreadyComplete(BasketType::Simple)));
    }

    #[test]
    fn count_never_exceeds_requirement_under_duplicate_events() {
        let mut v = scenario();
        let mut now = 0.0;
        for _ in 0..20 {
            v.scan_type(BasketType::Familial, "111", now);
            now += 10_000.0;
            for req in v.requirements() {
                assert!(req.scanned_count() <= req.required_quantity);
            }
        }
        assert_eq!(scanned(&v, BasketType::Familial), 2);
    }

    #[test]
    fn egg_requirement_is_never_scannable() {
        let mut v = ScanValidator::new(
            vec![
                BasketRequirement::new(BasketType::Simple, 1, Some(222)),
                BasketRequirement::new(BasketType::Egg, 2, None),
            ],
            POLICY,
        );
        assert!(!v.requirement(BasketType::Egg).unwrap().is_scannable());
        v.start(BasketType::Egg).unwrap();
        assert_eq!(
            v.scan("222", 0.0),
            ScanOutcome::Rejected(ScanError::NoCodeConfigured(BasketType::Egg))
        );
        assert_eq!(v.requirement(BasketType::Egg).unwrap().scanned_count(), 0);
    }

    #[test]
    fn manual_confirmation_completes_eggs_only() {
        let mut v = ScanValidator::new(
            vec![
                BasketRequirement::new(BasketType::Simple, 1, Some(222)),
                BasketRequirement::new(BasketType::Egg, 2, None),
            ],
            POLICY,
        );
        assert_eq!(
            v.confirm_unscannable(BasketType::Simple),
            Err(ScanError::CodeRequired(BasketType::Simple))
        );
        assert_eq!(v.confirm_unscannable(BasketType::Egg), Ok(false));
        assert_eq!(
            v.confirm_unscannable(BasketType::Egg),
            Err(ScanError::AlreadyComplete(BasketType::Egg))
        );
        assert!(matches!(
            v.scan_type(BasketType::Simple, "222", 0.0),
            ScanOutcome::TypeComplete { all_complete: true, .. }
        ));
        assert_eq!(v.phase(), ScanPhase::AllComplete);
    }

    #[test]
    fn codeless_familial_cannot_be_confirmed_by_hand() {
        let order = BasketOrder::from_fields("p9", json!({
            "panier": { "familial": 2, "oeuf": 1 },
            "panierCode": { "codeFamilial": 0 },
        }))
        .unwrap();
        let mut v = ScanValidator::from_order(&order, POLICY);
        assert!(!v.requirement(BasketType::Familial).unwrap().is_scannable());

        assert_eq!(
            v.confirm_unscannable(BasketType::Familial),
            Err(ScanError::NoCodeConfigured(BasketType::Familial))
        );
        assert_eq!(scanned(&v, BasketType::Familial), 0);
        assert_eq!(v.confirm_unscannable(BasketType::Egg), Ok(false));
        assert!(!v.is_all_complete());
        assert_eq!(v.remaining(), 2);
    }

    #[test]
    fn unknown_type_is_refused() {
        let mut v = scenario();
        assert_eq!(v.start(BasketType::Egg), Err(ScanError::UnknownType(BasketType::Egg)));
        assert_eq!(
            v.scan_type(BasketType::Egg, "1", 0.0),
            ScanOutcome::Rejected(ScanError::UnknownType(BasketType::Egg))
        );
    }

    /// Todas las permutaciones de una secuencia de lecturas válidas e inválidas
    fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn all_complete_iff_every_requirement_is_met_for_any_order() {
        let events = ["F111", "F111", "S222", "F999", "Sxyz", "F111"];
        for order in permutations(&events) {
            let mut v = scenario();
            let mut now = 0.0;
            for event in order {
                let kind = if event.starts_with('F') { BasketType::Familial } else { BasketType::Simple };
                v.scan_type(kind, &event[1..], now);
                now += 10_000.0;
                let every_met = v.requirements().iter().all(|r| r.scanned_count() == r.required_quantity);
                assert_eq!(v.phase() == ScanPhase::AllComplete, every_met);
            }
            assert_eq!(v.phase(), ScanPhase::AllComplete);
        }
    }

    #[test]
    fn rebuilt_validator_starts_from_zero() {
        let fields = json!({
            "panier": { "familial": 2, "simple": 1 },
            "panierCode": { "codeFamilial": 111, "codeSimple": 222 }
        });
        let order = BasketOrder::from_fields("p1", fields.clone()).unwrap();
        let mut used = ScanValidator::from_order(&order, POLICY);
        used.scan_type(BasketType::Familial, "111", 0.0);

        let refetched = BasketOrder::from_fields("p1", fields).unwrap();
        let fresh = ScanValidator::from_order(&refetched, POLICY);
        assert_eq!(fresh, ScanValidator::from_order(&order, POLICY));
        assert_eq!(fresh.remaining(), 3);
        assert_ne!(fresh, used);
    }

    #[test]
    fn depot_check_accepts_only_its_number() {
        let mut check = DepotCheck::new(12, POLICY);
        assert_eq!(
            check.check("13", 0.0),
            DepotOutcome::Rejected(ScanError::DepotMismatch { expected: 12, scanned: 13 })
        );
        assert_eq!(check.check("12", 500.0), DepotOutcome::Ignored);
        assert_eq!(check.check("12", 1000.0), DepotOutcome::Validated(12));
        assert!(check.is_validated());
        assert_eq!(check.check("12", 5000.0), DepotOutcome::Ignored);
        check.reset();
        assert!(!check.is_validated());
    }

    fn order(id: &str, simple: u32, code: i64) -> BasketOrder {
        BasketOrder::from_fields(id, json!({
            "panier": { "simple": simple },
            "panierCode": { "codeSimple": code },
            "statut": "En attente",
            "adresse": "adresse_1"
        })).unwrap()
    }

    #[test]
    fn skip_rotates_the_active_order() {
        let mut depot = DepotDelivery::new("adresse_1", vec![order("a", 1, 1), order("b", 1, 2), order("c", 1, 3)], POLICY);
        assert_eq!(depot.current().map(|p| p.order.id.as_str()), Some("a"));
        assert!(depot.skip());
        let ids: Vec<&str> = depot.orders().map(|p| p.order.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let mut single = DepotDelivery::new("adresse_1", vec![order("a", 1, 1)], POLICY);
        assert!(!single.skip());
    }

    #[test]
    fn depot_completes_only_when_every_order_is_persisted() {
        let mut depot = DepotDelivery::new("adresse_1", vec![order("a", 1, 1), order("b", 2, 2)], POLICY);
        assert_eq!(depot.remaining_baskets(), 3);

        let current = depot.current_mut().unwrap();
        assert!(matches!(
            current.validator.scan_type(BasketType::Simple, "1", 0.0),
            ScanOutcome::TypeComplete { all_complete: true, .. }
        ));
        assert_eq!(depot.pending_persistence(), vec!["a".to_string()]);
        assert!(!depot.is_complete());
        assert!(depot.mark_persisted("a"));
        assert_eq!(depot.current().unwrap().order.status, BasketStatus::Delivered);

        depot.advance_to_pending();
        assert_eq!(depot.current().map(|p| p.order.id.as_str()), Some("b"));
        let current = depot.current_mut().unwrap();
        current.validator.scan_type(BasketType::Simple, "2", 0.0);
        current.validator.scan_type(BasketType::Simple, "2", 2000.0);
        assert_eq!(depot.remaining_baskets(), 0);
        assert!(!depot.is_complete());
        assert!(!depot.mark_persisted("zzz"));
        assert!(depot.mark_persisted("b"));
        assert!(depot.is_complete());
    }
}
