// ============================================================================
// DESERIALIZACIÓN TOLERANTE - Campos numéricos guardados como número o texto
// ============================================================================
// Los documentos se editan a mano en la consola: "2", 2 y 2.0 valen lo mismo.
// ============================================================================

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Número desde un valor JSON arbitrario (número o texto numérico)
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Entero desde un valor JSON arbitrario; los decimales se truncan
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Cantidad: ausente, nula o ilegible cuenta como 0
pub fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_i64)
        .filter(|n| *n > 0)
        .map(|n| n.min(u32::MAX as i64) as u32)
        .unwrap_or(0))
}

/// Código QR: 0, nulo o ilegible significa "sin código"
pub fn optional_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64).filter(|code| *code != 0))
}

pub fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}

/// Lista de enteros; los elementos ilegibles se descartan
pub fn i64_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_i64).collect(),
        Some(other) => value_as_i64(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Texto: nulo cuenta como vacío
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "quantity")]
        qty: u32,
        #[serde(default, deserialize_with = "optional_code")]
        code: Option<i64>,
        #[serde(default, deserialize_with = "i64_list")]
        list: Vec<i64>,
    }

    #[test]
    fn accepts_numbers_and_numeric_text() {
        let sample: Sample = serde_json::from_value(json!({
            "qty": "3", "code": 111, "list": [12, "13", "x"]
        })).unwrap();
        assert_eq!(sample.qty, 3);
        assert_eq!(sample.code, Some(111));
        assert_eq!(sample.list, vec![12, 13]);
    }

    #[test]
    fn missing_or_zero_fields_fall_back() {
        let sample: Sample = serde_json::from_value(json!({ "qty": null, "code": 0 })).unwrap();
        assert_eq!(sample.qty, 0);
        assert_eq!(sample.code, None);
        assert!(sample.list.is_empty());

        let negative: Sample = serde_json::from_value(json!({ "qty": -2 })).unwrap();
        assert_eq!(negative.qty, 0);
    }

    #[test]
    fn truncates_decimal_values() {
        assert_eq!(value_as_i64(&json!(2.9)), Some(2));
        assert_eq!(value_as_i64(&json!(" 7.0 ")), Some(7));
        assert_eq!(value_as_f64(&json!("48.85")), Some(48.85));
        assert_eq!(value_as_f64(&json!(true)), None);
    }
}
