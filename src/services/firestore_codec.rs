// ============================================================================
// FIRESTORE CODEC - Valores tipados de la API REST <-> JSON plano
// ============================================================================
// {"stringValue": "x"} <-> "x", {"integerValue": "3"} <-> 3, etc.
// ============================================================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use crate::error::AppError;

/// Documento REST decodificado
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Último segmento de `name`
    pub id: String,
    pub name: String,
    /// Objeto JSON plano con los campos
    pub fields: Value,
}

impl Document {
    pub fn from_rest(doc: &Value) -> Result<Self, AppError> {
        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Parse("Document sans nom".to_string()))?;
        let id = name.rsplit('/').next().unwrap_or(name).to_string();
        let fields = doc
            .get("fields")
            .map(decode_fields)
            .unwrap_or_else(|| Value::Object(Map::new()));
        Ok(Self {
            id,
            name: name.to_string(),
            fields,
        })
    }
}

/// Respuesta de `documents:runQuery`: una entrada por documento (y readTime sueltos)
pub fn documents_from_query_response(response: &Value) -> Result<Vec<Document>, AppError> {
    let entries = response
        .as_array()
        .ok_or_else(|| AppError::Parse("Réponse runQuery inattendue".to_string()))?;
    entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .map(Document::from_rest)
        .collect()
}

/// Mapa `fields` tipado → objeto plano
pub fn decode_fields(fields: &Value) -> Value {
    match fields.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), decode_value(value)))
                .collect(),
        ),
        None => Value::Object(Map::new()),
    }
}

pub fn decode_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = map.iter().next() else {
        return Value::Null;
    };
    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(s.clone())),
            other => other.clone(),
        },
        "doubleValue" => match inner {
            Value::String(s) => s.parse::<f64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        }),
        "mapValue" => inner
            .get("fields")
            .map(decode_fields)
            .unwrap_or_else(|| Value::Object(Map::new())),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        other => {
            log::warn!("⚠️ [FIRESTORE] Type de valeur inconnu: {}", other);
            Value::Null
        }
    }
}

/// Objeto plano → mapa `fields` tipado
pub fn encode_fields(object: &Value) -> Value {
    match object.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect(),
        ),
        None => Value::Object(Map::new()),
    }
}

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(_) => json!({ "mapValue": { "fields": encode_fields(value) } }),
    }
}

/// Marca de tiempo del cliente como `timestampValue`
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    json!({ "timestampValue": at.to_rfc3339_opts(SecondsFormat::Millis, true) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_a_tournee_document() {
        let rest = json!({
            "name": "projects/p/databases/(default)/documents/Tournee/lundi",
            "fields": {
                "active": { "booleanValue": true },
                "ordre_semaine": { "integerValue": "1" },
                "villes": { "mapValue": { "fields": {
                    "Lyon": { "mapValue": { "fields": {
                        "adresse_1": { "mapValue": { "fields": {
                            "adresse": { "stringValue": "1 place Bellecour" },
                            "coordonnées": { "mapValue": { "fields": {
                                "latitude": { "doubleValue": 45.75 },
                                "longitude": { "doubleValue": 4.83 }
                            }}},
                            "num_depot": { "arrayValue": { "values": [
                                { "integerValue": "7" }, { "stringValue": "8" }
                            ]}},
                            "infos": { "nullValue": null }
                        }}}
                    }}}
                }}}
            }
        });
        let doc = Document::from_rest(&rest).unwrap();
        assert_eq!(doc.id, "lundi");
        assert_eq!(doc.fields["active"], json!(true));
        assert_eq!(doc.fields["ordre_semaine"], json!(1));
        let depot = &doc.fields["villes"]["Lyon"]["adresse_1"];
        assert_eq!(depot["coordonnées"]["latitude"], json!(45.75));
        assert_eq!(depot["num_depot"], json!([7, "8"]));
        assert_eq!(depot["infos"], Value::Null);
    }

    #[test]
    fn decodes_special_values() {
        assert_eq!(
            decode_value(&json!({ "geoPointValue": { "latitude": 1.5, "longitude": 2.5 } })),
            json!({ "latitude": 1.5, "longitude": 2.5 })
        );
        assert_eq!(
            decode_value(&json!({ "timestampValue": "2024-05-01T08:00:00Z" })),
            json!("2024-05-01T08:00:00Z")
        );
        assert_eq!(decode_value(&json!({ "arrayValue": {} })), json!([]));
        assert_eq!(decode_value(&json!({ "mapValue": {} })), json!({}));
    }

    #[test]
    fn encodes_plain_json() {
        let fields = encode_fields(&json!({
            "statut": "Livré",
            "count": 2,
            "ratio": 0.5,
            "ok": false,
            "data": { "clientId": "c1", "tags": ["a"] },
            "nothing": null
        }));
        assert_eq!(fields["statut"], json!({ "stringValue": "Livré" }));
        assert_eq!(fields["count"], json!({ "integerValue": "2" }));
        assert_eq!(fields["ratio"], json!({ "doubleValue": 0.5 }));
        assert_eq!(fields["ok"], json!({ "booleanValue": false }));
        assert_eq!(fields["nothing"], json!({ "nullValue": null }));
        assert_eq!(
            fields["data"]["mapValue"]["fields"]["tags"],
            json!({ "arrayValue": { "values": [{ "stringValue": "a" }] } })
        );
    }

    #[test]
    fn timestamps_use_millisecond_utc() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(timestamp_value(at), json!({ "timestampValue": "2023-11-14T22:13:20.000Z" }));
    }

    #[test]
    fn query_response_skips_entries_without_document() {
        let response = json!([
            { "document": { "name": "a/b/Panier/p1", "fields": { "statut": { "stringValue": "En cours" } } } },
            { "readTime": "2024-01-01T00:00:00Z" }
        ]);
        let docs = documents_from_query_response(&response).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "p1");
        assert_eq!(docs[0].fields["statut"], json!("En cours"));
        assert!(documents_from_query_response(&json!({})).is_err());
    }
}
