// ============================================================================
// FIRESTORE QUERY - Constructor de `structuredQuery` para runQuery
// ============================================================================

use serde_json::{json, Value};
use crate::services::firestore_codec::encode_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Equal,
    In,
}

impl FieldOp {
    fn as_str(&self) -> &'static str {
        match self {
            FieldOp::Equal => "EQUAL",
            FieldOp::In => "IN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FieldFilter {
    field: String,
    op: FieldOp,
    value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredQuery {
    collection: String,
    filters: Vec<FieldFilter>,
    order_by_desc: Option<String>,
    limit: Option<u32>,
}

impl StructuredQuery {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            filters: Vec::new(),
            order_by_desc: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            op: FieldOp::Equal,
            value: value.into(),
        });
        self
    }

    pub fn where_in<V: Into<Value>>(mut self, field: &str, values: Vec<V>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            op: FieldOp::In,
            value: Value::Array(values.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by_desc = Some(field.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn collection_id(&self) -> &str {
        &self.collection
    }

    /// Cuerpo JSON de `POST documents:runQuery`
    pub fn to_body(&self) -> Value {
        let mut query = json!({
            "from": [{ "collectionId": self.collection }],
        });

        let filters: Vec<Value> = self
            .filters
            .iter()
            .map(|f| {
                json!({
                    "fieldFilter": {
                        "field": { "fieldPath": f.field },
                        "op": f.op.as_str(),
                        "value": encode_value(&f.value),
                    }
                })
            })
            .collect();

        match filters.len() {
            0 => {}
            1 => query["where"] = filters[0].clone(),
            _ => {
                query["where"] = json!({
                    "compositeFilter": { "op": "AND", "filters": filters }
                })
            }
        }

        if let Some(field) = &self.order_by_desc {
            query["orderBy"] = json!([{ "field": { "fieldPath": field }, "direction": "DESCENDING" }]);
        }
        if let Some(limit) = self.limit {
            query["limit"] = json!(limit);
        }

        json!({ "structuredQuery": query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_filter_is_emitted_bare() {
        let body = StructuredQuery::collection("Client").where_eq("email", "a@b.fr").to_body();
        assert_eq!(
            body,
            json!({ "structuredQuery": {
                "from": [{ "collectionId": "Client" }],
                "where": { "fieldFilter": {
                    "field": { "fieldPath": "email" },
                    "op": "EQUAL",
                    "value": { "stringValue": "a@b.fr" }
                }}
            }})
        );
    }

    #[test]
    fn several_filters_are_and_composed() {
        let body = StructuredQuery::collection("Panier")
            .where_eq("tourneeid", "lundi")
            .where_eq("adresse", "adresse_1")
            .where_in("statut", vec!["En attente", "En cours"])
            .to_body();
        let composite = &body["structuredQuery"]["where"]["compositeFilter"];
        assert_eq!(composite["op"], "AND");
        let filters = composite["filters"].as_array().unwrap();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[2]["fieldFilter"]["op"], "IN");
        assert_eq!(
            filters[2]["fieldFilter"]["value"],
            json!({ "arrayValue": { "values": [
                { "stringValue": "En attente" }, { "stringValue": "En cours" }
            ]}})
        );
    }

    #[test]
    fn order_and_limit_are_optional() {
        let body = StructuredQuery::collection("Notifications")
            .where_eq("clientId", "c1")
            .order_by_desc("timestamp")
            .limit(50)
            .to_body();
        assert_eq!(
            body["structuredQuery"]["orderBy"],
            json!([{ "field": { "fieldPath": "timestamp" }, "direction": "DESCENDING" }])
        );
        assert_eq!(body["structuredQuery"]["limit"], json!(50));

        let bare = StructuredQuery::collection("Client").to_body();
        assert!(bare["structuredQuery"].get("where").is_none());
    }
}
