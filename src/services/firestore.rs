// ============================================================================
// FIRESTORE CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// Lecturas, consultas y escrituras sobre la API REST v1. Sin lógica de negocio.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder, Response};
use serde_json::Value;
use crate::config::CONFIG;
use crate::error::AppError;
use crate::services::firestore_codec::{documents_from_query_response, encode_fields, Document};
use crate::services::firestore_query::StructuredQuery;

#[derive(Clone)]
pub struct FirestoreClient {
    documents_url: String,
    id_token: Option<String>,
}

impl FirestoreClient {
    pub fn new(id_token: Option<String>) -> Self {
        Self::with_base(CONFIG.firestore_documents_url(), id_token)
    }

    pub fn with_base(documents_url: String, id_token: Option<String>) -> Self {
        Self {
            documents_url: documents_url.trim_end_matches('/').to_string(),
            id_token,
        }
    }

    pub fn document_url(&self, path: &str) -> String {
        format!("{}/{}", self.documents_url, path.trim_start_matches('/'))
    }

    pub fn query_url(&self) -> String {
        format!("{}:runQuery", self.documents_url)
    }

    /// PATCH limitado a los campos dados (updateDoc); sin máscara equivale a setDoc
    pub fn patch_url(&self, path: &str, mask: Option<&[&str]>) -> String {
        let base = self.document_url(path);
        match mask {
            Some(fields) if !fields.is_empty() => {
                let params: Vec<String> = fields
                    .iter()
                    .map(|f| format!("updateMask.fieldPaths={}", f))
                    .collect();
                format!("{}?{}", base, params.join("&"))
            }
            _ => base,
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.id_token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// GET de un documento; 404 → None
    pub async fn get_document(&self, path: &str) -> Result<Option<Document>, AppError> {
        let url = self.document_url(path);
        log::debug!("📋 [FIRESTORE] GET {}", path);

        let response = self.authorize(Request::get(&url)).send().await?;
        if response.status() == 404 {
            log::info!("⚠️ [FIRESTORE] Document {} introuvable", path);
            return Ok(None);
        }
        let body: Value = check(response, path).await?.json().await?;
        Document::from_rest(&body).map(Some)
    }

    pub async fn run_query(&self, query: &StructuredQuery) -> Result<Vec<Document>, AppError> {
        log::debug!("🔍 [FIRESTORE] runQuery sur {}", query.collection_id());

        let response = self
            .authorize(Request::post(&self.query_url()))
            .json(&query.to_body())?
            .send()
            .await?;
        let body: Value = check(response, query.collection_id()).await?.json().await?;
        let documents = documents_from_query_response(&body)?;
        log::debug!("✅ [FIRESTORE] {} documents ({})", documents.len(), query.collection_id());
        Ok(documents)
    }

    /// Actualiza solo los campos presentes en `fields` (objeto plano)
    pub async fn update_fields(&self, path: &str, fields: &Value) -> Result<(), AppError> {
        let keys: Vec<&str> = fields
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        self.patch(path, &encode_fields(fields), Some(&keys)).await
    }

    /// Crea o reemplaza el documento con campos ya tipados
    pub async fn set_document(&self, path: &str, typed_fields: &Value) -> Result<(), AppError> {
        self.patch(path, typed_fields, None).await
    }

    async fn patch(&self, path: &str, typed_fields: &Value, mask: Option<&[&str]>) -> Result<(), AppError> {
        let url = self.patch_url(path, mask);
        log::debug!("✏️ [FIRESTORE] PATCH {}", path);

        let body = serde_json::json!({ "fields": typed_fields });
        let response = self
            .authorize(Request::patch(&url))
            .json(&body)?
            .send()
            .await?;
        check(response, path).await?;
        Ok(())
    }
}

/// Convierte una respuesta no-2xx en AppError
async fn check(response: Response, what: &str) -> Result<Response, AppError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    log::error!("❌ [FIRESTORE] HTTP {} sur {}: {}", status, what, text);
    Err(status_error(status, what, &text))
}

pub fn status_error(status: u16, what: &str, text: &str) -> AppError {
    match status {
        404 => AppError::NotFound(what.to_string()),
        401 | 403 => AppError::Auth(format!("Accès refusé à {}", what)),
        _ => AppError::Network(format!("HTTP {}: {}", status, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FirestoreClient {
        FirestoreClient::with_base(
            "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents/".to_string(),
            Some("tok".to_string()),
        )
    }

    #[test]
    fn builds_document_and_query_urls() {
        let c = client();
        assert_eq!(
            c.document_url("Tournee/lundi"),
            "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents/Tournee/lundi"
        );
        assert!(c.query_url().ends_with("/documents:runQuery"));
    }

    #[test]
    fn patch_url_carries_update_mask() {
        let c = client();
        assert!(c.patch_url("Panier/p1", Some(&["statut"])).ends_with("Panier/p1?updateMask.fieldPaths=statut"));
        assert!(c
            .patch_url("Client/c1", Some(&["a", "b"]))
            .ends_with("?updateMask.fieldPaths=a&updateMask.fieldPaths=b"));
        assert!(c.patch_url("Notifications/n1", None).ends_with("Notifications/n1"));
    }

    #[test]
    fn maps_http_status_to_errors() {
        assert_eq!(status_error(404, "Panier/x", ""), AppError::NotFound("Panier/x".into()));
        assert!(matches!(status_error(403, "Client", ""), AppError::Auth(_)));
        assert!(matches!(status_error(503, "Client", "down"), AppError::Network(msg) if msg.contains("503")));
    }
}
