//! HTTP client for the remote document store.
//!
//! Speaks the document REST API: single-document reads and writes, owner
//! scoped queries, and POSTed batch/transaction op lists. Failures that never
//! produced an HTTP status map to [`RemoteError::Offline`] so the sync layer
//! can tell "unreachable" from "rejected".

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;

use async_trait::async_trait;
use nestegg_core::remote::{
    Document, DocumentFilter, RemoteDocumentStore, RemoteError, RemoteResult, TxOp, WriteOp,
};

use crate::types::{
    ApiErrorBody, BatchRequest, QueryResponse, TransactionRequest, WireTxOp, WireWriteOp,
    MISSING_DOCUMENT_CODE,
};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the NestEgg document API.
///
/// One instance is shared by the gateway and the reconciler; `reqwest::Client`
/// pools connections internally, so clones are cheap.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpDocumentStore {
    /// Create a new document store client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the document API (e.g., "https://api.nestegg.app")
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    /// Attach a bearer token to send with every request.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/v1/{}/{}", self.base_url, collection, id)
    }

    fn query_url(&self, collection: &str, owner_id: &str) -> String {
        format!(
            "{}/v1/{}?ownerId={}",
            self.base_url,
            collection,
            urlencoding::encode(owner_id)
        )
    }

    /// Create headers for an API request.
    fn headers(&self) -> RemoteResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| RemoteError::api(401, "Invalid access token format"))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> RemoteResult<T> {
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        debug!("Document API response ({}): {}", status, body);

        if !status.is_success() {
            return Err(api_error_from_parts(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            RemoteError::Serialization(format!("Failed to parse response: {}", e))
        })
    }

    /// Check a write response for success, discarding any body.
    async fn ensure_success(response: reqwest::Response) -> RemoteResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.map_err(map_transport_error)?;
        Err(api_error_from_parts(status, &body))
    }
}

#[async_trait]
impl RemoteDocumentStore for HttpDocumentStore {
    /// GET /v1/{collection}/{id}
    async fn get(&self, collection: &str, id: &str) -> RemoteResult<Option<Document>> {
        let url = self.document_url(collection, id);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::parse_response(response).await?))
    }

    /// GET /v1/{collection}?ownerId={ownerId}
    async fn query(&self, collection: &str, filter: &DocumentFilter) -> RemoteResult<Vec<Document>> {
        let DocumentFilter::OwnerId(owner_id) = filter;
        let url = self.query_url(collection, owner_id);
        debug!("Querying documents: {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(map_transport_error)?;

        let result: QueryResponse = Self::parse_response(response).await?;
        Ok(result.documents)
    }

    /// PUT /v1/{collection}/{id}
    async fn set(&self, collection: &str, id: &str, document: Document) -> RemoteResult<()> {
        let url = self.document_url(collection, id);

        let response = self
            .client
            .put(&url)
            .headers(self.headers()?)
            .json(&document)
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::ensure_success(response).await
    }

    /// PATCH /v1/{collection}/{id}
    async fn update(&self, collection: &str, id: &str, fields: Document) -> RemoteResult<()> {
        let url = self.document_url(collection, id);

        let response = self
            .client
            .patch(&url)
            .headers(self.headers()?)
            .json(&fields)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::missing_document(collection, id));
        }
        Self::ensure_success(response).await
    }

    /// POST /v1/batch
    async fn run_batch(&self, ops: Vec<WriteOp>) -> RemoteResult<()> {
        let url = format!("{}/v1/batch", self.base_url);
        let request = BatchRequest {
            ops: ops.into_iter().map(WireWriteOp::from).collect(),
        };
        debug!("Committing batch of {} ops", request.ops.len());

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::ensure_success(response).await
    }

    /// POST /v1/transactions
    async fn run_transaction(&self, ops: Vec<TxOp>) -> RemoteResult<()> {
        let url = format!("{}/v1/transactions", self.base_url);
        let request = TransactionRequest {
            ops: ops.into_iter().map(WireTxOp::from).collect(),
        };
        debug!("Committing transaction of {} ops", request.ops.len());

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::ensure_success(response).await
    }
}

/// Map a client-side `reqwest` failure. Anything that died before an HTTP
/// status came back counts as unreachable; only decode failures are data
/// errors.
pub(crate) fn map_transport_error(e: reqwest::Error) -> RemoteError {
    if e.is_decode() {
        RemoteError::Serialization(e.to_string())
    } else {
        RemoteError::offline(e.to_string())
    }
}

/// Build the error for a non-2xx response from its status and body.
fn api_error_from_parts(status: StatusCode, body: &str) -> RemoteError {
    if let Ok(error) = serde_json::from_str::<ApiErrorBody>(body) {
        if error.code.as_deref() == Some(MISSING_DOCUMENT_CODE) {
            if let (Some(collection), Some(id)) = (error.collection, error.id) {
                return RemoteError::missing_document(collection, id);
            }
        }
        if let Some(message) = error.message {
            let message = match error.code {
                Some(code) => format!("{}: {}", code, message),
                None => message,
            };
            return RemoteError::api(status.as_u16(), message);
        }
    }
    RemoteError::api(
        status.as_u16(),
        format!(
            "Request failed: {}",
            body.chars().take(200).collect::<String>()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let store = HttpDocumentStore::new("https://api.nestegg.app/");
        assert_eq!(
            store.document_url("goals", "goal_1"),
            "https://api.nestegg.app/v1/goals/goal_1"
        );
    }

    #[test]
    fn test_query_url_encodes_owner_id() {
        let store = HttpDocumentStore::new("https://api.nestegg.app");
        assert_eq!(
            store.query_url("goals", "user a+b"),
            "https://api.nestegg.app/v1/goals?ownerId=user%20a%2Bb"
        );
    }

    #[test]
    fn test_headers_carry_bearer_token() {
        let store = HttpDocumentStore::new("https://api.nestegg.app").with_auth_token("token_1");
        let headers = store.headers().unwrap();
        assert_eq!(
            headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer token_1"
        );
    }

    #[test]
    fn test_headers_without_token_skip_authorization() {
        let store = HttpDocumentStore::new("https://api.nestegg.app");
        assert!(store.headers().unwrap().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_missing_document_error_body_is_recognized() {
        let error = api_error_from_parts(
            StatusCode::NOT_FOUND,
            r#"{"code":"MISSING_DOCUMENT","message":"no such document","collection":"goals","id":"goal_9"}"#,
        );
        assert_eq!(error, RemoteError::missing_document("goals", "goal_9"));
    }

    #[test]
    fn test_api_error_keeps_code_and_message() {
        let error = api_error_from_parts(
            StatusCode::CONFLICT,
            r#"{"code":"VERSION_CONFLICT","message":"stale write"}"#,
        );
        assert_eq!(error, RemoteError::api(409, "VERSION_CONFLICT: stale write"));
    }

    #[test]
    fn test_api_error_with_unparseable_body() {
        let error = api_error_from_parts(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(
            error,
            RemoteError::api(502, "Request failed: upstream exploded")
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_offline() {
        // Nothing listens on port 1, so the connect fails immediately.
        let store = HttpDocumentStore::new("http://127.0.0.1:1");
        let error = store.get("goals", "goal_1").await.unwrap_err();
        assert!(error.is_offline());
    }
}
