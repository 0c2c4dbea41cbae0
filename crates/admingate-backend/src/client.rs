//! Backend REST client: the CRUD executor and the upload forwarder.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use admingate_core::{GatewayError, ListQuery, Result};

use crate::normalize::{map_transport, normalize_json};

/// A file part lifted from the inbound multipart stream, re-encoded verbatim
/// for the backend.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Multipart field name from the inbound request.
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Backend reply to an upload, passed through to the caller unchanged.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// HTTP client for the backend REST API.
///
/// Stateless: one instance is shared across requests, holding only the
/// connection pool and the base URL.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::internal(format!(
                "backend base URL cannot hold path segments: {base_url}"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can hold path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `GET /{resource}` with `page`/`limit`/`search` and pass-through
    /// filters forwarded verbatim. Used for resources whose backend supports
    /// query-level filtering; the body is returned as-is.
    #[instrument(skip(self, query, token), fields(resource = resource))]
    pub async fn list(
        &self,
        resource: &str,
        query: &ListQuery,
        token: Option<&str>,
    ) -> Result<Value> {
        let mut pairs: Vec<(String, String)> = vec![
            ("page".into(), query.page.to_string()),
            ("limit".into(), query.limit.to_string()),
        ];
        if let Some(search) = &query.search {
            pairs.push(("search".into(), search.clone()));
        }
        for (key, value) in &query.filters {
            pairs.push((key.clone(), value.clone()));
        }

        let request = Self::authorize(self.http.get(self.endpoint(&[resource])), token)
            .query(&pairs);
        debug!(params = pairs.len(), "forwarding list request");
        normalize_json(request.send().await.map_err(map_transport)?).await
    }

    /// `GET /{resource}` without pagination parameters: fetches the full
    /// collection for client-side post-processing. Pass-through filters are
    /// still forwarded.
    #[instrument(skip(self, query, token), fields(resource = resource))]
    pub async fn fetch_all(
        &self,
        resource: &str,
        query: &ListQuery,
        token: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut request = Self::authorize(self.http.get(self.endpoint(&[resource])), token);
        if !query.filters.is_empty() {
            let pairs: Vec<(&String, &String)> = query.filters.iter().collect();
            request = request.query(&pairs);
        }
        let body = normalize_json(request.send().await.map_err(map_transport)?).await?;
        admingate_core::BackendEnvelope::parse(&body).into_collection()
    }

    /// `GET /{resource}/{id}`, body passed through verbatim.
    #[instrument(skip(self, token), fields(resource = resource, id = id))]
    pub async fn get_one(&self, resource: &str, id: &str, token: Option<&str>) -> Result<Value> {
        let request = Self::authorize(self.http.get(self.endpoint(&[resource, id])), token);
        normalize_json(request.send().await.map_err(map_transport)?).await
    }

    /// `POST /{resource}`.
    #[instrument(skip(self, body, token), fields(resource = resource))]
    pub async fn create(&self, resource: &str, body: &Value, token: Option<&str>) -> Result<Value> {
        let request =
            Self::authorize(self.http.post(self.endpoint(&[resource])), token).json(body);
        normalize_json(request.send().await.map_err(map_transport)?).await
    }

    /// `PATCH /{resource}/{id}`.
    #[instrument(skip(self, body, token), fields(resource = resource, id = id))]
    pub async fn update(
        &self,
        resource: &str,
        id: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<Value> {
        let request =
            Self::authorize(self.http.patch(self.endpoint(&[resource, id])), token).json(body);
        normalize_json(request.send().await.map_err(map_transport)?).await
    }

    /// `DELETE /{resource}/{id}`. Write failures surface loudly; success
    /// discards whatever body the backend returned.
    #[instrument(skip(self, token), fields(resource = resource, id = id))]
    pub async fn delete(&self, resource: &str, id: &str, token: Option<&str>) -> Result<()> {
        let request = Self::authorize(self.http.delete(self.endpoint(&[resource, id])), token);
        normalize_json(request.send().await.map_err(map_transport)?).await?;
        Ok(())
    }

    /// `POST /{resource}/{id}/upload`: re-encodes the file set plus the
    /// `refColumn` field as multipart and proxies it with the bearer token
    /// attached. The backend's status and body pass through unchanged.
    #[instrument(skip(self, files, token), fields(resource = resource, id = id, files = files.len()))]
    pub async fn upload(
        &self,
        resource: &str,
        id: &str,
        files: Vec<UploadFile>,
        ref_column: &str,
        token: Option<&str>,
    ) -> Result<UploadResponse> {
        let mut form = reqwest::multipart::Form::new().text("refColumn", ref_column.to_string());
        for file in files {
            let mut part =
                reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type).map_err(|e| {
                    GatewayError::validation(format!("invalid file content type: {e}"))
                })?;
            }
            form = form.part(file.field_name, part);
        }

        let request = Self::authorize(
            self.http.post(self.endpoint(&[resource, id, "upload"])),
            token,
        )
        .multipart(form);

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(map_transport)?.to_vec();

        debug!(status, "upload forwarded");
        Ok(UploadResponse {
            status,
            content_type,
            body,
        })
    }
}
