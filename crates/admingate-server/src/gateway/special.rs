//! Special-route registry: resources whose CRUD semantics are fully
//! overridden by custom logic.
//!
//! Presence in the registry is an absolute override. The standard CRUD path
//! is never reached for a registered resource, regardless of HTTP method; a
//! method the special handler does not implement gets `405`.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use admingate_core::{GatewayError, NormalizedListResponse, ResourcePath};

use super::error::ApiError;
use crate::server::AppState;

/// Type alias for special handler functions: `(request, id?) -> Response`,
/// with the id carried inside the parsed [`ResourcePath`].
pub type SpecialHandlerFn = Arc<
    dyn Fn(
            AppState,
            ResourcePath,
            Request<Body>,
        ) -> Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>>
        + Send
        + Sync,
>;

/// Registry of special handlers, closed at startup.
#[derive(Clone)]
pub struct SpecialRegistry {
    handlers: HashMap<&'static str, SpecialHandlerFn>,
}

impl SpecialRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The built-in special routes.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        // No backend-side controller exists for app-settings; forwarding
        // would hit a nonexistent endpoint, so an empty list is synthesized.
        registry.register(
            "app-settings",
            Arc::new(|state, path, request| Box::pin(app_settings(state, path, request))),
        );
        registry.register(
            "static-lists",
            Arc::new(|state, path, request| Box::pin(static_lists(state, path, request))),
        );
        registry
    }

    pub fn register(&mut self, resource: &'static str, handler: SpecialHandlerFn) {
        self.handlers.insert(resource, handler);
    }

    pub fn get(&self, resource: &str) -> Option<&SpecialHandlerFn> {
        self.handlers.get(resource)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for SpecialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `app-settings` has no backend controller: GET list synthesizes an empty
/// normalized list, every other method is 405.
async fn app_settings(
    state: AppState,
    path: ResourcePath,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    if request.method() != Method::GET || path.id.is_some() {
        return Err(GatewayError::method_not_allowed(
            request.method().as_str(),
            path.resource,
        )
        .into());
    }

    let query = super::handler::list_query_from_uri(
        request.uri(),
        state.config.gateway.default_limit,
        state.config.gateway.max_limit,
    );
    let body = NormalizedListResponse::empty(query.page, query.limit);
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// `GET /api/static-lists/{namespace}`: served through the TTL cache with
/// the serve-stale-on-fetch-failure policy. Public; no bearer required.
async fn static_lists(
    state: AppState,
    path: ResourcePath,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    if request.method() != Method::GET {
        return Err(GatewayError::method_not_allowed(
            request.method().as_str(),
            path.resource,
        )
        .into());
    }
    let namespace = path
        .id
        .as_deref()
        .ok_or_else(|| GatewayError::validation("static list namespace is required"))?;

    let token = super::handler::bearer_token(request.headers());
    let backend = state.backend.clone();
    let data = state
        .static_lists
        .get_or_fetch(namespace, || async move {
            backend
                .get_one("static-lists", namespace, token.as_deref())
                .await
        })
        .await?;

    Ok((StatusCode::OK, Json(&*data)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = SpecialRegistry::builtin();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 2);
        assert!(registry.get("app-settings").is_some());
        assert!(registry.get("static-lists").is_some());
        assert!(registry.get("users").is_none());
    }
}
