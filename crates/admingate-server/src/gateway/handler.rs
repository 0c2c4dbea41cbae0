//! Catch-all gateway dispatcher for `/api/{*path}`.

use axum::{
    Json,
    body::Body,
    extract::{Path as AxumPath, State},
    http::{HeaderMap, Request, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, instrument};

use admingate_core::{
    GatewayError, ListMode, ListQuery, ResourcePath, ResourcePolicy, apply_post_processing,
};

use super::error::ApiError;
use super::routes::RouteKind;
use super::special::SpecialHandlerFn;
use crate::server::AppState;

/// Entry point for every `/api/{resource}[/{id}[/{action}]]` request.
#[instrument(skip(state, request), fields(method = %request.method()))]
pub async fn gateway_entry(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let resource_path = ResourcePath::parse_str(&path)?;
    debug!(resource = %resource_path.resource, id = ?resource_path.id, action = ?resource_path.action, "gateway dispatch");

    // Clone out of the table so the borrow of state ends before dispatch.
    enum Resolved {
        Special(SpecialHandlerFn),
        Standard(ResourcePolicy),
    }
    let resolved = match state.routes.kind(&resource_path.resource) {
        RouteKind::Special(handler) => Resolved::Special(handler.clone()),
        RouteKind::Standard(policy) => Resolved::Standard(policy.clone()),
    };

    match resolved {
        // Absolute override: the standard CRUD path is never reached.
        Resolved::Special(handler) => handler(state.clone(), resource_path, request).await,
        Resolved::Standard(policy) => {
            standard_dispatch(state, policy, resource_path, request).await
        }
    }
}

/// `GET /api` and `GET /api/` carry no resource segment.
pub async fn api_root() -> ApiError {
    ApiError(GatewayError::invalid_path("missing resource segment"))
}

/// Envelope-shaped 404 for paths outside the gateway surface.
pub async fn not_found() -> ApiError {
    ApiError(GatewayError::not_found("Route not found"))
}

async fn standard_dispatch(
    state: AppState,
    policy: ResourcePolicy,
    path: ResourcePath,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let token = bearer_token(request.headers());

    // Fail fast: no token, no outbound round-trip.
    if !policy.public && token.is_none() {
        return Err(GatewayError::unauthorized("Missing bearer token").into());
    }
    let token = token.as_deref();

    let query = list_query_from_uri(
        request.uri(),
        policy.default_limit,
        state.config.gateway.max_limit,
    );
    let resource = path.resource.as_str();

    match (method.as_str(), path.id.as_deref(), path.action.as_deref()) {
        // The action namespace is closed: only upload exists.
        (method, Some(id), Some(action)) => {
            if action != "upload" {
                return Err(GatewayError::not_found(format!("Action {action} not found")).into());
            }
            if method != "POST" {
                return Err(GatewayError::method_not_allowed(method, resource).into());
            }
            super::upload::forward(&state, resource, id, token, request).await
        }
        ("GET", None, None) => match policy.list_mode {
            ListMode::Emulated => {
                let items = state.backend.fetch_all(resource, &query, token).await?;
                let body = apply_post_processing(items, &query, policy.search_fields);
                Ok((StatusCode::OK, Json(body)).into_response())
            }
            ListMode::Backend => {
                let body = state.backend.list(resource, &query, token).await?;
                Ok((StatusCode::OK, Json(body)).into_response())
            }
        },
        ("GET", Some(id), None) => {
            let body = state.backend.get_one(resource, id, token).await?;
            Ok((StatusCode::OK, Json(body)).into_response())
        }
        ("POST", None, None) => {
            let body = read_json_body(request, state.config.server.body_limit_bytes).await?;
            let created = state.backend.create(resource, &body, token).await?;
            Ok((StatusCode::CREATED, Json(created)).into_response())
        }
        ("PATCH", Some(id), None) => {
            let body = read_json_body(request, state.config.server.body_limit_bytes).await?;
            let updated = state.backend.update(resource, id, &body, token).await?;
            Ok((StatusCode::OK, Json(updated)).into_response())
        }
        ("PATCH", None, None) => {
            Err(GatewayError::validation("id is required for update").into())
        }
        ("DELETE", Some(id), None) => {
            state.backend.delete(resource, id, token).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        ("DELETE", None, None) => {
            Err(GatewayError::validation("id is required for delete").into())
        }
        (method, _, None) => {
            Err(GatewayError::method_not_allowed(method, resource).into())
        }
        // Unreachable: the parser never yields an action without an id.
        (_, None, Some(_)) => Err(GatewayError::invalid_path("action requires an id").into()),
    }
}

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Parse the recognized list parameters plus pass-through filters from the
/// request URI, preserving caller order.
pub fn list_query_from_uri(uri: &Uri, default_limit: u64, max_limit: u64) -> ListQuery {
    let pairs: Vec<(String, String)> = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    ListQuery::from_params(
        pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        default_limit,
        max_limit,
    )
}

async fn read_json_body(request: Request<Body>, limit: usize) -> Result<Value, ApiError> {
    let bytes = axum::body::to_bytes(request.into_body(), limit)
        .await
        .map_err(|e| GatewayError::validation(format!("failed to read request body: {e}")))?;
    if bytes.is_empty() {
        return Err(GatewayError::validation("request body is required").into());
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::validation(format!("invalid JSON body: {e}")).into())
}
