//! Request forwarding.
//!
//! One operation: take an inbound request, re-issue it against the configured
//! backend origin, and relay the response. The target path rides in the
//! `path` query parameter of the gateway's own URL, so the gateway can be
//! mounted anywhere without colliding with backend routes.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method, Request, Response, StatusCode, Uri,
};

use crate::gateway::cors;
use crate::gateway::errors::{ErrorEnvelope, ForwardError};
use crate::gateway::payload::normalize_payload;
use crate::http::request::RequestId;
use crate::http::server::AppState;

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn application_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// Methods that are forwarded to the backend.
fn is_forwardable(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::POST | Method::PUT | Method::DELETE
    )
}

/// Methods that carry a body through to the backend.
fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT)
}

/// Extract the target path from the `path` query parameter.
///
/// Missing parameter means empty string: the request goes to the bare origin.
fn target_path(uri: &Uri) -> String {
    uri.query()
        .and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "path")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// Build the outbound header set: Content-Type is always forced, and only
/// x-request-id and authorization survive from the inbound request.
fn filtered_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, application_json());
    if let Some(id) = inbound.get(&X_REQUEST_ID) {
        headers.insert(X_REQUEST_ID, id.clone());
    }
    if let Some(auth) = inbound.get(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, auth.clone());
    }
    headers
}

/// Handle one inbound request end to end.
pub async fn forward(state: &AppState, request: Request<Body>) -> Response<Body> {
    let method = request.method().clone();

    // CORS preflight never reaches the backend.
    if method == Method::OPTIONS {
        return preflight_response();
    }

    if !is_forwardable(&method) {
        return method_not_allowed_response(&method);
    }

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_else(|| RequestId::from_headers(request.headers()));

    let path = target_path(request.uri());
    let target = format!("{}{}", state.config.backend.origin, path);

    let (parts, inbound_body) = request.into_parts();
    let outbound_headers = filtered_headers(&parts.headers);

    let body = if carries_body(&method) {
        match axum::body::to_bytes(inbound_body, state.config.limits.max_request_body_bytes).await
        {
            Ok(bytes) => bytes,
            Err(_) => {
                tracing::warn!(
                    request_id = %request_id.as_str(),
                    limit = state.config.limits.max_request_body_bytes,
                    "Inbound body exceeded limit"
                );
                return payload_too_large_response();
            }
        }
    } else {
        Bytes::new()
    };

    tracing::debug!(
        request_id = %request_id.as_str(),
        method = %method,
        target = %target,
        "Forwarding request"
    );

    match call_backend(state, &method, &target, outbound_headers, body).await {
        Ok((status, payload)) => {
            tracing::info!(
                request_id = %request_id.as_str(),
                method = %method,
                target = %target,
                status = status.as_u16(),
                "Backend responded"
            );
            backend_response(status, payload)
        }
        Err(error) => {
            tracing::error!(
                request_id = %request_id.as_str(),
                method = %method,
                target = %target,
                code = error.code().as_str(),
                error = %error,
                "Forwarding failed"
            );
            envelope_response(&ErrorEnvelope::new(&error, &state.config.backend.origin))
        }
    }
}

/// Issue the single outbound call, raced against the forward timeout.
///
/// Losing the race drops the request future, which aborts the connection.
async fn call_backend(
    state: &AppState,
    method: &Method,
    target: &str,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, String), ForwardError> {
    let uri: Uri = target.parse()?;

    let mut builder = Request::builder().method(method.clone()).uri(uri);
    if let Some(outbound) = builder.headers_mut() {
        *outbound = headers;
    }
    let outbound = builder.body(Body::from(body))?;

    let limit_ms = state.config.timeouts.forward_ms;
    let response: Response<hyper::body::Incoming> = tokio::time::timeout(
        Duration::from_millis(limit_ms),
        state.client.request(outbound),
    )
    .await
    .map_err(|_| ForwardError::Timeout { limit_ms })?
    .map_err(ForwardError::Upstream)?;

    let (parts, body) = response.into_parts();
    let raw = axum::body::to_bytes(
        Body::new(body),
        state.config.limits.max_response_body_bytes,
    )
    .await
    .map_err(ForwardError::ResponseBody)?;

    Ok((parts.status, normalize_payload(&raw)))
}

fn preflight_response() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    cors::apply_full(response.headers_mut());
    response
}

fn method_not_allowed_response(method: &Method) -> Response<Body> {
    tracing::warn!(method = %method, "Rejected disallowed method");
    let mut response = Response::new(Body::from(
        serde_json::json!({"error": "Method not allowed"}).to_string(),
    ));
    *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
    response.headers_mut().insert(CONTENT_TYPE, application_json());
    cors::apply_origin_only(response.headers_mut());
    response
}

fn payload_too_large_response() -> Response<Body> {
    let mut response = Response::new(Body::from(
        serde_json::json!({"error": "Request body too large"}).to_string(),
    ));
    *response.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
    response.headers_mut().insert(CONTENT_TYPE, application_json());
    cors::apply_origin_only(response.headers_mut());
    response
}

fn backend_response(status: StatusCode, payload: String) -> Response<Body> {
    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, application_json());
    cors::apply_full(response.headers_mut());
    response
}

fn envelope_response(envelope: &ErrorEnvelope) -> Response<Body> {
    let mut response = Response::new(Body::from(envelope.to_json()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(CONTENT_TYPE, application_json());
    cors::apply_full(response.headers_mut());
    response
}
