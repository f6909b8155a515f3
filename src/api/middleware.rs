//! Middleware components.
//!
//! CORS and request tracking; cross-cutting concerns shared by every
//! endpoint.

use axum::http::HeaderName;
use axum::{extract::Request, middleware::Next, response::Response};
use tower_http::cors::ExposeHeaders;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// Request ID header key
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create CORS middleware with configurable origins
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    if allowed_origins.is_empty() || allowed_origins.contains(&"*".to_string()) {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(ExposeHeaders::list([HeaderName::from_static(
                REQUEST_ID_HEADER,
            )]))
    } else {
        // Production mode: specific origins
        CorsLayer::new()
            .allow_origin(
                allowed_origins
                    .into_iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers(Any)
            .expose_headers(ExposeHeaders::list([HeaderName::from_static(
                REQUEST_ID_HEADER,
            )]))
    }
}

/// Middleware to add a request ID to all requests
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    // Honor an ID the client already attached
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Request ID wrapper for extracting in handlers
#[derive(Debug, Clone)]
pub struct RequestId(pub String);
