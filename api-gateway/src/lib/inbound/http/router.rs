use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::filter::authenticate;
use super::filter::GatewayVerifier;
use super::handlers::forward;
use crate::outbound::proxy::UpstreamProxy;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<GatewayVerifier>,
    pub proxy: Arc<UpstreamProxy>,
}

/// Build the gateway router.
///
/// Every path goes through token verification, then to the upstream owning
/// the longest matching prefix.
pub fn create_router(verifier: Arc<GatewayVerifier>, proxy: Arc<UpstreamProxy>) -> Router {
    let state = AppState { verifier, proxy };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .fallback(forward)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
