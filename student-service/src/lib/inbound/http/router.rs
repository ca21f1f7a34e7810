use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_student::create_student;
use super::handlers::delete_student::delete_student;
use super::handlers::get_student::get_student;
use super::handlers::list_students::list_students;
use super::handlers::update_student::update_student;
use super::middleware::forwarded_identity;
use crate::domain::student::ports::StudentServicePort;

#[derive(Clone)]
pub struct AppState {
    pub student_service: Arc<dyn StudentServicePort>,
}

pub fn create_router(student_service: Arc<dyn StudentServicePort>) -> Router {
    let state = AppState { student_service };

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
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .layer(middleware::from_fn(forwarded_identity))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
