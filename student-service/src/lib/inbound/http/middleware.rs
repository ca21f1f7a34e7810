use auth::ForwardedIdentity;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Caller identity forwarded by the gateway, if any.
///
/// Informational only: requests without identity headers are served too.
#[derive(Debug, Clone, Default)]
pub struct CallerIdentity(pub Option<ForwardedIdentity>);

/// Middleware that reads gateway identity headers into request extensions
pub async fn forwarded_identity(mut req: Request, next: Next) -> Response {
    let identity = ForwardedIdentity::from_headers(req.headers());

    match &identity {
        Some(identity) => tracing::debug!(
            user = %identity.user,
            user_id = %identity.user_id,
            "Forwarded identity present"
        ),
        None => tracing::debug!("No forwarded identity"),
    }

    req.extensions_mut().insert(CallerIdentity(identity));
    next.run(req).await
}
