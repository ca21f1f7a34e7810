use std::sync::Arc;

use api_gateway::config::Config;
use api_gateway::inbound::http::filter::GatewayVerifier;
use api_gateway::inbound::http::router::create_router;
use api_gateway::outbound::proxy::Route;
use api_gateway::outbound::proxy::UpstreamProxy;
use auth::JwtHandler;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "api-gateway",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        public_prefixes = ?config.gateway.public_prefixes,
        routes = config.gateway.routes.len(),
        "Configuration loaded"
    );

    // Without the shared key no request can be verified
    let jwt_handler = Arc::new(JwtHandler::from_base64_secret(&config.jwt.secret)?);
    let verifier = Arc::new(GatewayVerifier::new(
        jwt_handler,
        config.gateway.public_prefixes.clone(),
    ));

    let routes = config
        .gateway
        .routes
        .iter()
        .map(|route| {
            tracing::info!(prefix = %route.prefix, upstream = %route.upstream, "Route registered");
            Route::new(route.prefix.as_str(), route.upstream.as_str())
        })
        .collect();
    let proxy = Arc::new(UpstreamProxy::new(routes)?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(verifier, proxy)).await?;

    tracing::info!("Server exited");
    Ok(())
}
