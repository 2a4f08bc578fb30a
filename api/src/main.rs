use std::net::SocketAddr;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod middleware;
mod providers;
mod routes;
mod services;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Outreach API",
        version = "0.1.0",
        description = "LinkedIn outreach assistant: accounts, contact search, profile enrichment, drafted recommendations and sending."
    ),
    paths(
        routes::health::health_check,
        routes::accounts::list_accounts,
        routes::contacts::search_contacts,
        routes::profiles::enrich_profile,
        routes::recommendations::compose_recommendations,
        routes::messages::send_message,
        routes::search::web_search,
        routes::search::article_search,
        routes::ai::generate,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::profiles::EnrichRequest,
        routes::recommendations::RecommendationRequest,
        routes::messages::SendMessageRequest,
        services::generation::GenerateRequest,
        services::generation::GenerateResponse,
        outreach_core::error::ApiError,
        outreach_core::accounts::Account,
        outreach_core::accounts::AccountStatus,
        outreach_core::activity::NetworkDegree,
        outreach_core::activity::Profile,
        outreach_core::activity::Post,
        outreach_core::activity::Reaction,
        outreach_core::activity::Comment,
        outreach_core::activity::Message,
        outreach_core::activity::Activity,
        outreach_core::activity::EnrichedBundle,
        outreach_core::prompts::OutputFormat,
        outreach_core::recommendations::Language,
        outreach_core::recommendations::MessageSettings,
        outreach_core::recommendations::PersonSummary,
        outreach_core::recommendations::LinkRecommendation,
        outreach_core::recommendations::GeneralMessage,
        outreach_core::recommendations::RecommendationOutput,
    ))
)]
struct ApiDoc;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid rate limit configuration for {0}")]
    RateLimit(&'static str),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outreach_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = config::Config::from_env();
    let missing = config.missing_sections();
    if !missing.is_empty() {
        tracing::warn!(?missing, "Starting with unconfigured providers");
    }
    let server = config.server.clone();
    let app_state = state::AppState::from_config(config);

    let recommendations_limit = middleware::rate_limit::generation_layer()
        .ok_or(StartupError::RateLimit("recommendations"))?;
    let generate_limit = middleware::rate_limit::generation_layer()
        .ok_or(StartupError::RateLimit("generate"))?;
    let send_limit =
        middleware::rate_limit::send_layer().ok_or(StartupError::RateLimit("send"))?;

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::accounts::router())
        .merge(routes::contacts::router())
        .merge(routes::profiles::router())
        .merge(routes::search::router())
        .merge(routes::recommendations::router().layer(recommendations_limit))
        .merge(routes::ai::router().layer(generate_limit))
        .merge(routes::messages::router().layer(send_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .option_layer(server.require_https.then(|| {
                    axum::middleware::from_fn(middleware::https::require_https)
                }))
                .layer(middleware::cors::build_cors_layer(&server.cors_origins)),
        )
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
    tracing::info!("Outreach API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(StartupError::Serve)
}
