//! Attrition Sherpa server.
//!
//! Loads configuration, wires the backend client into a workflow session
//! and serves the workflow API.

use std::error::Error;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use attrition_sherpa::adapters::http::{app_router, WorkflowAppState};
use attrition_sherpa::adapters::{AttritionApiClient, AttritionApiConfig, MockAttritionServices};
use attrition_sherpa::application::WorkflowSession;
use attrition_sherpa::config::{AppConfig, ServerConfig};

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if server.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_session(config: &AppConfig) -> Result<WorkflowSession, Box<dyn Error>> {
    if config.services.mock {
        info!("Using built-in sample services");
        let services = Arc::new(MockAttritionServices::new());
        return Ok(WorkflowSession::new(services.clone(), services.clone(), services));
    }

    let client = Arc::new(AttritionApiClient::new(
        AttritionApiConfig::new(config.services.base_url.as_str())
            .with_timeout(config.services.timeout()),
    )?);
    Ok(WorkflowSession::new(client.clone(), client.clone(), client))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let session = Arc::new(build_session(&config)?);
    info!(
        session_id = %session.id(),
        backend = %config.services.base_url,
        environment = ?config.server.environment,
        "Workflow session ready"
    );

    let app = app_router(WorkflowAppState::new(session), &config);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
