use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_dashboard_server::config::Config;
use weather_dashboard_server::forecast::provider_from_config;
use weather_dashboard_server::routes::{create_router, AppState};
use weather_dashboard_server::seismic::UsgsClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_dashboard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let weather_provider = match provider_from_config(&config) {
        Ok(provider) => {
            tracing::info!("Using weather provider: {}", provider.id());
            Some(provider)
        }
        Err(e) => {
            tracing::warn!(
                "Weather provider '{}' unavailable, weather requests will fail: {}",
                config.weather_provider,
                e
            );
            None
        }
    };

    let seismic_client = Arc::new(UsgsClient::new(&config)?);
    let bind_address = config.bind_address.clone();

    let state = AppState {
        config: Arc::new(config),
        weather_provider,
        seismic_client,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server starting on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
