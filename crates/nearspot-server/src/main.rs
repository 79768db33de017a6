mod api;
mod auth;
mod middleware;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::auth::AuthState;
use crate::middleware::RateLimitState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nearspot_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = nearspot_db::PoolConfig::from_app_config(&config);
    let pool = nearspot_db::connect_pool(&config.database_url, pool_config).await?;
    nearspot_db::run_migrations(&pool).await?;

    let google = match config.google_places_api_key.as_deref() {
        Some(key) => Some(nearspot_places::GooglePlacesClient::new(
            key,
            config.http_timeout_secs,
            &config.http_user_agent,
            config.http_max_retries,
            config.http_retry_backoff_base_ms,
        )?),
        None => {
            tracing::warn!("GOOGLE_PLACES_API_KEY not set; restaurant and hotel endpoints disabled");
            None
        }
    };
    let yelp = match config.yelp_api_key.as_deref() {
        Some(key) => Some(nearspot_places::YelpClient::new(
            key,
            config.http_timeout_secs,
            &config.http_user_agent,
            config.http_max_retries,
            config.http_retry_backoff_base_ms,
        )?),
        None => {
            tracing::warn!("YELP_API_KEY not set; Yelp enrichment disabled");
            None
        }
    };
    let ticketmaster = match config.ticketmaster_api_key.as_deref() {
        Some(key) => Some(nearspot_events::TicketmasterClient::new(
            key,
            config.http_timeout_secs,
            &config.http_user_agent,
            config.http_max_retries,
            config.http_retry_backoff_base_ms,
        )?),
        None => {
            tracing::warn!("TICKETMASTER_API_KEY not set; Ticketmaster endpoints disabled");
            None
        }
    };
    let eventbrite = match config.eventbrite_api_key.as_deref() {
        Some(key) => Some(nearspot_events::EventbriteClient::new(
            key,
            config.http_timeout_secs,
            &config.http_user_agent,
            config.http_max_retries,
            config.http_retry_backoff_base_ms,
        )?),
        None => {
            tracing::warn!("EVENTBRITE_API_KEY not set; Eventbrite endpoints disabled");
            None
        }
    };

    let state = AppState {
        pool,
        auth: AuthState::new(&config.jwt_secret, config.token_ttl_days),
        google,
        yelp,
        ticketmaster,
        eventbrite,
        inter_request_delay_ms: config.inter_request_delay_ms,
    };
    let rate_limit = RateLimitState::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    let app = build_app(state, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "nearspot listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
