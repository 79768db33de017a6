use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("NEARSPOT_ENV", "development"));

    let database_url = or_default("DATABASE_URL", "sqlite://nearspot.db");

    // The signing secret must be explicit outside development; a well-known
    // dev fallback keeps local iteration friction-free.
    let jwt_secret = match lookup("NEARSPOT_JWT_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ if env == Environment::Development => "nearspot-dev-secret".to_string(),
        _ => return Err(ConfigError::MissingEnvVar("NEARSPOT_JWT_SECRET".to_string())),
    };

    let bind_addr = parse_addr("NEARSPOT_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("NEARSPOT_LOG_LEVEL", "info");
    let token_ttl_days = parse_i64("NEARSPOT_TOKEN_TTL_DAYS", "7")?;

    let google_places_api_key = lookup("GOOGLE_PLACES_API_KEY").ok();
    let yelp_api_key = lookup("YELP_API_KEY").ok();
    let ticketmaster_api_key = lookup("TICKETMASTER_API_KEY").ok();
    let eventbrite_api_key = lookup("EVENTBRITE_API_KEY").ok();

    let db_max_connections = parse_u32("NEARSPOT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("NEARSPOT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("NEARSPOT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_timeout_secs = parse_u64("NEARSPOT_HTTP_TIMEOUT_SECS", "30")?;
    let http_user_agent = or_default("NEARSPOT_HTTP_USER_AGENT", "nearspot/0.1 (local-discovery)");
    let inter_request_delay_ms = parse_u64("NEARSPOT_INTER_REQUEST_DELAY_MS", "200")?;
    let http_max_retries = parse_u32("NEARSPOT_HTTP_MAX_RETRIES", "3")?;
    let http_retry_backoff_base_ms = parse_u64("NEARSPOT_HTTP_RETRY_BACKOFF_BASE_MS", "1000")?;

    let rate_limit_max_requests = parse_usize("NEARSPOT_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("NEARSPOT_RATE_LIMIT_WINDOW_SECS", "60")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        jwt_secret,
        token_ttl_days,
        google_places_api_key,
        yelp_api_key,
        ticketmaster_api_key,
        eventbrite_api_key,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        http_user_agent,
        inter_request_delay_ms,
        http_max_retries,
        http_retry_backoff_base_ms,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
