use crate::app_config::{AppConfig, Environment};
use crate::proximity::DEFAULT_NEIGHBOR_RADIUS_KM;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_addr = or_default("OUTLET_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("OUTLET_BIND_ADDR", e.to_string()))?;

    let upstream_timeout_secs = or_default("OUTLET_UPSTREAM_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| invalid("OUTLET_UPSTREAM_TIMEOUT_SECS", e.to_string()))?;

    let neighbor_radius_km = match lookup("OUTLET_NEIGHBOR_RADIUS_KM") {
        Ok(raw) => parse_radius_km(&raw)
            .map_err(|reason| invalid("OUTLET_NEIGHBOR_RADIUS_KM", reason))?,
        Err(_) => DEFAULT_NEIGHBOR_RADIUS_KM,
    };

    // A blank value is treated the same as an unset one.
    let api_url = lookup("OUTLET_API_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let env = parse_environment(&or_default("OUTLET_ENV", "development"))?;
    let log_level = or_default("OUTLET_LOG_LEVEL", "info");
    let upstream_user_agent = or_default("OUTLET_UPSTREAM_USER_AGENT", "outlet-finder/0.1");

    Ok(AppConfig {
        api_url,
        env,
        bind_addr,
        log_level,
        upstream_timeout_secs,
        upstream_user_agent,
        neighbor_radius_km,
    })
}

fn parse_radius_km(raw: &str) -> Result<f64, String> {
    let value = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("radius must be a positive number of kilometers, got {raw}"));
    }
    Ok(value)
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "OUTLET_ENV".to_string(),
            reason: format!("expected development, test, or production, got {other}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
