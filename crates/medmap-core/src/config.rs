use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
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
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("MEDMAP_ENV", "development"));
    let log_level = or_default("MEDMAP_LOG_LEVEL", "info");

    let facilities_api_url = or_default("MEDMAP_FACILITIES_API_URL", "http://127.0.0.1:5000");
    let nominatim_url = or_default("MEDMAP_NOMINATIM_URL", "https://nominatim.openstreetmap.org");
    let overpass_url = or_default(
        "MEDMAP_OVERPASS_URL",
        "https://overpass-api.de/api/interpreter",
    );

    let country_code = or_default("MEDMAP_COUNTRY_CODE", "in").to_ascii_lowercase();
    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "MEDMAP_COUNTRY_CODE".to_string(),
            reason: format!("expected a two-letter country code, got \"{country_code}\""),
        });
    }
    let country_name = or_default("MEDMAP_COUNTRY_NAME", "India");

    let user_agent = or_default("MEDMAP_USER_AGENT", "medmap/0.1 (facility-locator)");
    let request_timeout_secs = parse_u64("MEDMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let geolocation_timeout_ms = parse_u64("MEDMAP_GEOLOCATION_TIMEOUT_MS", "10000")?;

    let device_position = match lookup("MEDMAP_DEVICE_POSITION") {
        Ok(raw) if !raw.trim().is_empty() => Some(Coordinate::parse_pair(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar {
                var: "MEDMAP_DEVICE_POSITION".to_string(),
                reason: e.to_string(),
            }
        })?),
        _ => None,
    };

    Ok(AppConfig {
        env,
        log_level,
        facilities_api_url,
        nominatim_url,
        overpass_url,
        country_code,
        country_name,
        user_agent,
        request_timeout_secs,
        geolocation_timeout_ms,
        device_position,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
