use std::time::Duration;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Origin serving `/health/api/nearby-facilities`.
    pub facilities_api_url: String,
    pub nominatim_url: String,
    pub overpass_url: String,
    /// ISO 3166-1 alpha-2 code passed as Nominatim `countrycodes`.
    pub country_code: String,
    /// Appended to free-text place queries.
    pub country_name: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub geolocation_timeout_ms: u64,
    /// Position reported by the fixed device provider, when configured.
    pub device_position: Option<Coordinate>,
}

impl AppConfig {
    #[must_use]
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.geolocation_timeout_ms)
    }
}
