pub mod app_config;
pub mod config;
pub mod facility;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use facility::{
    CategoryFilter, FacilityCategory, FacilityRecord, FacilitySource, SearchQuery,
    ADDRESS_PLACEHOLDER,
};
pub use geo::{haversine_km, BoundingBox, Coordinate, EARTH_RADIUS_KM, MILES_TO_METERS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid search radius: {0}")]
    InvalidRadius(f64),

    #[error("unknown facility type: {0}")]
    UnknownCategory(String),
}
