use serde::{Deserialize, Serialize};
use thiserror::Error;

mod app_config;
mod config;
pub mod geo;
pub mod hours;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

/// The kind of place a favorite or review refers to.
///
/// Stored in the database as its lowercase string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Restaurant,
    Hotel,
    Event,
}

impl PlaceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceKind::Restaurant => "restaurant",
            PlaceKind::Hotel => "hotel",
            PlaceKind::Event => "event",
        }
    }
}

impl std::str::FromStr for PlaceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(PlaceKind::Restaurant),
            "hotel" => Ok(PlaceKind::Hotel),
            "event" => Ok(PlaceKind::Event),
            other => Err(CoreError::InvalidPlaceKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid place kind: {0}")]
    InvalidPlaceKind(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
