pub mod app_config;
pub mod config;
pub mod entity;
pub mod geo;
pub mod proximity;
pub mod search;
pub mod selection;
pub mod snapshot;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use entity::{Coordinate, EntityId, Outlet};
pub use geo::{distance_km, EARTH_RADIUS_KM};
pub use proximity::{
    find_neighbors, neighbors_with_distance, radius_meters, LinearScanIndex, Neighbor,
    NeighborIndex, DEFAULT_NEIGHBOR_RADIUS_KM,
};
pub use search::normalize_search_results;
pub use selection::{MarkerRole, SelectionController, SelectionError, SelectionState};
pub use snapshot::OutletSnapshot;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("outlet payload is not a JSON array")]
    NotAnArray,

    #[error(transparent)]
    Selection(#[from] SelectionError),
}
