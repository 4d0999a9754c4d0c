use thiserror::Error;

/// Precondition violations rejected by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("report {id} has an invalid coordinate: {source}")]
    InvalidPin {
        id: String,
        #[source]
        source: Box<GeoError>,
    },

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("cannot fit a region around an empty point set")]
    EmptyPointSet,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),
}
