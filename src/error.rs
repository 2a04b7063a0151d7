use thiserror::Error;

pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid projection scale: {scale} (must be finite and > 0)")]
    InvalidScale { scale: f64 },

    #[error("invalid zoom range: min={min}, max={max}")]
    InvalidZoomRange { min: f64, max: f64 },

    #[error("coordinate outside projection domain: longitude={longitude}, latitude={latitude}")]
    OutOfDomainCoordinate { longitude: f64, latitude: f64 },

    #[error("{rejected} of {total} data points rejected during ingest")]
    OutOfDomainData { rejected: usize, total: usize },

    #[error("draw callback failed: {0}")]
    DrawCallback(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
