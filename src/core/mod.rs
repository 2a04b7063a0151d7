mod projection;
mod types;

pub use projection::MercatorProjection;
pub use types::{
    DataPoint, GeoPoint, LATITUDE_LIMIT_DEG, MapFeature, PixelPoint, StatusCount, Viewport,
};
