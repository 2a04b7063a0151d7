use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// Latitude bound of the cylindrical projection domain, in degrees.
///
/// Latitudes at or beyond this magnitude have no usable Mercator image;
/// the Web-Mercator pole cutoff (~85.0511) sits just inside it.
pub const LATITUDE_LIMIT_DEG: f64 = 85.06;

/// Geographic coordinate in degrees, longitude ∈ (-180, 180],
/// latitude ∈ (-LATITUDE_LIMIT_DEG, LATITUDE_LIMIT_DEG).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    #[must_use]
    pub fn is_in_domain(self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.longitude > -180.0
            && self.longitude <= 180.0
            && self.latitude.abs() < LATITUDE_LIMIT_DEG
    }

    /// Returns the point unchanged, or `OutOfDomainCoordinate`.
    pub fn validated(self) -> MapResult<Self> {
        if self.is_in_domain() {
            Ok(self)
        } else {
            Err(MapError::OutOfDomainCoordinate {
                longitude: self.longitude,
                latitude: self.latitude,
            })
        }
    }
}

/// Position in viewport pixel space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validated(self) -> MapResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(MapError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    #[must_use]
    pub fn center(self) -> PixelPoint {
        PixelPoint::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Inclusive visible-rectangle test used for point culling.
    #[must_use]
    pub fn contains(self, pixel: PixelPoint) -> bool {
        pixel.x >= 0.0
            && pixel.x <= f64::from(self.width)
            && pixel.y >= 0.0
            && pixel.y <= f64::from(self.height)
    }
}

/// One status bucket of a data point's metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

impl StatusCount {
    #[must_use]
    pub fn new(status: impl Into<String>, count: u64) -> Self {
        Self {
            status: status.into(),
            count,
        }
    }
}

/// Immutable overlay record anchored to a geographic position.
///
/// `id` is the stable identity clusters refer to across render passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: String,
    pub organization: String,
    pub coords: GeoPoint,
    pub metrics: Vec<StatusCount>,
}

impl DataPoint {
    #[must_use]
    pub fn new(id: impl Into<String>, organization: impl Into<String>, coords: GeoPoint) -> Self {
        Self {
            id: id.into(),
            organization: organization.into(),
            coords,
            metrics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Vec<StatusCount>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn validate(&self) -> MapResult<()> {
        if self.id.is_empty() {
            return Err(MapError::InvalidData(
                "data point id must not be empty".to_owned(),
            ));
        }
        self.coords.validated()?;
        Ok(())
    }
}

/// Opaque polygon shape in geographic space.
///
/// The engine only projects ring vertices; `properties` pass through to the
/// draw surface unchanged so hosts can drive choropleth styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFeature {
    pub rings: Vec<Vec<GeoPoint>>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl MapFeature {
    #[must_use]
    pub fn new(rings: Vec<Vec<GeoPoint>>) -> Self {
        Self {
            rings,
            properties: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = properties;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, PixelPoint, Viewport};

    #[test]
    fn geo_point_domain_accepts_valid_range() {
        assert!(GeoPoint::new(-96.0, 38.0).is_in_domain());
        assert!(GeoPoint::new(180.0, 0.0).is_in_domain());
        assert!(GeoPoint::new(-179.999, -85.0).is_in_domain());
    }

    #[test]
    fn geo_point_domain_rejects_out_of_range() {
        assert!(!GeoPoint::new(-180.0, 0.0).is_in_domain());
        assert!(!GeoPoint::new(181.0, 0.0).is_in_domain());
        assert!(!GeoPoint::new(0.0, 85.06).is_in_domain());
        assert!(!GeoPoint::new(0.0, -90.0).is_in_domain());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_in_domain());
    }

    #[test]
    fn viewport_contains_is_inclusive_at_edges() {
        let viewport = Viewport::new(800, 450);
        assert!(viewport.contains(PixelPoint::new(0.0, 0.0)));
        assert!(viewport.contains(PixelPoint::new(800.0, 450.0)));
        assert!(!viewport.contains(PixelPoint::new(800.1, 10.0)));
        assert!(!viewport.contains(PixelPoint::new(-0.1, 10.0)));
    }
}
