use serde::{Deserialize, Serialize};

use crate::cluster::ClusterConfig;
use crate::core::{GeoPoint, PixelPoint, Viewport};
use crate::error::MapResult;
use crate::interaction::{TranslateExtent, WheelZoomTuning, ZoomRange};

/// Initial view and tuning for a [`crate::api::MapEngine`].
///
/// Validation happens once in `MapEngine::new`, before any render: a config
/// whose scale starts outside its own zoom range, or whose bounds are
/// malformed, is rejected there rather than patched up later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapEngineConfig {
    pub viewport: Viewport,
    pub center: GeoPoint,
    pub scale: f64,
    pub zoom_range: ZoomRange,
    pub cluster: ClusterConfig,
    pub wheel: WheelZoomTuning,
    /// Pixel the geo-center lands on; defaults to the viewport midpoint.
    #[serde(default)]
    pub translate: Option<PixelPoint>,
    /// Explicit pan bounds; defaults to the viewport rectangle, re-derived on
    /// resize.
    #[serde(default)]
    pub translate_extent: Option<TranslateExtent>,
}

impl MapEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport, center: GeoPoint, scale: f64) -> Self {
        Self {
            viewport,
            center,
            scale,
            zoom_range: ZoomRange::default(),
            cluster: ClusterConfig::default(),
            wheel: WheelZoomTuning::default(),
            translate: None,
            translate_extent: None,
        }
    }

    #[must_use]
    pub fn with_zoom_range(mut self, zoom_range: ZoomRange) -> Self {
        self.zoom_range = zoom_range;
        self
    }

    #[must_use]
    pub fn with_cluster_radius(mut self, radius_px: f64) -> Self {
        self.cluster = ClusterConfig { radius_px };
        self
    }

    #[must_use]
    pub fn with_wheel_tuning(mut self, wheel: WheelZoomTuning) -> Self {
        self.wheel = wheel;
        self
    }

    #[must_use]
    pub fn with_translate(mut self, translate: PixelPoint) -> Self {
        self.translate = Some(translate);
        self
    }

    #[must_use]
    pub fn with_translate_extent(mut self, extent: TranslateExtent) -> Self {
        self.translate_extent = Some(extent);
        self
    }

    pub(super) fn validate(self) -> MapResult<Self> {
        self.viewport.validated()?;
        self.center.validated()?;
        self.cluster.validate()?;
        self.wheel.validate()?;
        Ok(self)
    }

    pub(super) fn initial_translate(self) -> PixelPoint {
        self.translate.unwrap_or_else(|| self.viewport.center())
    }
}
