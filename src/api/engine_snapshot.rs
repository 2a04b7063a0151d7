use serde::{Deserialize, Serialize};

use crate::core::{GeoPoint, PixelPoint, Viewport};
use crate::error::{MapError, MapResult};
use crate::interaction::{InteractionMode, TranslateExtent, ZoomRange};
use crate::render::DrawSurface;

use super::MapEngine;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapEngineSnapshot {
    pub viewport: Viewport,
    pub center: GeoPoint,
    pub scale: f64,
    pub translate: PixelPoint,
    pub zoom_range: ZoomRange,
    pub translate_extent: TranslateExtent,
    pub cluster_radius_px: f64,
    pub feature_count: usize,
    pub data_point_count: usize,
    pub interaction_mode: InteractionMode,
}

impl<S: DrawSurface> MapEngine<S> {
    #[must_use]
    pub fn snapshot(&self) -> MapEngineSnapshot {
        MapEngineSnapshot {
            viewport: self.viewport(),
            center: self.center(),
            scale: self.scale(),
            translate: self.translate(),
            zoom_range: self.zoom_range(),
            translate_extent: self.translate_extent(),
            cluster_radius_px: self.cluster.radius_px,
            feature_count: self.feature_count(),
            data_point_count: self.data_point_count(),
            interaction_mode: self.interaction_mode(),
        }
    }

    pub fn snapshot_json_pretty(&self) -> MapResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|err| MapError::InvalidData(format!("snapshot serialization failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{MapEngine, MapEngineConfig, MapEngineSnapshot};
    use crate::core::{GeoPoint, Viewport};
    use crate::render::NullSurface;

    #[test]
    fn snapshot_round_trips_through_json() {
        let config =
            MapEngineConfig::new(Viewport::new(800, 450), GeoPoint::new(-96.0, 38.0), 500.0);
        let engine = MapEngine::new(NullSurface::default(), config).expect("engine init");

        let json = engine.snapshot_json_pretty().expect("snapshot json");
        let decoded: MapEngineSnapshot = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, engine.snapshot());
    }
}
