use serde::{Deserialize, Serialize};

use crate::core::{MapFeature, MercatorProjection, PixelPoint};
use crate::error::{MapError, MapResult};

/// Opaque map shape with its ring vertices projected to pixel space.
///
/// Source `properties` ride along unchanged so a choropleth surface can
/// resolve fills without the engine inspecting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedFeature {
    pub rings: Vec<Vec<PixelPoint>>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl ProjectedFeature {
    pub fn validate(&self) -> MapResult<()> {
        for ring in &self.rings {
            for vertex in ring {
                if !vertex.is_finite() {
                    return Err(MapError::InvalidData(
                        "projected feature vertices must be finite".to_owned(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Projects feature ring vertices through the clamping path.
///
/// Shapes are opaque pass-through geometry, so vertices touching the pole
/// cutoff are pinned to the domain edge instead of failing the pass.
#[must_use]
pub fn project_features(
    projection: &MercatorProjection,
    features: &[MapFeature],
) -> Vec<ProjectedFeature> {
    features
        .iter()
        .map(|feature| ProjectedFeature {
            rings: feature
                .rings
                .iter()
                .map(|ring| {
                    ring.iter()
                        .map(|&vertex| projection.project_clamped(vertex))
                        .collect()
                })
                .collect(),
            properties: feature.properties.clone(),
        })
        .collect()
}
