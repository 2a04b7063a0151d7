use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::core::Viewport;
use crate::error::MapResult;
use crate::render::ProjectedFeature;

/// Surface-agnostic payload for one render pass.
///
/// Owned by the scheduler's current pass until the draw surface consumes it;
/// clusters inside are transient and rebuilt from scratch every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub shapes: Vec<ProjectedFeature>,
    pub clusters: Vec<Cluster>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            shapes: Vec::new(),
            clusters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_shapes(mut self, shapes: Vec<ProjectedFeature>) -> Self {
        self.shapes = shapes;
        self
    }

    #[must_use]
    pub fn with_clusters(mut self, clusters: Vec<Cluster>) -> Self {
        self.clusters = clusters;
        self
    }

    pub fn validate(&self) -> MapResult<()> {
        self.viewport.validated()?;
        for shape in &self.shapes {
            shape.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.clusters.is_empty()
    }
}
