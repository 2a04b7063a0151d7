use tracing::{debug, warn};

use crate::core::{DataPoint, MapFeature};
use crate::error::{MapError, MapResult};
use crate::render::DrawSurface;

use super::MapEngine;

impl<S: DrawSurface> MapEngine<S> {
    /// Replaces the overlay data set and schedules a render.
    ///
    /// Malformed points are skipped with a diagnostic, never fatal: the valid
    /// subset is loaded and rendered first, and the rejection total is then
    /// surfaced once per call as `OutOfDomainData`. A draw failure from the
    /// scheduled render takes precedence over the ingest report.
    pub fn set_data(&mut self, points: Vec<DataPoint>) -> MapResult<()> {
        let total = points.len();
        let mut accepted = Vec::with_capacity(total);
        for point in points {
            match point.validate() {
                Ok(()) => accepted.push(point),
                Err(err) => {
                    warn!(id = %point.id, organization = %point.organization, error = %err,
                        "skipping data point");
                }
            }
        }

        let rejected = total - accepted.len();
        debug!(total, accepted = accepted.len(), rejected, "set data points");
        self.data = accepted;
        self.schedule_render()?;

        if rejected > 0 {
            return Err(MapError::OutOfDomainData { rejected, total });
        }
        Ok(())
    }

    /// Replaces the base map shapes and schedules a render.
    ///
    /// Features are opaque: ring vertices are projected through the clamping
    /// path at render time, so no domain validation happens here.
    pub fn set_features(&mut self, features: Vec<MapFeature>) -> MapResult<()> {
        debug!(count = features.len(), "set map features");
        self.features = features;
        self.schedule_render()
    }
}
