use std::time::Instant;

use tracing::debug;

use crate::cluster::{ClusterConfig, cluster_within_view};
use crate::core::{DataPoint, GeoPoint, MapFeature, MercatorProjection, PixelPoint, Viewport};
use crate::error::MapResult;
use crate::interaction::{InteractionMode, TranslateExtent, ViewController, ZoomRange};
use crate::render::{DrawSurface, RenderFrame, project_features};

use super::MapEngineConfig;
use super::scheduler::RenderScheduler;

/// Main orchestration facade consumed by host applications.
///
/// `MapEngine` owns the view controller, the loaded features and data points,
/// and the render scheduler; the draw surface is injected. Every mutating
/// operation schedules a coalesced render pass — nothing here draws eagerly.
pub struct MapEngine<S: DrawSurface> {
    pub(super) surface: S,
    pub(super) view: ViewController,
    pub(super) features: Vec<MapFeature>,
    pub(super) data: Vec<DataPoint>,
    pub(super) cluster: ClusterConfig,
    pub(super) scheduler: RenderScheduler,
}

impl<S: DrawSurface> MapEngine<S> {
    pub fn new(surface: S, config: MapEngineConfig) -> MapResult<Self> {
        let config = config.validate()?;
        let projection = MercatorProjection::new(
            config.center,
            config.scale,
            config.initial_translate(),
            config.viewport,
        )?;
        let view = ViewController::new(
            projection,
            config.zoom_range,
            config.wheel,
            config.translate_extent,
        )?;

        Ok(Self {
            surface,
            view,
            features: Vec::new(),
            data: Vec::new(),
            cluster: config.cluster,
            scheduler: RenderScheduler::new(),
        })
    }

    #[must_use]
    pub fn projection(&self) -> &MercatorProjection {
        self.view.projection()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.view.projection().viewport()
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.view.projection().center()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.view.projection().scale()
    }

    #[must_use]
    pub fn translate(&self) -> PixelPoint {
        self.view.projection().translate()
    }

    #[must_use]
    pub fn zoom_range(&self) -> ZoomRange {
        self.view.zoom_range()
    }

    #[must_use]
    pub fn translate_extent(&self) -> TranslateExtent {
        self.view.translate_extent()
    }

    #[must_use]
    pub fn cluster_config(&self) -> ClusterConfig {
        self.cluster
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.view.mode()
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn data_point_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Shifts the view by a pixel delta and schedules a render.
    pub fn pan(&mut self, dx: f64, dy: f64) -> MapResult<()> {
        self.view.pan_by(dx, dy)?;
        self.schedule_render()
    }

    /// Applies a wheel-delta zoom anchored at `anchor` and schedules a render.
    pub fn zoom(&mut self, wheel_delta: f64, anchor: PixelPoint) -> MapResult<()> {
        self.view.zoom_by(wheel_delta, anchor)?;
        self.schedule_render()
    }

    /// Adopts a new viewport size and schedules a render.
    pub fn resize(&mut self, width: u32, height: u32) -> MapResult<()> {
        self.view.resize(Viewport::new(width, height))?;
        self.schedule_render()
    }

    /// Re-centers the view on a geographic coordinate and schedules a render.
    pub fn center_on(&mut self, center: GeoPoint) -> MapResult<()> {
        self.view.center_on(center)?;
        self.schedule_render()
    }

    pub fn pan_start(&mut self) {
        self.view.pan_start();
    }

    pub fn pan_end(&mut self) {
        self.view.pan_end();
    }

    pub fn configure_zoom_range(&mut self, zoom_range: ZoomRange) -> MapResult<()> {
        self.view.configure_zoom_range(zoom_range)?;
        self.schedule_render()
    }

    pub fn configure_translate_extent(&mut self, extent: TranslateExtent) -> MapResult<()> {
        self.view.configure_translate_extent(extent)?;
        self.schedule_render()
    }

    pub fn set_cluster_radius(&mut self, radius_px: f64) -> MapResult<()> {
        self.cluster = ClusterConfig { radius_px }.validate()?;
        self.schedule_render()
    }

    /// Explicit render request, going through the same coalescing path as the
    /// gesture operations.
    pub fn render(&mut self) -> MapResult<()> {
        self.schedule_render()
    }

    /// Materializes the payload for one pass from the current state: projected
    /// shapes plus the cluster partition of the visible data points.
    pub fn build_render_frame(&self) -> MapResult<RenderFrame> {
        let projection = self.view.projection();
        let clusters = cluster_within_view(projection, &self.data, self.cluster)?;
        Ok(RenderFrame::new(projection.viewport())
            .with_shapes(project_features(projection, &self.features))
            .with_clusters(clusters))
    }

    /// Runs the scheduler loop: one pass now, plus exactly one follow-up for
    /// any requests absorbed mid-pass. Draw failures reset the scheduler to
    /// idle and surface to the caller of the triggering operation.
    pub(super) fn schedule_render(&mut self) -> MapResult<()> {
        if !self.scheduler.request() {
            // Absorbed into the in-flight pass.
            return Ok(());
        }

        loop {
            let started = Instant::now();
            let frame = match self.build_render_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    self.scheduler.fail();
                    return Err(err);
                }
            };
            if let Err(err) = self.surface.draw(&frame) {
                self.scheduler.fail();
                return Err(err);
            }
            debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                shapes = frame.shapes.len(),
                clusters = frame.clusters.len(),
                "render pass complete"
            );

            if !self.scheduler.complete() {
                return Ok(());
            }
        }
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
