use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{GeoPoint, MercatorProjection, PixelPoint, Viewport};
use crate::error::{MapError, MapResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

/// Inclusive bounds on the projection scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    min: f64,
    max: f64,
}

impl ZoomRange {
    /// Fails with `InvalidZoomRange` when `min > max`, `min <= 0`, or either
    /// bound is non-finite. Rejected at configuration time, never deferred.
    pub fn new(min: f64, max: f64) -> MapResult<Self> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(MapError::InvalidZoomRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn clamp(self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(self, scale: f64) -> bool {
        scale >= self.min && scale <= self.max
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 10_000.0,
        }
    }
}

/// Bounding box limiting how far the translate offset may move.
///
/// Keeps the map recoverable: translate can never leave the box, so no pan
/// sequence strands the view outside draggable range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslateExtent {
    pub min: PixelPoint,
    pub max: PixelPoint,
}

impl TranslateExtent {
    pub fn new(min: PixelPoint, max: PixelPoint) -> MapResult<Self> {
        if !min.is_finite() || !max.is_finite() || min.x > max.x || min.y > max.y {
            return Err(MapError::InvalidData(format!(
                "translate extent must be finite and ordered: min=({}, {}), max=({}, {})",
                min.x, min.y, max.x, max.y
            )));
        }
        Ok(Self { min, max })
    }

    /// Default extent: the viewport rectangle itself.
    #[must_use]
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self {
            min: PixelPoint::new(0.0, 0.0),
            max: PixelPoint::new(f64::from(viewport.width), f64::from(viewport.height)),
        }
    }

    #[must_use]
    pub fn clamp(self, point: PixelPoint) -> PixelPoint {
        PixelPoint::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    #[must_use]
    pub fn contains(self, point: PixelPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// How the translate extent tracks viewport changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExtentPolicy {
    /// Derive the extent from the viewport rectangle; re-derived on resize.
    Viewport,
    /// Host-supplied extent, preserved across resizes.
    Fixed(TranslateExtent),
}

/// Tuning for wheel-driven zoom stepping.
///
/// Sensitivity grows with the current scale so perceived zoom speed stays
/// constant across zoom levels: `step = delta * max(floor, scale / reference)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelZoomTuning {
    pub sensitivity_floor: f64,
    pub reference_scale: f64,
    /// Wheel deltas are clamped to this magnitude before applying.
    pub max_wheel_delta: f64,
}

impl Default for WheelZoomTuning {
    fn default() -> Self {
        Self {
            sensitivity_floor: 0.2,
            reference_scale: 400.0,
            max_wheel_delta: 150.0,
        }
    }
}

impl WheelZoomTuning {
    pub fn validate(self) -> MapResult<Self> {
        for (value, name) in [
            (self.sensitivity_floor, "sensitivity_floor"),
            (self.reference_scale, "reference_scale"),
            (self.max_wheel_delta, "max_wheel_delta"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MapError::InvalidData(format!(
                    "wheel tuning `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Interprets pan/zoom/resize gestures into bounded projection mutations.
///
/// Owns the projection state exclusively; everything else reads it through
/// [`Self::projection`]. Mutating calls never render — the engine schedules a
/// render pass after each one.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewController {
    projection: MercatorProjection,
    zoom_range: ZoomRange,
    extent_policy: ExtentPolicy,
    extent: TranslateExtent,
    wheel: WheelZoomTuning,
    mode: InteractionMode,
}

impl ViewController {
    /// The initial scale must already sit inside `zoom_range`; a config that
    /// starts outside its own bounds is rejected rather than adjusted.
    ///
    /// With `extent: None` the pan bounds derive from the viewport rectangle
    /// and follow resizes; a supplied extent is fixed.
    pub fn new(
        projection: MercatorProjection,
        zoom_range: ZoomRange,
        wheel: WheelZoomTuning,
        extent: Option<TranslateExtent>,
    ) -> MapResult<Self> {
        let wheel = wheel.validate()?;
        if !zoom_range.contains(projection.scale()) {
            return Err(MapError::InvalidScale {
                scale: projection.scale(),
            });
        }

        let (extent_policy, extent) = match extent {
            Some(extent) => (ExtentPolicy::Fixed(extent), extent),
            None => (
                ExtentPolicy::Viewport,
                TranslateExtent::from_viewport(projection.viewport()),
            ),
        };
        let mut controller = Self {
            projection,
            zoom_range,
            extent_policy,
            extent,
            wheel,
            mode: InteractionMode::Idle,
        };
        controller.clamp_translate()?;
        Ok(controller)
    }

    #[must_use]
    pub fn projection(&self) -> &MercatorProjection {
        &self.projection
    }

    #[must_use]
    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    #[must_use]
    pub fn translate_extent(&self) -> TranslateExtent {
        self.extent
    }

    #[must_use]
    pub fn wheel_tuning(&self) -> WheelZoomTuning {
        self.wheel
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn pan_start(&mut self) {
        self.mode = InteractionMode::Panning;
    }

    pub fn pan_end(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    /// Replaces the zoom bounds and pulls the current scale into them.
    pub fn configure_zoom_range(&mut self, zoom_range: ZoomRange) -> MapResult<()> {
        self.zoom_range = zoom_range;
        let clamped = zoom_range.clamp(self.projection.scale());
        self.projection.set_scale(clamped)
    }

    /// Pins the extent to a host-supplied box; survives resizes.
    pub fn configure_translate_extent(&mut self, extent: TranslateExtent) -> MapResult<()> {
        self.extent_policy = ExtentPolicy::Fixed(extent);
        self.extent = extent;
        self.clamp_translate()
    }

    /// Shifts the translate offset by a pixel delta, clamped into the extent.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> MapResult<()> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(MapError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        let current = self.projection.translate();
        let target = self
            .extent
            .clamp(PixelPoint::new(current.x + dx, current.y + dy));
        trace!(dx, dy, x = target.x, y = target.y, "pan");
        self.projection.set_translate(target)
    }

    /// Applies a wheel-delta zoom step anchored at `anchor`.
    ///
    /// The geo-coordinate under the anchor pixel stays fixed (zoom-to-cursor)
    /// unless the extent clamp engages at the box edge.
    pub fn zoom_by(&mut self, wheel_delta: f64, anchor: PixelPoint) -> MapResult<()> {
        if !wheel_delta.is_finite() {
            return Err(MapError::InvalidData(
                "wheel delta must be finite".to_owned(),
            ));
        }
        if !anchor.is_finite() {
            return Err(MapError::InvalidData(
                "zoom anchor must be finite".to_owned(),
            ));
        }

        let current = self.projection.scale();
        let delta = wheel_delta.clamp(-self.wheel.max_wheel_delta, self.wheel.max_wheel_delta);
        let sensitivity = (current / self.wheel.reference_scale).max(self.wheel.sensitivity_floor);
        let target = self.zoom_range.clamp(current - delta * sensitivity);
        if target == current {
            return Ok(());
        }

        // Keeping the anchor's geo-coordinate fixed under a scale change is a
        // pure affine adjustment: pixel offsets from the anchor scale by the
        // zoom ratio, so the translate point moves toward/away from it.
        let ratio = target / current;
        let translate = self.projection.translate();
        let adjusted = PixelPoint::new(
            anchor.x - ratio * (anchor.x - translate.x),
            anchor.y - ratio * (anchor.y - translate.y),
        );

        trace!(from = current, to = target, "zoom");
        self.projection.set_scale(target)?;
        self.projection.set_translate(self.extent.clamp(adjusted))
    }

    /// Adopts a new viewport size, keeping the same geo-center centered and
    /// re-deriving the translate extent per policy.
    pub fn resize(&mut self, viewport: Viewport) -> MapResult<()> {
        let old_center = self.projection.viewport().center();
        self.projection.set_viewport_size(viewport)?;

        if matches!(self.extent_policy, ExtentPolicy::Viewport) {
            self.extent = TranslateExtent::from_viewport(viewport);
        }

        let new_center = viewport.center();
        let translate = self.projection.translate();
        let shifted = PixelPoint::new(
            translate.x + (new_center.x - old_center.x),
            translate.y + (new_center.y - old_center.y),
        );
        self.projection.set_translate(self.extent.clamp(shifted))
    }

    /// Re-centers the view on a geographic coordinate without changing zoom.
    pub fn center_on(&mut self, center: GeoPoint) -> MapResult<()> {
        self.projection.set_center(center)?;
        let centered = self.extent.clamp(self.projection.viewport().center());
        self.projection.set_translate(centered)
    }

    fn clamp_translate(&mut self) -> MapResult<()> {
        let clamped = self.extent.clamp(self.projection.translate());
        self.projection.set_translate(clamped)
    }
}
