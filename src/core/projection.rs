use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::core::types::{GeoPoint, LATITUDE_LIMIT_DEG, PixelPoint, Viewport};
use crate::error::{MapError, MapResult};

/// Cylindrical (Mercator-class) geo↔pixel transform.
///
/// Matches the d3 `geoMercator().center().translate().scale()` convention:
/// the configured `center` lands on the `translate` pixel, `scale` multiplies
/// radian-space coordinates, and pixel `y` grows southward.
///
/// Pure state holder: projecting never touches rendering or bounds. Zoom and
/// pan policy live in [`crate::interaction::ViewController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    center: GeoPoint,
    scale: f64,
    translate: PixelPoint,
    viewport: Viewport,
    // Derived center terms, rebuilt whenever `center` changes.
    center_lon_rad: f64,
    center_merc_y: f64,
}

impl MercatorProjection {
    pub fn new(
        center: GeoPoint,
        scale: f64,
        translate: PixelPoint,
        viewport: Viewport,
    ) -> MapResult<Self> {
        let center = center.validated()?;
        validate_scale(scale)?;
        validate_translate(translate)?;
        let viewport = viewport.validated()?;

        Ok(Self {
            center,
            scale,
            translate,
            viewport,
            center_lon_rad: center.longitude.to_radians(),
            center_merc_y: mercator_y(center.latitude),
        })
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn translate(&self) -> PixelPoint {
        self.translate
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_center(&mut self, center: GeoPoint) -> MapResult<()> {
        let center = center.validated()?;
        self.center = center;
        self.center_lon_rad = center.longitude.to_radians();
        self.center_merc_y = mercator_y(center.latitude);
        Ok(())
    }

    /// Rejects non-positive and non-finite scales; never silently corrects.
    pub fn set_scale(&mut self, scale: f64) -> MapResult<()> {
        validate_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    pub fn set_translate(&mut self, translate: PixelPoint) -> MapResult<()> {
        validate_translate(translate)?;
        self.translate = translate;
        Ok(())
    }

    pub fn set_viewport_size(&mut self, viewport: Viewport) -> MapResult<()> {
        self.viewport = viewport.validated()?;
        Ok(())
    }

    /// Projects a geographic coordinate to viewport pixel space.
    ///
    /// Strict: coordinates outside the projection domain are an error, not a
    /// clamp. Use [`Self::project_clamped`] for opaque shape vertices.
    pub fn project(&self, geo: GeoPoint) -> MapResult<PixelPoint> {
        let geo = geo.validated()?;
        Ok(self.project_unchecked(geo))
    }

    /// Projects with the explicit clamping policy: longitude wrapped into
    /// (-180, 180], latitude clamped to the domain limit.
    #[must_use]
    pub fn project_clamped(&self, geo: GeoPoint) -> PixelPoint {
        let clamped = GeoPoint::new(
            normalize_longitude(geo.longitude),
            geo.latitude.clamp(-LATITUDE_LIMIT_DEG, LATITUDE_LIMIT_DEG),
        );
        self.project_unchecked(clamped)
    }

    /// Inverse mapping from pixel space back to geographic coordinates.
    ///
    /// Total over finite pixels; the result's latitude can fall outside the
    /// strict domain when the pixel lies beyond the pole cutoff.
    pub fn unproject(&self, pixel: PixelPoint) -> MapResult<GeoPoint> {
        if !pixel.is_finite() {
            return Err(MapError::InvalidData(
                "unproject pixel must be finite".to_owned(),
            ));
        }

        let lon_rad = self.center_lon_rad + (pixel.x - self.translate.x) / self.scale;
        let merc_y = self.center_merc_y - (pixel.y - self.translate.y) / self.scale;
        Ok(GeoPoint::new(
            normalize_longitude(lon_rad.to_degrees()),
            inverse_mercator_y(merc_y),
        ))
    }

    fn project_unchecked(&self, geo: GeoPoint) -> PixelPoint {
        let x = self.translate.x + self.scale * (geo.longitude.to_radians() - self.center_lon_rad);
        let y = self.translate.y + self.scale * (self.center_merc_y - mercator_y(geo.latitude));
        PixelPoint::new(x, y)
    }
}

fn validate_scale(scale: f64) -> MapResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(MapError::InvalidScale { scale });
    }
    Ok(())
}

fn validate_translate(translate: PixelPoint) -> MapResult<()> {
    if !translate.is_finite() {
        return Err(MapError::InvalidData(
            "translate offset must be finite".to_owned(),
        ));
    }
    Ok(())
}

fn mercator_y(latitude_deg: f64) -> f64 {
    (FRAC_PI_4 + latitude_deg.to_radians() / 2.0).tan().ln()
}

fn inverse_mercator_y(merc_y: f64) -> f64 {
    (2.0 * merc_y.exp().atan() - FRAC_PI_2).to_degrees()
}

/// Wraps a longitude into (-180, 180].
fn normalize_longitude(longitude_deg: f64) -> f64 {
    let wrapped = (longitude_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::{MercatorProjection, normalize_longitude};
    use crate::core::types::{GeoPoint, PixelPoint, Viewport};
    use crate::error::MapError;

    fn build_projection() -> MercatorProjection {
        MercatorProjection::new(
            GeoPoint::new(-96.0, 38.0),
            500.0,
            PixelPoint::new(400.0, 225.0),
            Viewport::new(800, 450),
        )
        .expect("projection init")
    }

    #[test]
    fn center_projects_onto_translate() {
        let projection = build_projection();
        let pixel = projection
            .project(GeoPoint::new(-96.0, 38.0))
            .expect("project center");
        assert_abs_diff_eq!(pixel.x, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pixel.y, 225.0, epsilon = 1e-9);
    }

    #[test]
    fn west_and_north_move_left_and_up() {
        let projection = build_projection();
        let pixel = projection
            .project(GeoPoint::new(-115.0, 40.0))
            .expect("project");
        assert!(pixel.x < 400.0);
        assert!(pixel.y < 225.0);
    }

    #[test]
    fn project_rejects_out_of_domain_latitude() {
        let projection = build_projection();
        let result = projection.project(GeoPoint::new(0.0, 89.0));
        assert!(matches!(
            result,
            Err(MapError::OutOfDomainCoordinate { .. })
        ));
    }

    #[test]
    fn project_clamped_matches_strict_inside_domain() {
        let projection = build_projection();
        let geo = GeoPoint::new(-110.0, 35.0);
        let strict = projection.project(geo).expect("project");
        let clamped = projection.project_clamped(geo);
        assert_abs_diff_eq!(strict.x, clamped.x, epsilon = 1e-12);
        assert_abs_diff_eq!(strict.y, clamped.y, epsilon = 1e-12);
    }

    #[test]
    fn project_clamped_pins_polar_vertices_to_domain_edge() {
        let projection = build_projection();
        let polar = projection.project_clamped(GeoPoint::new(0.0, 89.9));
        let edge = projection.project_clamped(GeoPoint::new(0.0, 85.06));
        assert_abs_diff_eq!(polar.y, edge.y, epsilon = 1e-9);
    }

    #[test]
    fn set_scale_rejects_non_positive() {
        let mut projection = build_projection();
        assert!(matches!(
            projection.set_scale(0.0),
            Err(MapError::InvalidScale { .. })
        ));
        assert!(matches!(
            projection.set_scale(-3.0),
            Err(MapError::InvalidScale { .. })
        ));
        assert_abs_diff_eq!(projection.scale(), 500.0);
    }

    #[test]
    fn normalize_longitude_wraps_into_half_open_range() {
        assert_abs_diff_eq!(normalize_longitude(190.0), -170.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_longitude(-190.0), 170.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_longitude(180.0), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_longitude(-180.0), 180.0, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn project_unproject_round_trip(
            lon in -179.9f64..180.0,
            lat in -85.0f64..85.0,
            scale in 10.0f64..5_000.0,
        ) {
            let mut projection = build_projection();
            projection.set_scale(scale).expect("set scale");

            let geo = GeoPoint::new(lon, lat);
            let pixel = projection.project(geo).expect("project");
            let round = projection.unproject(pixel).expect("unproject");

            prop_assert!((round.longitude - lon).abs() < 1e-9);
            prop_assert!((round.latitude - lat).abs() < 1e-9);
        }
    }
}
