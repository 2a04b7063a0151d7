use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{DataPoint, MercatorProjection, PixelPoint};
use crate::error::{MapError, MapResult};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

/// Tuning for the viewport clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Pixel-space merge threshold: a point joins the first cluster whose
    /// seed centroid lies within this Euclidean distance.
    pub radius_px: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { radius_px: 100.0 }
    }
}

impl ClusterConfig {
    pub fn validate(self) -> MapResult<Self> {
        if !self.radius_px.is_finite() || self.radius_px <= 0.0 {
            return Err(MapError::InvalidData(
                "cluster config `radius_px` must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Group of data points merged for display at the current zoom.
///
/// Transient output of one render pass; never persisted or incrementally
/// updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Arithmetic mean of member pixel positions.
    pub centroid: PixelPoint,
    /// Member data-point ids, in input order. Never empty.
    pub members: Vec<String>,
    /// Pixel spread: distance from the centroid to the furthest member.
    pub radius: f64,
}

impl Cluster {
    /// Singletons render as plain markers; multi-member clusters as
    /// aggregates with a count.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Partitions the visible points into render clusters.
///
/// Greedy single-pass union: project every point, drop those outside the
/// viewport rectangle, then scan in input order joining the first existing
/// cluster whose *seed* centroid (the founding point's pixel, not updated
/// mid-pass) lies within `radius_px`. Final centroids are the mean of member
/// pixels, computed after assignment. Identical input always yields an
/// identical partition in cluster-creation order.
///
/// Points are expected to be domain-validated at ingest; an out-of-domain
/// coordinate here is an error, not a skip.
pub fn cluster_within_view(
    projection: &MercatorProjection,
    points: &[DataPoint],
    config: ClusterConfig,
) -> MapResult<Vec<Cluster>> {
    let config = config.validate()?;
    let visible = project_visible(projection, points)?;

    struct PendingCluster {
        seed: PixelPoint,
        members: SmallVec<[usize; 8]>,
    }

    // Members are stored as slots into `visible`, keeping pixel and id
    // lookups O(1) during centroid finalization.
    let mut pending: Vec<PendingCluster> = Vec::new();
    for (slot, (_, pixel)) in visible.iter().enumerate() {
        let joined = pending
            .iter_mut()
            .find(|cluster| cluster.seed.distance_to(*pixel) <= config.radius_px);
        match joined {
            Some(cluster) => cluster.members.push(slot),
            None => pending.push(PendingCluster {
                seed: *pixel,
                members: SmallVec::from_slice(&[slot]),
            }),
        }
    }

    let clusters = pending
        .into_iter()
        .map(|cluster| {
            let count = cluster.members.len() as f64;
            let sum = cluster
                .members
                .iter()
                .map(|&slot| visible[slot].1)
                .fold((0.0, 0.0), |acc, pixel| (acc.0 + pixel.x, acc.1 + pixel.y));
            let centroid = PixelPoint::new(sum.0 / count, sum.1 / count);

            let radius = cluster
                .members
                .iter()
                .map(|&slot| OrderedFloat(centroid.distance_to(visible[slot].1)))
                .max()
                .map_or(0.0, |distance| distance.into_inner());

            Cluster {
                centroid,
                members: cluster
                    .members
                    .iter()
                    .map(|&slot| points[visible[slot].0].id.clone())
                    .collect(),
                radius,
            }
        })
        .collect();

    Ok(clusters)
}

/// Projects every point and keeps the visible ones, preserving input order.
///
/// The parallel path only parallelizes projection; the surviving order is
/// identical to the sequential path, so clustering stays deterministic.
fn project_visible(
    projection: &MercatorProjection,
    points: &[DataPoint],
) -> MapResult<Vec<(usize, PixelPoint)>> {
    let viewport = projection.viewport();

    #[cfg(feature = "parallel-projection")]
    let projected: MapResult<Vec<PixelPoint>> = points
        .par_iter()
        .map(|point| projection.project(point.coords))
        .collect();

    #[cfg(not(feature = "parallel-projection"))]
    let projected: MapResult<Vec<PixelPoint>> = points
        .iter()
        .map(|point| projection.project(point.coords))
        .collect();

    Ok(projected?
        .into_iter()
        .enumerate()
        .filter(|(_, pixel)| viewport.contains(*pixel))
        .collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{ClusterConfig, cluster_within_view};
    use crate::core::{DataPoint, GeoPoint, MercatorProjection, PixelPoint, Viewport};

    fn build_projection(scale: f64) -> MercatorProjection {
        MercatorProjection::new(
            GeoPoint::new(-96.0, 38.0),
            scale,
            PixelPoint::new(400.0, 225.0),
            Viewport::new(800, 450),
        )
        .expect("projection init")
    }

    fn point(id: &str, longitude: f64, latitude: f64) -> DataPoint {
        DataPoint::new(id, "org", GeoPoint::new(longitude, latitude))
    }

    fn radius(px: f64) -> ClusterConfig {
        ClusterConfig { radius_px: px }
    }

    #[test]
    fn distant_points_stay_singletons() {
        // At scale 500 these two project ~70px apart, well over the 20px
        // threshold.
        let projection = build_projection(500.0);
        let points = vec![point("a", -115.0, 40.0), point("b", -110.0, 35.0)];

        let clusters =
            cluster_within_view(&projection, &points, radius(20.0)).expect("cluster pass");
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.is_singleton()));
        assert_eq!(clusters[0].members, vec!["a".to_owned()]);
        assert_eq!(clusters[1].members, vec!["b".to_owned()]);
    }

    #[test]
    fn zooming_out_merges_the_same_points() {
        // Same pair at scale 50 sits ~7px apart and merges.
        let projection = build_projection(50.0);
        let points = vec![point("a", -115.0, 40.0), point("b", -110.0, 35.0)];

        let clusters =
            cluster_within_view(&projection, &points, radius(20.0)).expect("cluster pass");
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_count(), 2);
        assert_eq!(clusters[0].members, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn offscreen_points_are_culled_before_clustering() {
        let projection = build_projection(500.0);
        let points = vec![
            point("visible", -96.0, 38.0),
            point("far-east", 120.0, 38.0),
            point("far-north", -96.0, 84.0),
        ];

        let clusters =
            cluster_within_view(&projection, &points, radius(20.0)).expect("cluster pass");
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec!["visible".to_owned()]);
    }

    #[test]
    fn clustering_is_deterministic_across_invocations() {
        let projection = build_projection(120.0);
        let points: Vec<_> = (0..40)
            .map(|i| {
                let lon = -120.0 + f64::from(i) * 1.3;
                let lat = 30.0 + f64::from(i % 7) * 1.9;
                point(&format!("p{i}"), lon, lat)
            })
            .collect();

        let first = cluster_within_view(&projection, &points, radius(60.0)).expect("pass 1");
        let second = cluster_within_view(&projection, &points, radius(60.0)).expect("pass 2");
        assert_eq!(first, second);
    }

    #[test]
    fn first_match_wins_on_equidistant_clusters() {
        // Seeds at x=100 and x=200; the probe lands exactly between them,
        // qualifies for both, and joins the older cluster.
        let projection = MercatorProjection::new(
            GeoPoint::new(0.0, 0.0),
            100.0,
            PixelPoint::new(150.0, 150.0),
            Viewport::new(300, 300),
        )
        .expect("projection init");

        let to_deg = |px: f64| (px / 100.0).to_degrees();
        let points = vec![
            point("left", to_deg(-50.0), 0.0),
            point("right", to_deg(50.0), 0.0),
            point("middle", 0.0, 0.0),
        ];

        let clusters =
            cluster_within_view(&projection, &points, radius(60.0)).expect("cluster pass");
        assert_eq!(clusters.len(), 2);
        assert_eq!(
            clusters[0].members,
            vec!["left".to_owned(), "middle".to_owned()]
        );
        assert_eq!(clusters[1].members, vec!["right".to_owned()]);
    }

    #[test]
    fn seed_centroids_are_not_updated_mid_pass() {
        // b joins a's cluster. c is within the radius of the a/b mean but
        // outside the radius of a's seed, so it founds a new cluster.
        let projection = MercatorProjection::new(
            GeoPoint::new(0.0, 0.0),
            100.0,
            PixelPoint::new(150.0, 150.0),
            Viewport::new(300, 300),
        )
        .expect("projection init");

        let to_deg = |px: f64| (px / 100.0).to_degrees();
        let points = vec![
            point("a", to_deg(-100.0), 0.0),
            point("b", to_deg(-60.0), 0.0),
            point("c", to_deg(-35.0), 0.0),
        ];

        let clusters =
            cluster_within_view(&projection, &points, radius(50.0)).expect("cluster pass");
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(clusters[1].members, vec!["c".to_owned()]);
    }

    #[test]
    fn final_centroid_is_mean_of_member_pixels() {
        let projection = MercatorProjection::new(
            GeoPoint::new(0.0, 0.0),
            100.0,
            PixelPoint::new(150.0, 150.0),
            Viewport::new(300, 300),
        )
        .expect("projection init");

        let to_deg = |px: f64| (px / 100.0).to_degrees();
        let points = vec![point("a", to_deg(-40.0), 0.0), point("b", to_deg(0.0), 0.0)];

        let clusters =
            cluster_within_view(&projection, &points, radius(50.0)).expect("cluster pass");
        assert_eq!(clusters.len(), 1);
        assert_abs_diff_eq!(clusters[0].centroid.x, 130.0, epsilon = 1e-9);
        assert_abs_diff_eq!(clusters[0].centroid.y, 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(clusters[0].radius, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn close_pair_always_shares_a_cluster() {
        let projection = build_projection(500.0);
        let points = vec![point("a", -96.0, 38.0), point("b", -96.02, 38.01)];

        let clusters =
            cluster_within_view(&projection, &points, radius(20.0)).expect("cluster pass");
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_count(), 2);
    }

    #[test]
    fn invalid_radius_is_rejected() {
        let projection = build_projection(500.0);
        assert!(cluster_within_view(&projection, &[], radius(0.0)).is_err());
        assert!(cluster_within_view(&projection, &[], radius(f64::NAN)).is_err());
    }
}
