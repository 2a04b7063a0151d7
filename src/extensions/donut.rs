use std::f64::consts::TAU;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, StatusCount};
use crate::error::{MapError, MapResult};

/// Merges metrics across data points into one status sequence.
///
/// Statuses keep first-appearance order, so an aggregate over a cluster's
/// members is as deterministic as the cluster partition itself.
#[must_use]
pub fn aggregate_metrics<'a, I>(points: I) -> Vec<StatusCount>
where
    I: IntoIterator<Item = &'a DataPoint>,
{
    let mut totals: IndexMap<&str, u64> = IndexMap::new();
    for point in points {
        for metric in &point.metrics {
            *totals.entry(metric.status.as_str()).or_insert(0) += metric.count;
        }
    }
    totals
        .into_iter()
        .map(|(status, count)| StatusCount::new(status, count))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonutLayoutConfig {
    /// Radius of the donut hole; 0 degenerates to a pie.
    pub inner_radius_px: f64,
    pub outer_radius_px: f64,
}

impl Default for DonutLayoutConfig {
    fn default() -> Self {
        Self {
            inner_radius_px: 14.0,
            outer_radius_px: 24.0,
        }
    }
}

impl DonutLayoutConfig {
    fn validate(self) -> MapResult<Self> {
        if !self.inner_radius_px.is_finite() || self.inner_radius_px < 0.0 {
            return Err(MapError::InvalidData(
                "donut config `inner_radius_px` must be finite and >= 0".to_owned(),
            ));
        }
        if !self.outer_radius_px.is_finite() || self.outer_radius_px <= self.inner_radius_px {
            return Err(MapError::InvalidData(
                "donut config `outer_radius_px` must be finite and > inner_radius_px".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// One arc of an aggregate badge, angles in radians clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutSegment {
    pub status: String,
    pub count: u64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Arc geometry for an aggregate cluster badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutLayout {
    pub inner_radius_px: f64,
    pub outer_radius_px: f64,
    pub segments: Vec<DonutSegment>,
}

/// Lays out donut arcs proportional to metric counts.
///
/// Segments follow the metric sequence order; arcs partition the full circle
/// exactly (the last segment ends at `TAU`, cumulative prefixes avoid drift).
/// Zero-count metrics emit zero-width arcs; an all-zero or empty sequence
/// yields an empty layout.
pub fn build_donut_layout(
    metrics: &[StatusCount],
    config: DonutLayoutConfig,
) -> MapResult<DonutLayout> {
    let config = config.validate()?;

    let total: u64 = metrics.iter().map(|metric| metric.count).sum();
    if total == 0 {
        return Ok(DonutLayout {
            inner_radius_px: config.inner_radius_px,
            outer_radius_px: config.outer_radius_px,
            segments: Vec::new(),
        });
    }

    let mut prefix = 0u64;
    let segments = metrics
        .iter()
        .map(|metric| {
            let start_angle = prefix as f64 / total as f64 * TAU;
            prefix += metric.count;
            let end_angle = prefix as f64 / total as f64 * TAU;
            DonutSegment {
                status: metric.status.clone(),
                count: metric.count,
                start_angle,
                end_angle,
            }
        })
        .collect();

    Ok(DonutLayout {
        inner_radius_px: config.inner_radius_px,
        outer_radius_px: config.outer_radius_px,
        segments,
    })
}
