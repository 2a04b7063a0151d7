mod donut;

pub use donut::{DonutLayout, DonutLayoutConfig, DonutSegment, aggregate_metrics, build_donut_layout};
