mod frame;
mod null_surface;
mod primitives;

pub use frame::RenderFrame;
pub use null_surface::NullSurface;
pub use primitives::{ProjectedFeature, project_features};

use crate::error::MapResult;

/// Contract implemented by the injected drawing layer.
///
/// Surfaces receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from projection and interaction logic. The
/// scheduler treats `draw` as synchronous; an async host must block until its
/// drawing completes before returning.
pub trait DrawSurface {
    fn draw(&mut self, frame: &RenderFrame) -> MapResult<()>;
}
