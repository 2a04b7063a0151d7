use crate::error::MapResult;
use crate::render::{DrawSurface, RenderFrame};

/// No-op surface used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// before a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullSurface {
    pub draw_count: usize,
    pub last_shape_count: usize,
    pub last_cluster_count: usize,
}

impl DrawSurface for NullSurface {
    fn draw(&mut self, frame: &RenderFrame) -> MapResult<()> {
        frame.validate()?;
        self.draw_count += 1;
        self.last_shape_count = frame.shapes.len();
        self.last_cluster_count = frame.clusters.len();
        Ok(())
    }
}
