mod data_controller;
mod engine;
mod engine_config;
mod engine_snapshot;
mod scheduler;

pub use engine::MapEngine;
pub use engine_config::MapEngineConfig;
pub use engine_snapshot::MapEngineSnapshot;
pub use scheduler::{RenderPhase, RenderScheduler};
