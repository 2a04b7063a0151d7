//! mapview-rs: map viewport engine.
//!
//! This crate provides the non-drawing half of an interactive map: a
//! Mercator-class projection under live pan/zoom/resize gestures, a greedy
//! clustering pass over visible data markers, and a render scheduler that
//! coalesces overlapping redraw requests. Drawing itself is injected through
//! the [`render::DrawSurface`] trait, so hosts bring their own SVG, canvas,
//! or GPU backend.

pub mod api;
pub mod cluster;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{MapEngine, MapEngineConfig};
pub use error::{MapError, MapResult};
