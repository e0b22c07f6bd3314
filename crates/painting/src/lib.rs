//! Layercake painting system - region-aware painting on a tiered cake
//!
//! This crate provides the painting core of the decorator:
//! - [`geometry`] - Tier silhouettes, hit testing and brush clipping
//! - [`surface`] - CPU RGBA paint surface, one per tier region
//! - [`brush`] - Brush engine: clipped stamps, fill and sprinkles
//! - [`smoothing`] - Stroke buffering and Catmull-Rom replay on release
//! - [`compositor`] - Base render, layer compositing and overlays
//! - [`pipeline`] - Complete painting session with undo/redo and export

pub mod brush;
pub mod compositor;
pub mod constants;
pub mod geometry;
pub mod pipeline;
mod rng;
pub mod smoothing;
pub mod surface;
pub mod types;

pub use brush::*;
pub use compositor::*;
pub use constants::*;
pub use geometry::*;
pub use pipeline::*;
pub use smoothing::*;
pub use surface::*;
pub use types::*;
