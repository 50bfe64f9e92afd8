//! Dockhand Core
//!
//! Shared plumbing for the dockhand docking engine: collections, geometry,
//! logging and profiling.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod profiling;

pub use geometry::{Rect, Size, Vec2};
