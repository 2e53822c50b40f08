//! High-level plot types.
//!
//! Provides ready-to-use visualization types with builder APIs.

mod surface;

pub use surface::{BuiltSurface, SurfacePalette, SurfacePlot};
