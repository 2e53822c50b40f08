//! 3D projection and rasterization.
//!
//! [`Camera`] and [`Scene`] turn a grid into projected, depth-sorted faces;
//! the primitives draw them into a [`Framebuffer`](crate::framebuffer::Framebuffer).
//!
//! # Algorithms
//!
//! - **Painter's algorithm**: faces are drawn far to near
//! - **Wu's Anti-aliased Line**: smooth grid lines and outlines
//! - **Scanline fill**: convex polygons split into triangles
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod camera;
mod primitives;
mod scene;

pub use camera::Camera;
pub use primitives::{draw_line_aa, fill_polygon, fill_triangle};
pub use scene::{Axis, AxisGuide, Face, Marker, Pane, Scene, TickLabel, HALF};
