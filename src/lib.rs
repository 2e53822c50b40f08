//! # bench-surface
//!
//! 3D surface charts of benchmark sweeps.
//!
//! A CSV table of timings (one row per tween count, one column per sprite
//! count) becomes a shaded height field inside a unit cube, with back panes,
//! tick labels, a colorbar and per-cell hover tooltips. The same scene can be
//! written as SVG, PNG, a standalone HTML page, or drawn in the terminal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bench_surface::prelude::*;
//!
//! # fn main() -> bench_surface::Result<()> {
//! let chart = BenchChart::from_csv("bench-results.csv")?;
//! chart.show(&FileViewer::new("bench-results.svg"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `terminal`: interactive [`viewer::TerminalViewer`] (crossterm)
//!
//! ## Diagnostics
//!
//! Set `BENCH_SURFACE_DEBUG=1` and call [`debug::enable_from_env`] to get
//! timing and load logs on stderr. Output is unaffected.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Debug logging and timing.
pub mod debug;

/// Color types.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions, colorscales and axis ticks.
pub mod scale;

/// CSV loading into a rectangular grid.
pub mod data;

/// Chart layout configuration.
pub mod config;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Camera, scene construction and rasterization.
pub mod render;

/// High-level plot types.
pub mod plots;

/// Output encoders (PNG, SVG, HTML, terminal).
pub mod output;

// ============================================================================
// Presentation
// ============================================================================

/// Display back ends.
pub mod viewer;

/// The benchmark chart.
pub mod chart;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for bench-surface operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use bench_surface::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chart::{BenchChart, Displayed, DEFAULT_INPUT};
    pub use crate::color::Rgba;
    pub use crate::config::{ChartConfig, Margin, SceneConfig};
    pub use crate::data::Grid;
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, Rect};
    pub use crate::plots::{BuiltSurface, SurfacePalette, SurfacePlot};
    pub use crate::render::Camera;
    pub use crate::scale::{ColorScale, LinearScale, Scale};
    pub use crate::viewer::{BrowserViewer, FileViewer, Viewer};
}
