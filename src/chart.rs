//! The benchmark chart: a CSV grid shown as a surface with the fixed
//! sprite-tweening layout.

use crate::config::ChartConfig;
use crate::data::Grid;
use crate::error::Result;
use crate::plots::{BuiltSurface, SurfacePlot};
use crate::viewer::Viewer;
use std::path::Path;

/// Input file read by the `bench-graph` binary, relative to the working
/// directory.
pub const DEFAULT_INPUT: &str = "bench-results.csv";

/// A loaded grid that has not been displayed yet.
#[derive(Debug, Clone)]
pub struct BenchChart {
    grid: Grid,
    config: ChartConfig,
}

/// A chart that a viewer has shown. Nothing transitions back.
#[derive(Debug)]
pub struct Displayed {
    surface: BuiltSurface,
}

impl Displayed {
    /// The surface that was shown.
    #[must_use]
    pub const fn surface(&self) -> &BuiltSurface {
        &self.surface
    }
}

impl BenchChart {
    /// Load `path` with the default benchmark layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Grid::from_path(path)?, ChartConfig::default()))
    }

    /// Chart over an already loaded grid.
    #[must_use]
    pub const fn new(grid: Grid, config: ChartConfig) -> Self {
        Self { grid, config }
    }

    /// The height field.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Layout used when building the surface.
    #[must_use]
    pub const fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Build the surface without displaying it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn surface(&self) -> Result<BuiltSurface> {
        SurfacePlot::new().z(&self.grid).config(self.config.clone()).build()
    }

    /// Build the surface and hand it to `viewer`.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails or the viewer fails.
    pub fn show(self, viewer: &dyn Viewer) -> Result<Displayed> {
        let surface = self.surface()?;
        viewer.show(&surface)?;
        Ok(Displayed { surface })
    }
}
