//! 3D surface plot of a value grid.
//!
//! Columns run along X, rows along Y and values along Z, colored with a
//! plasma colorscale and keyed by a colorbar on the right.
//! Raster output draws the geometry only; SVG output adds the title, axis
//! titles, tick labels and a hover tooltip per face.

use crate::color::Rgba;
use crate::config::ChartConfig;
use crate::data::Grid;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::output::{HtmlExporter, PngEncoder, SvgEncoder, TextAnchor};
use crate::render::{draw_line_aa, fill_polygon, Axis, Camera, Scene};
use crate::scale::{ColorScale, Scale, Ticks};

/// Width reserved on the right of the plot area for the colorbar.
const COLORBAR_STRIP: f32 = 100.0;
/// Colorbar thickness in pixels.
const COLORBAR_THICKNESS: f32 = 24.0;
/// Number of flat bands the colorbar gradient is drawn with.
const COLORBAR_BANDS: usize = 64;

const TITLE_FONT: f32 = 17.0;
const AXIS_TITLE_FONT: f32 = 14.0;
const TICK_FONT: f32 = 12.0;
const MARKER_RADIUS: f32 = 4.0;

/// Colorscale for the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfacePalette {
    /// Plasma, dark blue through orange to yellow.
    #[default]
    Plasma,
    /// Viridis (perceptually uniform, colorblind-safe).
    Viridis,
    /// Greyscale.
    Greyscale,
}

impl SurfacePalette {
    fn color_scale(self, domain: (f64, f64)) -> Result<ColorScale> {
        match self {
            Self::Plasma => ColorScale::plasma(domain),
            Self::Viridis => ColorScale::viridis(domain),
            Self::Greyscale => ColorScale::greyscale(domain),
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Grid(Grid),
    Rows(Vec<Vec<f64>>),
}

/// Builder for surface plots.
#[derive(Debug, Clone, Default)]
pub struct SurfacePlot {
    source: Option<Source>,
    config: ChartConfig,
    palette: SurfacePalette,
    camera: Option<Camera>,
}

impl SurfacePlot {
    /// Create a new surface plot builder with the default chart config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a loaded grid as the height field.
    #[must_use]
    pub fn z(mut self, grid: &Grid) -> Self {
        self.source = Some(Source::Grid(grid.clone()));
        self
    }

    /// Use nested rows as the height field. Validated in [`build`](Self::build).
    #[must_use]
    pub fn z_rows(mut self, rows: &[Vec<f64>]) -> Self {
        self.source = Some(Source::Rows(rows.to_vec()));
        self
    }

    /// Set the chart configuration.
    #[must_use]
    pub fn config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the colorscale.
    #[must_use]
    pub fn palette(mut self, palette: SurfacePalette) -> Self {
        self.palette = palette;
        self
    }

    /// Override the camera. Defaults to the config's camera eye.
    #[must_use]
    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Validate inputs and project the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if no data was given, the rows are not a finite
    /// rectangular grid, or the configuration does not validate.
    pub fn build(self) -> Result<BuiltSurface> {
        self.config.validate()?;
        let grid = match self.source {
            Some(Source::Grid(grid)) => grid,
            Some(Source::Rows(rows)) => Grid::from_rows(&rows)?,
            None => return Err(Error::EmptyData),
        };

        let camera = self.camera.unwrap_or_else(|| Camera::new(self.config.scene.camera_eye));
        let (viewport, colorbar_strip) = self.config.plot_area().split_right(COLORBAR_STRIP);

        let colors = self.palette.color_scale(grid.extent())?;
        let scene = Scene::new(&grid, camera, viewport);

        crate::info!(
            "surface",
            "built {}x{} surface: {} faces on {}x{} canvas",
            grid.rows(),
            grid.cols(),
            scene.faces().len(),
            self.config.width,
            self.config.height
        );

        Ok(BuiltSurface {
            grid,
            config: self.config,
            palette: self.palette,
            colors,
            scene,
            colorbar: colorbar_rect(colorbar_strip),
        })
    }
}

/// The colorbar sits at the left of its strip and spans 90% of the height.
fn colorbar_rect(strip: Rect) -> Rect {
    let height = strip.height * 0.9;
    Rect::new(
        strip.x + 10.0,
        strip.y + (strip.height - height) / 2.0,
        COLORBAR_THICKNESS.min(strip.width),
        height,
    )
}

/// A validated, projected surface ready for output.
#[derive(Debug, Clone)]
pub struct BuiltSurface {
    grid: Grid,
    config: ChartConfig,
    palette: SurfacePalette,
    colors: ColorScale,
    scene: Scene,
    colorbar: Rect,
}

impl BuiltSurface {
    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Height field as nested rows, exactly as given.
    #[must_use]
    pub fn z_values(&self) -> Vec<Vec<f64>> {
        self.grid.to_rows()
    }

    /// Underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Chart configuration.
    #[must_use]
    pub const fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Colorscale in use.
    #[must_use]
    pub const fn palette(&self) -> SurfacePalette {
        self.palette
    }

    /// Canvas width and height in pixels.
    #[must_use]
    pub const fn canvas_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Projected scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Colorbar rectangle in canvas pixels.
    #[must_use]
    pub const fn colorbar(&self) -> Rect {
        self.colorbar
    }

    /// Same surface seen through another camera.
    #[must_use]
    pub fn with_camera(&self, camera: Camera) -> Self {
        let scene = Scene::new(&self.grid, camera, self.scene.viewport());
        Self { scene, ..self.clone() }
    }

    fn face_color(&self, value: f64, shade: f32) -> Rgba {
        self.colors.scale(value).shade(shade)
    }

    /// Draw panes, surface and colorbar into `fb`.
    pub fn render(&self, fb: &mut Framebuffer) {
        crate::time_scope!("surface", "raster render");

        for pane in self.scene.panes() {
            fill_polygon(fb, &pane.corners, Rgba::PANE);
            for &(a, b) in &pane.grid {
                draw_line_aa(fb, a, b, Rgba::WHITE);
            }
        }

        for face in self.scene.faces() {
            fill_polygon(fb, &face.corners, self.face_color(face.value, face.shade));
        }

        let markers = self.scene.markers();
        for pair in markers.windows(2) {
            let color = self.face_color((pair[0].value + pair[1].value) / 2.0, 1.0);
            draw_line_aa(fb, pair[0].at, pair[1].at, color);
        }
        for marker in markers {
            let color = self.face_color(marker.value, 1.0);
            let r = MARKER_RADIUS;
            let x = (marker.at.x - r).round().max(0.0) as u32;
            let y = (marker.at.y - r).round().max(0.0) as u32;
            fb.fill_rect(x, y, (2.0 * r) as u32, (2.0 * r) as u32, color);
        }

        for (band, color) in self.colorbar_bands() {
            let y0 = band.y.round().max(0.0) as u32;
            let y1 = band.bottom().round().max(0.0) as u32;
            fb.fill_rect(
                band.x.round() as u32,
                y0,
                band.width.round() as u32,
                y1.saturating_sub(y0),
                color,
            );
        }
    }

    /// Render to a new white framebuffer of the canvas size.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas size is zero.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.config.width, self.config.height)?;
        fb.clear(Rgba::WHITE);
        self.render(&mut fb);
        Ok(fb)
    }

    /// Encode the raster rendering as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        PngEncoder::to_bytes(&self.to_framebuffer()?)
    }

    /// Vector rendering with text and hover tooltips.
    #[must_use]
    pub fn to_svg(&self) -> SvgEncoder {
        crate::time_scope!("surface", "svg render");
        let mut svg = SvgEncoder::new(self.config.width, self.config.height);

        for pane in self.scene.panes() {
            svg.polygon(&pane.corners, Rgba::PANE, None, 0.0);
            for &(a, b) in &pane.grid {
                svg.line(a, b, Rgba::WHITE, 1.0);
            }
        }

        for face in self.scene.faces() {
            let tooltip = format!("x: {}\ny: {}\nz: {}", face.col, face.row, face.sample);
            svg.face(&face.corners, self.face_color(face.value, face.shade), tooltip);
        }

        let markers = self.scene.markers();
        for pair in markers.windows(2) {
            let color = self.face_color((pair[0].value + pair[1].value) / 2.0, 1.0);
            svg.line(pair[0].at, pair[1].at, color, 2.0);
        }
        for m in markers {
            let tooltip = format!("x: {}\ny: {}\nz: {}", m.col, m.row, m.value);
            svg.circle(m.at, MARKER_RADIUS, self.face_color(m.value, 1.0), Some(tooltip));
        }

        self.annotate_svg(&mut svg);
        svg
    }

    /// Title, axis titles, tick labels and colorbar.
    fn annotate_svg(&self, svg: &mut SvgEncoder) {
        let scene_cfg = &self.config.scene;
        let baseline = |p: Point, size: f32| Point::new(p.x, p.y + size * 0.35);

        let title_at = Point::new(
            self.config.width as f32 * 0.05,
            self.config.margin.t as f32 / 2.0,
        );
        svg.text(baseline(title_at, TITLE_FONT), &self.config.title, TITLE_FONT, Rgba::TEXT, TextAnchor::Start);

        for guide in self.scene.axes() {
            let title = match guide.axis {
                Axis::X => &scene_cfg.xaxis_title,
                Axis::Y => &scene_cfg.yaxis_title,
                Axis::Z => &scene_cfg.zaxis_title,
            };
            for tick in &guide.ticks {
                svg.text(baseline(tick.anchor, TICK_FONT), &tick.label, TICK_FONT, Rgba::TEXT, TextAnchor::Middle);
            }
            svg.text(
                baseline(guide.title_anchor, AXIS_TITLE_FONT),
                title,
                AXIS_TITLE_FONT,
                Rgba::TEXT,
                TextAnchor::Middle,
            );
        }

        for (band, color) in self.colorbar_bands() {
            // Overlap bands slightly so anti-aliasing leaves no seams.
            svg.rect(band.x, band.y, band.width, band.height + 0.5, color);
        }
        let (lo, hi) = self.scene.value_extent();
        let ticks = Ticks::nice(lo, hi, 6);
        for &value in &ticks.values {
            let y = self.colorbar_y(value);
            let at = Point::new(self.colorbar.right() + 6.0, y);
            svg.text(baseline(at, TICK_FONT), &ticks.label(value), TICK_FONT, Rgba::TEXT, TextAnchor::Start);
        }
    }

    /// Colorbar bands from top (high values) to bottom.
    fn colorbar_bands(&self) -> Vec<(Rect, Rgba)> {
        let bar = self.colorbar;
        let band_height = bar.height / COLORBAR_BANDS as f32;

        (0..COLORBAR_BANDS)
            .map(|i| {
                let t = 1.0 - (i as f32 + 0.5) / COLORBAR_BANDS as f32;
                let color = self.colors.at(t);
                let band = Rect::new(bar.x, bar.y + i as f32 * band_height, bar.width, band_height);
                (band, color)
            })
            .collect()
    }

    /// Canvas y of `value` along the colorbar.
    fn colorbar_y(&self, value: f64) -> f32 {
        let t = self.colors.position(value);
        self.colorbar.bottom() - t * self.colorbar.height
    }

    /// Standalone HTML page with the SVG inline and a PNG download link.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_html(&self) -> Result<String> {
        let png = self.to_png()?;
        let (width, height) = self.canvas_size();
        Ok(HtmlExporter::new(&self.config.title, self.to_svg().render(), width, height)
            .autosize(self.config.autosize)
            .png_download(&png)
            .render())
    }
}
