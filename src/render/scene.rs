//! Projected 3D surface scene.
//!
//! The grid is normalized into a unit cube centered on the origin: columns
//! along X, rows along Y, values along Z. Everything the encoders need is
//! resolved here to canvas pixels, so the raster and vector back ends draw
//! the same geometry in the same order.

use crate::data::Grid;
use crate::geometry::{Point, Rect};
use crate::render::camera::Camera;
use crate::scale::{LinearScale, Scale, Ticks};
use glam::{Vec2, Vec3};

/// Half the side of the scene cube.
pub const HALF: f32 = 0.5;

/// Fraction of the viewport the cube may occupy; the rest is room for
/// tick labels and axis titles.
const FIT_PADDING: f32 = 0.78;

/// Target tick count per axis.
const TICK_TARGET: usize = 6;

const AMBIENT: f32 = 0.75;
const DIFFUSE: f32 = 0.3;

/// One grid cell between four neighbouring samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Projected corners, in grid order around the cell.
    pub corners: [Point; 4],
    /// Mean of the four corner values, used for coloring.
    pub value: f64,
    /// Value at the cell's first corner, shown on hover.
    pub sample: f64,
    /// Row of the cell's first corner.
    pub row: usize,
    /// Column of the cell's first corner.
    pub col: usize,
    /// Distance from the eye to the cell centroid.
    pub depth: f32,
    /// Lighting factor to apply to the palette color.
    pub shade: f32,
}

/// A single sample, used when the grid is too thin to have faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Projected position.
    pub at: Point,
    /// Sample value.
    pub value: f64,
    /// Sample row.
    pub row: usize,
    /// Sample column.
    pub col: usize,
}

/// A cube wall facing away from the camera, with its grid lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    /// Projected corners.
    pub corners: [Point; 4],
    /// Grid lines at tick positions.
    pub grid: Vec<(Point, Point)>,
}

/// Which data axis a guide belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Columns (sprites).
    X,
    /// Rows (tweens).
    Y,
    /// Values (time).
    Z,
}

/// A labelled tick on an axis guide.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    /// Data value of the tick.
    pub value: f64,
    /// Formatted label.
    pub label: String,
    /// Where the label is centered.
    pub anchor: Point,
}

/// Tick labels and title position for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGuide {
    /// Axis this guide annotates.
    pub axis: Axis,
    /// Tick labels, ascending by value.
    pub ticks: Vec<TickLabel>,
    /// Where the axis title is centered.
    pub title_anchor: Point,
}

/// Maps NDC to canvas pixels so the cube fills the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fit {
    ndc_center: Vec2,
    scale: f32,
    origin: Point,
}

impl Fit {
    fn to_screen(self, ndc: Vec2) -> Point {
        let d = (ndc - self.ndc_center) * self.scale;
        Point::new(self.origin.x + d.x, self.origin.y - d.y)
    }
}

/// A grid projected through a camera into a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    camera: Camera,
    viewport: Rect,
    fit: Fit,
    faces: Vec<Face>,
    markers: Vec<Marker>,
    panes: Vec<Pane>,
    axes: Vec<AxisGuide>,
    value_extent: (f64, f64),
}

/// Normalizes grid indices and values into cube coordinates.
struct Normalizer {
    x: LinearScale,
    y: LinearScale,
    z: LinearScale,
}

impl Normalizer {
    fn new(grid: &Grid) -> Self {
        let cube = (-f64::from(HALF), f64::from(HALF));
        Self {
            x: LinearScale::new((0.0, (grid.cols() - 1) as f64), cube),
            y: LinearScale::new((0.0, (grid.rows() - 1) as f64), cube),
            z: LinearScale::new(grid.extent(), cube),
        }
    }

    // Values are placed in f64 and only the cube coordinate is narrowed.
    fn x(&self, col: f64) -> f32 {
        self.x.scale(col) as f32
    }

    fn y(&self, row: f64) -> f32 {
        self.y.scale(row) as f32
    }

    fn z(&self, value: f64) -> f32 {
        self.z.scale(value) as f32
    }

    fn point(&self, row: usize, col: usize, value: f64) -> Vec3 {
        Vec3::new(self.x(col as f64), self.y(row as f64), self.z(value))
    }
}

impl Scene {
    /// Project `grid` through `camera` into `viewport`.
    #[must_use]
    pub fn new(grid: &Grid, camera: Camera, viewport: Rect) -> Self {
        crate::time_scope!("scene", format!("project {}x{} grid", grid.rows(), grid.cols()));

        let fit = fit_cube(&camera, viewport);
        let norm = Normalizer::new(grid);
        let project = |p: Vec3| camera.project(p).map(|(ndc, _)| fit.to_screen(ndc));

        let faces = build_faces(grid, &norm, &camera, &project);
        let markers = if faces.is_empty() { build_markers(grid, &norm, &project) } else { Vec::new() };
        let value_extent = grid.extent();
        let ticks = [
            Ticks::integers(0.0, (grid.cols() - 1) as f64, TICK_TARGET),
            Ticks::integers(0.0, (grid.rows() - 1) as f64, TICK_TARGET),
            Ticks::nice(value_extent.0, value_extent.1, TICK_TARGET),
        ];
        let panes = build_panes(&camera, &norm, &ticks, &project);
        let axes = build_axes(&camera, &norm, &ticks, &project);

        crate::debug!("scene", "{} faces, {} markers", faces.len(), markers.len());
        Self { camera, viewport, fit, faces, markers, panes, axes, value_extent }
    }

    /// Camera the scene was projected through.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Viewport the cube was fitted into.
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Faces sorted far to near.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Samples of a grid with a single row or column, in grid order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Back panes: the two far walls, then the floor.
    #[must_use]
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// Guides for X, Y and Z in that order.
    #[must_use]
    pub fn axes(&self) -> &[AxisGuide] {
        &self.axes
    }

    /// Smallest and largest grid value.
    #[must_use]
    pub const fn value_extent(&self) -> (f64, f64) {
        self.value_extent
    }

    /// Project a point in cube coordinates to canvas pixels.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Option<Point> {
        self.camera.project(point).map(|(ndc, _)| self.fit.to_screen(ndc))
    }
}

/// The eight cube corners.
fn cube_corners() -> [Vec3; 8] {
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let pick = |bit: usize| if i & bit == 0 { -HALF } else { HALF };
        *corner = Vec3::new(pick(1), pick(2), pick(4));
    }
    corners
}

fn fit_cube(camera: &Camera, viewport: Rect) -> Fit {
    let projected: Vec<Vec2> =
        cube_corners().iter().filter_map(|&c| camera.project(c).map(|(ndc, _)| ndc)).collect();
    let origin = viewport.center();

    let Some(bounds) = Rect::bounding(projected.iter().map(|v| Point::new(v.x, v.y))) else {
        return Fit { ndc_center: Vec2::ZERO, scale: viewport.width.min(viewport.height) / 2.0, origin };
    };
    let center = bounds.center();
    let sx = viewport.width / bounds.width.max(f32::EPSILON);
    let sy = viewport.height / bounds.height.max(f32::EPSILON);
    let scale = sx.min(sy) * FIT_PADDING * camera.zoom();

    Fit { ndc_center: Vec2::new(center.x, center.y), scale, origin }
}

fn build_faces(
    grid: &Grid,
    norm: &Normalizer,
    camera: &Camera,
    project: &impl Fn(Vec3) -> Option<Point>,
) -> Vec<Face> {
    if grid.rows() < 2 || grid.cols() < 2 {
        return Vec::new();
    }

    let light = camera.eye().normalize_or_zero();
    let mut faces = Vec::with_capacity((grid.rows() - 1) * (grid.cols() - 1));

    for row in 0..grid.rows() - 1 {
        for col in 0..grid.cols() - 1 {
            let cell = [(row, col), (row, col + 1), (row + 1, col + 1), (row + 1, col)];
            let mut world = [Vec3::ZERO; 4];
            let mut values = [0.0; 4];
            for (i, &(r, c)) in cell.iter().enumerate() {
                values[i] = grid.get(r, c).unwrap_or_default();
                world[i] = norm.point(r, c, values[i]);
            }

            let Some(corners) = project_all(&world, project) else {
                continue;
            };

            let centroid = world.iter().copied().sum::<Vec3>() / 4.0;
            let normal = (world[2] - world[0]).cross(world[3] - world[1]).normalize_or_zero();
            let shade = AMBIENT + DIFFUSE * normal.dot(light).abs();

            faces.push(Face {
                corners,
                value: values.iter().sum::<f64>() / 4.0,
                sample: values[0],
                row,
                col,
                depth: camera.depth(centroid),
                shade,
            });
        }
    }

    // Painter's order; the stable sort keeps grid order for equal depths.
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    faces
}

fn build_markers(
    grid: &Grid,
    norm: &Normalizer,
    project: &impl Fn(Vec3) -> Option<Point>,
) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(grid.len());
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let value = grid.get(row, col).unwrap_or_default();
            if let Some(at) = project(norm.point(row, col, value)) {
                markers.push(Marker { at, value, row, col });
            }
        }
    }
    markers
}

fn project_all<const N: usize>(
    world: &[Vec3; N],
    project: &impl Fn(Vec3) -> Option<Point>,
) -> Option<[Point; N]> {
    let mut out = [Point::default(); N];
    for (slot, &w) in out.iter_mut().zip(world) {
        *slot = project(w)?;
    }
    Some(out)
}

/// `-HALF` or `HALF`, whichever side of the cube faces away from the eye.
fn far_side(eye: f32) -> f32 {
    if eye >= 0.0 {
        -HALF
    } else {
        HALF
    }
}

fn build_panes(
    camera: &Camera,
    norm: &Normalizer,
    ticks: &[Ticks; 3],
    project: &impl Fn(Vec3) -> Option<Point>,
) -> Vec<Pane> {
    let eye = camera.eye();
    let (wx, wy, wz) = (far_side(eye.x), far_side(eye.y), far_side(eye.z));
    let h = HALF;

    let xs: Vec<f32> = ticks[0].values.iter().map(|&v| norm.x(v)).collect();
    let ys: Vec<f32> = ticks[1].values.iter().map(|&v| norm.y(v)).collect();
    let zs: Vec<f32> = ticks[2].values.iter().map(|&v| norm.z(v)).collect();

    let mut panes = Vec::with_capacity(3);

    // Wall at x = wx, spanning y and z.
    let corners = [
        Vec3::new(wx, -h, -h),
        Vec3::new(wx, h, -h),
        Vec3::new(wx, h, h),
        Vec3::new(wx, -h, h),
    ];
    let lines = ys
        .iter()
        .map(|&y| (Vec3::new(wx, y, -h), Vec3::new(wx, y, h)))
        .chain(zs.iter().map(|&z| (Vec3::new(wx, -h, z), Vec3::new(wx, h, z))));
    panes.extend(make_pane(&corners, lines, project));

    // Wall at y = wy, spanning x and z.
    let corners = [
        Vec3::new(-h, wy, -h),
        Vec3::new(h, wy, -h),
        Vec3::new(h, wy, h),
        Vec3::new(-h, wy, h),
    ];
    let lines = xs
        .iter()
        .map(|&x| (Vec3::new(x, wy, -h), Vec3::new(x, wy, h)))
        .chain(zs.iter().map(|&z| (Vec3::new(-h, wy, z), Vec3::new(h, wy, z))));
    panes.extend(make_pane(&corners, lines, project));

    // Floor (or ceiling when looking from below) at z = wz.
    let corners = [
        Vec3::new(-h, -h, wz),
        Vec3::new(h, -h, wz),
        Vec3::new(h, h, wz),
        Vec3::new(-h, h, wz),
    ];
    let lines = xs
        .iter()
        .map(|&x| (Vec3::new(x, -h, wz), Vec3::new(x, h, wz)))
        .chain(ys.iter().map(|&y| (Vec3::new(-h, y, wz), Vec3::new(h, y, wz))));
    panes.extend(make_pane(&corners, lines, project));

    panes
}

fn make_pane(
    corners: &[Vec3; 4],
    lines: impl Iterator<Item = (Vec3, Vec3)>,
    project: &impl Fn(Vec3) -> Option<Point>,
) -> Option<Pane> {
    let corners = project_all(corners, project)?;
    let grid = lines.filter_map(|(a, b)| Some((project(a)?, project(b)?))).collect();
    Some(Pane { corners, grid })
}

fn build_axes(
    camera: &Camera,
    norm: &Normalizer,
    ticks: &[Ticks; 3],
    project: &impl Fn(Vec3) -> Option<Point>,
) -> Vec<AxisGuide> {
    let eye = camera.eye();
    // Near side in x and y, floor in z.
    let nx = -far_side(eye.x);
    let ny = -far_side(eye.y);
    let fz = far_side(eye.z);

    let mut axes = Vec::with_capacity(3);

    // X labels run along the near floor edge parallel to X.
    let out = Vec3::new(0.0, ny.signum(), 0.0);
    let at = |x: f32, gap: f32| Vec3::new(x, ny, fz) + out * gap;
    axes.push(guide(Axis::X, &ticks[0], |v| norm.x(v), at, project));

    // Y labels run along the near floor edge parallel to Y.
    let out = Vec3::new(nx.signum(), 0.0, 0.0);
    let at = |y: f32, gap: f32| Vec3::new(nx, y, fz) + out * gap;
    axes.push(guide(Axis::Y, &ticks[1], |v| norm.y(v), at, project));

    // Z labels sit on whichever side vertical edge is leftmost on screen.
    let candidates = [Vec3::new(nx, -ny, 0.0), Vec3::new(-nx, ny, 0.0)];
    let edge = candidates
        .iter()
        .copied()
        .min_by(|a, b| {
            let ax = project(*a).map_or(f32::INFINITY, |p| p.x);
            let bx = project(*b).map_or(f32::INFINITY, |p| p.x);
            ax.total_cmp(&bx)
        })
        .unwrap_or(candidates[0]);
    let out = Vec3::new(edge.x, edge.y, 0.0).normalize_or_zero();
    let at = |z: f32, gap: f32| Vec3::new(edge.x, edge.y, z) + out * gap;
    axes.push(guide(Axis::Z, &ticks[2], |v| norm.z(v), at, project));

    axes
}

fn guide(
    axis: Axis,
    ticks: &Ticks,
    to_cube: impl Fn(f64) -> f32,
    at: impl Fn(f32, f32) -> Vec3,
    project: &impl Fn(Vec3) -> Option<Point>,
) -> AxisGuide {
    let label_gap = 0.12;
    let title_gap = 0.32;
    let ticks_out = ticks
        .values
        .iter()
        .filter_map(|&value| {
            let anchor = project(at(to_cube(value), label_gap))?;
            Some(TickLabel { value, label: ticks.label(value), anchor })
        })
        .collect();
    let title_anchor = project(at(0.0, title_gap)).unwrap_or_default();

    AxisGuide { axis, ticks: ticks_out, title_anchor }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(65.0, 90.0, 785.0, 845.0)
    }

    fn ramp(rows: usize, cols: usize) -> Grid {
        let data: Vec<Vec<f64>> =
            (0..rows).map(|r| (0..cols).map(|c| (r * cols + c) as f64 * 0.01).collect()).collect();
        Grid::from_rows(&data).unwrap()
    }

    #[test]
    fn test_face_count() {
        let scene = Scene::new(&ramp(4, 5), Camera::default(), viewport());
        assert_eq!(scene.faces().len(), 12);
        assert!(scene.markers().is_empty());
    }

    #[test]
    fn test_faces_sorted_far_to_near() {
        let scene = Scene::new(&ramp(6, 6), Camera::default(), viewport());
        for pair in scene.faces().windows(2) {
            assert!(pair[0].depth >= pair[1].depth);
        }
    }

    #[test]
    fn test_cube_fits_viewport() {
        let area = viewport();
        let scene = Scene::new(&ramp(3, 3), Camera::default(), area);
        for corner in cube_corners() {
            let p = scene.project(corner).unwrap();
            assert!(area.contains(p), "{p:?} outside {area:?}");
        }
        for face in scene.faces() {
            assert!(face.corners.iter().all(|&p| area.contains(p)));
        }
    }

    #[test]
    fn test_zoom_enlarges_projection() {
        let grid = ramp(3, 3);
        let base = Scene::new(&grid, Camera::default(), viewport());
        let mut camera = Camera::default();
        camera.zoom_by(2.0);
        let zoomed = Scene::new(&grid, camera, viewport());

        let span = |s: &Scene| {
            let a = s.project(Vec3::splat(-HALF)).unwrap();
            let b = s.project(Vec3::splat(HALF)).unwrap();
            a.distance(b)
        };
        assert!(span(&zoomed) > span(&base) * 1.9);
    }

    #[test]
    fn test_deterministic() {
        let grid = ramp(5, 7);
        let a = Scene::new(&grid, Camera::default(), viewport());
        let b = Scene::new(&grid, Camera::default(), viewport());
        assert_eq!(a, b);
    }

    #[test]
    fn test_thin_grid_uses_markers() {
        let grid = Grid::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        let scene = Scene::new(&grid, Camera::default(), viewport());
        assert!(scene.faces().is_empty());
        assert_eq!(scene.markers().len(), 3);

        let single = Grid::from_rows(&[vec![4.2]]).unwrap();
        let scene = Scene::new(&single, Camera::default(), viewport());
        assert_eq!(scene.markers().len(), 1);
        assert_eq!(scene.value_extent(), (4.2, 4.2));
    }

    #[test]
    fn test_panes_and_axes() {
        let scene = Scene::new(&ramp(4, 11), Camera::default(), viewport());
        assert_eq!(scene.panes().len(), 3);
        assert!(scene.panes().iter().all(|p| !p.grid.is_empty()));

        let axes = scene.axes();
        assert_eq!(axes.len(), 3);
        assert_eq!(axes[0].axis, Axis::X);
        assert_eq!(axes[0].ticks.first().map(|t| t.label.as_str()), Some("0"));
        assert_eq!(axes[0].ticks.last().map(|t| t.label.as_str()), Some("10"));
        assert_eq!(axes[1].ticks.len(), 4);
        assert_eq!(axes[2].axis, Axis::Z);
    }

    #[test]
    fn test_tiny_values_keep_their_shape() {
        let grid = ramp(4, 5);
        let scaled: Vec<Vec<f64>> =
            grid.to_rows().iter().map(|row| row.iter().map(|v| v * 1e-8).collect()).collect();
        let scaled = Grid::from_rows(&scaled).unwrap();

        let by_cell = |scene: &Scene| {
            let mut faces = scene.faces().to_vec();
            faces.sort_by_key(|f| (f.row, f.col));
            faces
        };
        let base = by_cell(&Scene::new(&grid, Camera::default(), viewport()));
        let tiny = by_cell(&Scene::new(&scaled, Camera::default(), viewport()));

        assert_eq!(base.len(), tiny.len());
        for (a, b) in base.iter().zip(&tiny) {
            for (p, q) in a.corners.iter().zip(&b.corners) {
                assert!(p.distance(*q) < 1e-3, "{p:?} vs {q:?}");
            }
            assert!((a.shade - b.shade).abs() < 1e-5);
        }
    }

    #[test]
    fn test_shade_in_range() {
        let scene = Scene::new(&ramp(5, 5), Camera::default(), viewport());
        for face in scene.faces() {
            assert!(face.shade >= AMBIENT && face.shade <= AMBIENT + DIFFUSE + 1e-5);
        }
    }
}
