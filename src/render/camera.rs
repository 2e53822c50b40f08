//! Orbiting perspective camera for the 3D scene.
//!
//! The world is Z-up. The scene cube is centered on the origin, so the
//! camera always looks at the origin and the eye position is all the state
//! a view needs. Zoom is applied in screen space by the scene fit rather
//! than by dollying, so it never changes the painter's order.

use glam::{Mat4, Vec2, Vec3};

const NEAR: f32 = 0.01;
const FAR: f32 = 100.0;
const MIN_ZOOM: f32 = 0.25;
const MAX_ZOOM: f32 = 8.0;
/// Elevation limit in degrees; keeps the view away from the poles.
const MAX_ELEVATION_DEG: f32 = 85.0;

/// Perspective camera orbiting the scene center.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    eye: Vec3,
    home: Vec3,
    target: Vec3,
    fov_y: f32,
    zoom: f32,
}

impl Camera {
    /// Camera at `eye`, looking at the origin with a 30 degree field of view.
    #[must_use]
    pub fn new(eye: [f32; 3]) -> Self {
        let eye = Vec3::from(eye);
        Self { eye, home: eye, target: Vec3::ZERO, fov_y: 30.0_f32.to_radians(), zoom: 1.0 }
    }

    /// Current eye position.
    #[must_use]
    pub const fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Screen-space zoom factor, 1.0 at rest.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// World up for the view matrix. Falls back to +Y when looking straight
    /// along Z.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        let dir = (self.target - self.eye).normalize_or_zero();
        if dir.cross(Vec3::Z).length_squared() < 1e-6 {
            Vec3::Y
        } else {
            Vec3::Z
        }
    }

    /// World-to-view transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up())
    }

    /// View-to-clip transform for a square viewport.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, 1.0, NEAR, FAR)
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// Returns the NDC position (y up) and the distance from the eye, or
    /// `None` when the point is behind the camera.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Option<(Vec2, f32)> {
        let clip = self.projection_matrix() * self.view_matrix() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        Some((ndc, self.depth(point)))
    }

    /// Distance from the eye to a world point.
    #[must_use]
    pub fn depth(&self, point: Vec3) -> f32 {
        (point - self.eye).length()
    }

    /// Distance from the eye to the scene center.
    #[must_use]
    pub fn distance(&self) -> f32 {
        (self.eye - self.target).length()
    }

    /// Angle of the eye around the Z axis, in radians.
    #[must_use]
    pub fn azimuth(&self) -> f32 {
        let offset = self.eye - self.target;
        offset.y.atan2(offset.x)
    }

    /// Angle of the eye above the XY plane, in radians.
    #[must_use]
    pub fn elevation(&self) -> f32 {
        let offset = self.eye - self.target;
        let r = offset.length();
        if r <= f32::EPSILON {
            return 0.0;
        }
        (offset.z / r).clamp(-1.0, 1.0).asin()
    }

    /// Rotate the eye around the scene center.
    ///
    /// Elevation is clamped to +/-85 degrees; distance is preserved.
    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) {
        let r = self.distance();
        if r <= f32::EPSILON {
            return;
        }
        let limit = MAX_ELEVATION_DEG.to_radians();
        let azimuth = self.azimuth() + d_azimuth;
        let elevation = (self.elevation() + d_elevation).clamp(-limit, limit);

        let (sin_el, cos_el) = elevation.sin_cos();
        let (sin_az, cos_az) = azimuth.sin_cos();
        self.eye = self.target + Vec3::new(r * cos_el * cos_az, r * cos_el * sin_az, r * sin_el);
        crate::trace!("camera", "orbit az={:.3} el={:.3}", azimuth, elevation);
    }

    /// Multiply the zoom factor, clamped to `[0.25, 8]`.
    pub fn zoom_by(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Return to the initial eye and zoom.
    pub fn reset(&mut self) {
        self.eye = self.home;
        self.zoom = 1.0;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new([1.25, 1.25, 1.25])
    }
}
