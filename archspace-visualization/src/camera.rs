//! Perspective camera orbiting the cube

use crate::picking::Ray;
use archspace_core::{CameraSettings, Point3f, Vector3f};
use nalgebra::{Matrix4, Perspective3, Point3, Unit, UnitQuaternion, Vector3};

/// Closest the camera may get to its target
const MIN_DISTANCE: f32 = 1.0;

/// Largest angle between the view direction and the up axis, in radians
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;
const MIN_POLAR: f32 = 0.01;

/// A perspective camera looking at a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    home_position: Point3<f32>,
    home_target: Point3<f32>,
}

impl Camera {
    /// Create a new camera; `reset` returns it to this position and target
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
            home_position: position,
            home_target: target,
        }
    }

    pub fn from_settings(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        Self::new(
            settings.position(),
            settings.target(),
            Vector3::y(),
            settings.fov_degrees.to_radians(),
            aspect_ratio,
            settings.near,
            settings.far,
        )
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    pub fn set_aspect(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Rotate the camera around the target
    ///
    /// `horizontal` turns about the up axis, `vertical` tilts towards or away
    /// from it. The tilt stops just short of the poles.
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        let up = Unit::new_normalize(self.up);
        let mut offset = self.position - self.target;

        offset = UnitQuaternion::from_axis_angle(&up, horizontal) * offset;

        let polar = up.angle(&offset);
        let tilt = (polar + vertical).clamp(MIN_POLAR, MAX_POLAR) - polar;
        if tilt != 0.0 {
            if let Some(right) = Unit::try_new(up.cross(&offset), f32::EPSILON) {
                offset = UnitQuaternion::from_axis_angle(&right, tilt) * offset;
            }
        }

        self.position = self.target + offset;
    }

    /// Continuous turn about the up axis at `speed`, where speed 1.0 is one
    /// revolution per minute
    pub fn auto_rotate(&mut self, speed: f32, dt: f32) {
        let angle = std::f32::consts::TAU / 60.0 * speed * dt;
        self.orbit(-angle, 0.0);
    }

    /// Move towards (positive) or away from the target
    ///
    /// A camera sitting on its target has no direction to move along and
    /// stays put.
    pub fn zoom(&mut self, amount: f32) {
        let Some((direction, length)) =
            Unit::try_new_and_get(self.position - self.target, f32::EPSILON)
        else {
            return;
        };
        let distance = (length - amount).max(MIN_DISTANCE);
        self.position = self.target + direction.into_inner() * distance;
    }

    /// Back to the position and target the camera was created with
    pub fn reset(&mut self) {
        self.position = self.home_position;
        self.target = self.home_target;
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates
    pub fn ray_from_ndc(&self, x: f32, y: f32) -> Option<Ray> {
        let forward = Unit::try_new(self.target - self.position, f32::EPSILON)?;
        let right = Unit::try_new(forward.cross(&self.up), f32::EPSILON)?;
        let up = right.cross(&forward);

        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect_ratio;
        let direction = forward.into_inner() + right.into_inner() * (x * half_width) + up * (y * half_height);
        Ray::new(self.position, direction)
    }

    /// Normalized device coordinates of a world point; `None` behind the camera
    pub fn project_to_ndc(&self, point: &Point3f) -> Option<Point3f> {
        let clip = self.view_projection() * point.to_homogeneous();
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(Point3f::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vector3f {
        (self.target - self.position).normalize()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default(), 16.0 / 9.0)
    }
}
