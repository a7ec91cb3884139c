//! View configuration loaded from JSON

use crate::error::{Error, Result};
use crate::point::{Point3f, Vector3f};
use crate::projector::{TickLabelMode, DEFAULT_SCALE};
use crate::selection::LabelPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound of the cube face opacity
pub const MAX_FACE_OPACITY: f32 = 0.35;

/// Upper bound of the inner grid opacity
pub const MAX_INNER_GRID_OPACITY: f32 = 0.25;

/// Smallest sine of the angle between the view direction and the up axis
const MIN_VIEW_UP_SINE: f32 = 1e-3;

/// Presentation settings of a view session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Half-extent of the cube in world units
    pub scale: f32,

    pub label_policy: LabelPolicy,

    pub tick_label_mode: TickLabelMode,

    /// Push cluster spheres to the renderer
    pub show_clusters: bool,

    pub cube: CubeAppearance,

    pub camera: CameraSettings,
}

/// Faces and inner grid of the cube
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeAppearance {
    pub show_faces: bool,
    pub face_opacity: f32,
    pub show_inner_grid: bool,
    pub inner_grid_opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            label_policy: LabelPolicy::default(),
            tick_label_mode: TickLabelMode::default(),
            show_clusters: false,
            cube: CubeAppearance::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Default for CubeAppearance {
    fn default() -> Self {
        Self {
            show_faces: true,
            face_opacity: 0.14,
            show_inner_grid: true,
            inner_grid_opacity: 0.06,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [42.0, 30.0, 42.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 55.0,
            near: 0.1,
            far: 2000.0,
            auto_rotate: true,
            auto_rotate_speed: 0.7,
        }
    }
}

impl CubeAppearance {
    /// Opacities pulled into their allowed ranges; NaN becomes 0
    pub fn clamped(self) -> Self {
        let clamp = |v: f32, max: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        Self {
            face_opacity: clamp(self.face_opacity, MAX_FACE_OPACITY),
            inner_grid_opacity: clamp(self.inner_grid_opacity, MAX_INNER_GRID_OPACITY),
            ..self
        }
    }
}

impl CameraSettings {
    pub fn position(&self) -> Point3f {
        Point3f::from(self.position)
    }

    pub fn target(&self) -> Point3f {
        Point3f::from(self.target)
    }
}

impl ViewConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Load config from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save config to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check hard constraints and clamp soft ones
    pub fn validated(mut self) -> Result<Self> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::Config(format!(
                "scale must be a positive finite number, got {}",
                self.scale
            )));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(Error::Config(format!(
                "camera fov must lie in (0, 180) degrees, got {}",
                camera.fov_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(Error::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }

        let view = camera.target() - camera.position();
        let length = view.norm();
        if !length.is_finite() || length <= f32::EPSILON {
            return Err(Error::Config(format!(
                "camera position {:?} must differ from its target {:?}",
                camera.position, camera.target
            )));
        }
        if (view / length).cross(&Vector3f::y()).norm() < MIN_VIEW_UP_SINE {
            return Err(Error::Config(format!(
                "camera at {:?} looks straight along the up axis towards {:?}",
                camera.position, camera.target
            )));
        }

        self.cube = self.cube.clamped();
        Ok(self)
    }
}
