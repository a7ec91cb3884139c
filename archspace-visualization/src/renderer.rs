//! Headless scene table implementing the core renderer contract
//!
//! Nodes are kept in an arena keyed by entity id. Nothing is drawn; the table
//! holds exactly what a drawing backend would need and answers picks by ray
//! casting through its camera.

use crate::camera::Camera;
use crate::picking::{pick_nearest, Viewport};
use archspace_core::{
    AxisTitles, CameraSettings, CategoryKey, ClusterGeometry, CubeAppearance, EntityId, Point3f,
    PointTransform, PointerCoords, Renderer, Rgb, TickMark,
};
use std::collections::HashMap;
use tracing::debug;

/// Scale multiplier of a hovered point
pub const HOVER_SCALE: f32 = 1.25;

/// One point with its label
#[derive(Debug, Clone, PartialEq)]
pub struct PointNode {
    pub position: Point3f,
    pub base_scale: f32,
    pub visible: bool,
    pub emphasized: bool,
    pub color: Rgb,
    pub label_text: String,
    pub label_visible: bool,
}

impl PointNode {
    /// Drawn scale, including hover emphasis
    pub fn scale(&self) -> f32 {
        if self.emphasized {
            self.base_scale * HOVER_SCALE
        } else {
            self.base_scale
        }
    }
}

impl Default for PointNode {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            base_scale: 1.0,
            visible: false,
            emphasized: false,
            color: Rgb([0xff, 0xff, 0xff]),
            label_text: String::new(),
            label_visible: false,
        }
    }
}

/// Everything a drawing backend needs for one view
#[derive(Debug, Clone)]
pub struct SceneTable {
    points: HashMap<EntityId, PointNode>,
    clusters: HashMap<CategoryKey, ClusterGeometry>,
    cube: CubeAppearance,
    axis_titles: Option<AxisTitles>,
    ticks: Vec<TickMark>,
    camera: Camera,
    viewport: Viewport,
}

impl SceneTable {
    pub fn new(settings: &CameraSettings, viewport: Viewport) -> Self {
        Self {
            points: HashMap::new(),
            clusters: HashMap::new(),
            cube: CubeAppearance::default(),
            axis_titles: None,
            ticks: Vec::new(),
            camera: Camera::from_settings(settings, viewport.aspect()),
            viewport,
        }
    }

    pub fn point(&self, id: &str) -> Option<&PointNode> {
        self.points.get(id)
    }

    pub fn points(&self) -> impl Iterator<Item = (&EntityId, &PointNode)> {
        self.points.iter()
    }

    pub fn cluster(&self, category: CategoryKey) -> Option<&ClusterGeometry> {
        self.clusters.get(&category)
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn cube(&self) -> &CubeAppearance {
        &self.cube
    }

    pub fn axis_titles(&self) -> Option<&AxisTitles> {
        self.axis_titles.as_ref()
    }

    pub fn ticks(&self) -> &[TickMark] {
        &self.ticks
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the viewport; zero extents become one pixel
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(self.viewport.aspect());
        debug!(
            width = self.viewport.width(),
            height = self.viewport.height(),
            "viewport resized"
        );
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    /// Pixel position of a world point; `None` if it is behind the camera
    pub fn screen_position(&self, point: &Point3f) -> Option<PointerCoords> {
        let ndc = self.camera.project_to_ndc(point)?;
        Some(self.viewport.to_pixels(ndc.x, ndc.y))
    }

    fn node(&mut self, id: &EntityId) -> &mut PointNode {
        self.points.entry(id.clone()).or_default()
    }
}

impl Default for SceneTable {
    fn default() -> Self {
        Self::new(&CameraSettings::default(), Viewport::default())
    }
}

impl Renderer for SceneTable {
    fn set_point_transform(&mut self, id: &EntityId, transform: &PointTransform) {
        let node = self.node(id);
        node.position = transform.position;
        node.base_scale = transform.size_factor;
        node.visible = transform.visible;
    }

    fn set_point_emphasis(&mut self, id: &EntityId, emphasized: bool) {
        self.node(id).emphasized = emphasized;
    }

    fn set_label_visible(&mut self, id: &EntityId, visible: bool) {
        self.node(id).label_visible = visible;
    }

    fn set_label_text(&mut self, id: &EntityId, text: &str) {
        self.node(id).label_text = text.to_string();
    }

    fn set_point_color(&mut self, id: &EntityId, color: Rgb) {
        self.node(id).color = color;
    }

    fn set_cluster_geometry(&mut self, category: CategoryKey, geometry: Option<&ClusterGeometry>) {
        match geometry {
            Some(geometry) => {
                self.clusters.insert(category, geometry.clone());
            }
            None => {
                self.clusters.remove(&category);
            }
        }
    }

    fn pick(&self, pointer: PointerCoords) -> Option<EntityId> {
        let (x, y) = self.viewport.to_ndc(pointer);
        let ray = self.camera.ray_from_ndc(x, y)?;
        let candidates = self
            .points
            .iter()
            .filter(|(_, node)| node.visible)
            .map(|(id, node)| (id, node.position, node.scale()));
        pick_nearest(&ray, candidates).cloned()
    }

    fn set_cube_appearance(&mut self, appearance: &CubeAppearance) {
        self.cube = *appearance;
    }

    fn set_axis_titles(&mut self, titles: &AxisTitles) {
        self.axis_titles = Some(titles.clone());
    }

    fn set_tick_labels(&mut self, ticks: &[TickMark]) {
        self.ticks = ticks.to_vec();
    }
}
