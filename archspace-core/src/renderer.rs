//! The boundary between the view state and whatever draws it

use crate::cluster::ClusterGeometry;
use crate::config::CubeAppearance;
use crate::keys::{CategoryKey, EntityId};
use crate::point::Rgb;
use crate::projector::{AxisTitles, PointTransform, TickMark};
use serde::{Deserialize, Serialize};

/// Pointer position in viewport pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerCoords {
    pub x: f32,
    pub y: f32,
}

impl PointerCoords {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Scene graph driven by a [`crate::ViewSession`]
///
/// Objects are addressed by entity id or category key only; the renderer owns
/// whatever nodes back them.
pub trait Renderer {
    /// Place, scale and show or hide one point
    fn set_point_transform(&mut self, id: &EntityId, transform: &PointTransform);

    /// Hover emphasis on or off
    fn set_point_emphasis(&mut self, id: &EntityId, emphasized: bool);

    fn set_label_visible(&mut self, id: &EntityId, visible: bool);

    fn set_label_text(&mut self, id: &EntityId, text: &str);

    /// Category color of a point. Renderers that color points some other way
    /// may ignore it.
    fn set_point_color(&mut self, _id: &EntityId, _color: Rgb) {}

    /// Show a category's cluster sphere, or hide it with `None`
    fn set_cluster_geometry(&mut self, category: CategoryKey, geometry: Option<&ClusterGeometry>);

    /// Nearest visible point under the pointer
    fn pick(&self, pointer: PointerCoords) -> Option<EntityId>;

    fn set_cube_appearance(&mut self, appearance: &CubeAppearance);

    fn set_axis_titles(&mut self, titles: &AxisTitles);

    fn set_tick_labels(&mut self, ticks: &[TickMark]);
}

/// Renderer that draws nothing and never hits anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn set_point_transform(&mut self, _id: &EntityId, _transform: &PointTransform) {}

    fn set_point_emphasis(&mut self, _id: &EntityId, _emphasized: bool) {}

    fn set_label_visible(&mut self, _id: &EntityId, _visible: bool) {}

    fn set_label_text(&mut self, _id: &EntityId, _text: &str) {}

    fn set_cluster_geometry(&mut self, _category: CategoryKey, _geometry: Option<&ClusterGeometry>) {}

    fn pick(&self, _pointer: PointerCoords) -> Option<EntityId> {
        None
    }

    fn set_cube_appearance(&mut self, _appearance: &CubeAppearance) {}

    fn set_axis_titles(&mut self, _titles: &AxisTitles) {}

    fn set_tick_labels(&mut self, _ticks: &[TickMark]) {}
}
