//! Immutable snapshots of the projected scene and their publication slot

use crate::cluster::ClusterGeometry;
use crate::config::CubeAppearance;
use crate::keys::{CategoryKey, EntityId};
use crate::point::Rgb;
use crate::projector::{AxisTitles, PointTransform, TickMark};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

/// One entity as the renderer should show it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub id: EntityId,
    pub name: String,
    pub category: CategoryKey,
    pub color: Rgb,
    pub transform: PointTransform,
    pub label_visible: bool,
    pub emphasized: bool,
}

/// Result of one full projector pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    /// Increases by one with every published frame
    pub generation: u64,
    pub scale: f32,
    /// Every entity, in catalogue order
    pub points: Vec<ProjectedPoint>,
    /// Derived clusters; only pushed to the renderer when `show_clusters` is set
    pub clusters: Vec<ClusterGeometry>,
    pub show_clusters: bool,
    pub ticks: Vec<TickMark>,
    pub axis_titles: AxisTitles,
    pub cube: CubeAppearance,
    pub selected: Option<EntityId>,
    pub hovered: Option<EntityId>,
}

impl SceneFrame {
    pub fn point(&self, id: &str) -> Option<&ProjectedPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn visible_points(&self) -> impl Iterator<Item = &ProjectedPoint> {
        self.points.iter().filter(|p| p.transform.visible)
    }

    pub fn cluster(&self, category: CategoryKey) -> Option<&ClusterGeometry> {
        self.clusters.iter().find(|c| c.category == category)
    }
}

/// Latest published frame, shared between the session and its readers
///
/// Publishing swaps the whole frame, so a reader sees either the previous
/// frame or the new one.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    inner: Arc<RwLock<Arc<SceneFrame>>>,
}

impl FrameSlot {
    pub fn new(frame: Arc<SceneFrame>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(frame)),
        }
    }

    pub fn publish(&self, frame: Arc<SceneFrame>) {
        // The slot only ever holds a complete frame, so a poisoned lock is still usable
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = frame;
    }

    pub fn latest(&self) -> Arc<SceneFrame> {
        let slot = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*slot)
    }
}
