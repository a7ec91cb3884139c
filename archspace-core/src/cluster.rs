//! Per-category bounding spheres over the visible points

use crate::dataset::CategoryDef;
use crate::keys::CategoryKey;
use crate::point::{Point3f, Rgb, Vector3f};
use serde::Serialize;

/// Smallest radius a cluster sphere may have
pub const CLUSTER_MIN_RADIUS: f32 = 2.0;

/// Margin added around the farthest member
pub const CLUSTER_PADDING: f32 = 2.0;

/// Height of the cluster label above the top of the sphere
pub const CLUSTER_LABEL_LIFT: f32 = 1.2;

/// Bounding sphere of one category's visible members
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterGeometry {
    pub category: CategoryKey,
    pub label: String,
    pub color: Rgb,
    pub centroid: Point3f,
    pub radius: f32,
    pub member_count: usize,
}

impl ClusterGeometry {
    /// Where the category label floats, just above the sphere
    pub fn label_anchor(&self) -> Point3f {
        self.centroid + Vector3f::new(0.0, self.radius + CLUSTER_LABEL_LIFT, 0.0)
    }
}

/// Summarize visible points into one sphere per category
///
/// `visible` yields the category and projected position of every visible
/// entity. Output follows the order of `categories`; categories with no
/// visible member are left out.
pub fn summarize_clusters<I>(categories: &[CategoryDef], visible: I) -> Vec<ClusterGeometry>
where
    I: IntoIterator<Item = (CategoryKey, Point3f)>,
{
    let mut groups: Vec<Vec<Point3f>> = vec![Vec::new(); categories.len()];
    for (key, position) in visible {
        if let Some(i) = categories.iter().position(|c| c.key == key) {
            groups[i].push(position);
        }
    }

    categories
        .iter()
        .zip(groups)
        .filter(|(_, members)| !members.is_empty())
        .map(|(category, members)| {
            let sum = members
                .iter()
                .fold(Vector3f::zeros(), |acc, p| acc + p.coords);
            let centroid = Point3f::from(sum / members.len() as f32);
            let farthest = members
                .iter()
                .map(|p| nalgebra::distance(p, &centroid))
                .fold(0.0_f32, f32::max);

            ClusterGeometry {
                category: category.key,
                label: category.label.clone(),
                color: category.color,
                centroid,
                radius: (farthest + CLUSTER_PADDING).max(CLUSTER_MIN_RADIUS),
                member_count: members.len(),
            }
        })
        .collect()
}
