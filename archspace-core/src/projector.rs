//! Projection of catalogue entities into the cube
//!
//! Attribute values in [0, 100] map linearly onto [-scale, +scale] with 50 at
//! the origin. The size attribute maps onto a point scale factor through a
//! slightly convex curve so high values stand out.

use crate::dataset::{Catalogue, Entity, VALUE_MAX, VALUE_MIN};
use crate::filter::FilterState;
use crate::keys::{AttributeKey, ParseKeyError};
use crate::mapping::MappingState;
use crate::point::Point3f;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Scale factor of a point whose size attribute is 0
pub const SIZE_BASE: f32 = 0.45;

/// Scale added between size attribute 0 and 100
pub const SIZE_SPREAD: f32 = 1.80;

/// Exponent of the size curve
pub const SIZE_EXPONENT: f32 = 1.15;

/// Distance between tick marks, in attribute units
pub const TICK_STEP: u32 = 10;

/// Distance of an axis title beyond the cube face
pub const AXIS_TITLE_OFFSET: f32 = 2.0;

/// Default half-extent of the cube in world units
pub const DEFAULT_SCALE: f32 = 22.0;

/// Placement of one point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointTransform {
    pub position: Point3f,
    pub size_factor: f32,
    pub visible: bool,
}

/// Which tick values get a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickLabelMode {
    None,
    /// Only 0, 50 and 100
    #[default]
    Endpoints,
    All,
}

impl TickLabelMode {
    pub fn shows(self, value: u32) -> bool {
        match self {
            TickLabelMode::None => false,
            TickLabelMode::Endpoints => matches!(value, 0 | 50 | 100),
            TickLabelMode::All => true,
        }
    }
}

impl FromStr for TickLabelMode {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TickLabelMode::None),
            "endpoints" => Ok(TickLabelMode::Endpoints),
            "all" => Ok(TickLabelMode::All),
            other => Err(ParseKeyError {
                kind: "tick label mode",
                value: other.to_string(),
            }),
        }
    }
}

/// One tick mark, shared by the three axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickMark {
    pub value: u32,
    pub coord: f32,
    pub label_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
    pub anchor: Point3f,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitles {
    pub x: AxisTitle,
    pub y: AxisTitle,
    pub z: AxisTitle,
}

/// Scale factor for a size-attribute value
pub fn size_factor(value: f32) -> f32 {
    let t = value.clamp(VALUE_MIN, VALUE_MAX) / VALUE_MAX;
    SIZE_BASE + t.powf(SIZE_EXPONENT) * SIZE_SPREAD
}

/// Maps attribute values into a cube of half-extent `scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    scale: f32,
}

impl Projector {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Linear map of [0, 100] onto [-scale, +scale]
    pub fn value_to_coord(&self, value: f32) -> f32 {
        let v = value.clamp(VALUE_MIN, VALUE_MAX);
        ((v - 50.0) / 50.0) * self.scale
    }

    pub fn project(&self, entity: &Entity, mapping: &MappingState, filter: &FilterState) -> PointTransform {
        PointTransform {
            position: Point3f::new(
                self.value_to_coord(entity.value(mapping.axis_x())),
                self.value_to_coord(entity.value(mapping.axis_y())),
                self.value_to_coord(entity.value(mapping.axis_z())),
            ),
            size_factor: size_factor(entity.value(mapping.size_attribute())),
            visible: filter.is_visible(entity),
        }
    }

    /// Tick marks at 0, 10, ..., 100
    pub fn ticks(&self, mode: TickLabelMode) -> Vec<TickMark> {
        (0..=VALUE_MAX as u32)
            .step_by(TICK_STEP as usize)
            .map(|value| TickMark {
                value,
                coord: self.value_to_coord(value as f32),
                label_visible: mode.shows(value),
            })
            .collect()
    }

    /// Titles naming the attribute on each axis, just outside the cube
    pub fn axis_titles(&self, mapping: &MappingState, catalogue: &Catalogue) -> AxisTitles {
        let reach = self.scale + AXIS_TITLE_OFFSET;
        let title = |prefix: &str, key: AttributeKey, anchor: Point3f| AxisTitle {
            text: format!("{}: {}", prefix, catalogue.attribute_label(key)),
            anchor,
        };

        AxisTitles {
            x: title("X", mapping.axis_x(), Point3f::new(reach, 0.0, 0.0)),
            y: title("Y", mapping.axis_y(), Point3f::new(0.0, reach, 0.0)),
            z: title("Z", mapping.axis_z(), Point3f::new(0.0, 0.0, reach)),
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::CategoryKey;
    use crate::mapping::{Axis, MappingEngine};
    use approx::assert_relative_eq;

    #[test]
    fn test_coordinate_boundaries() {
        for scale in [1.0, 22.0, 37.5] {
            let projector = Projector::new(scale);
            assert_eq!(projector.value_to_coord(0.0), -scale);
            assert_eq!(projector.value_to_coord(50.0), 0.0);
            assert_eq!(projector.value_to_coord(100.0), scale);
        }
    }

    #[test]
    fn test_coordinate_monotonic_and_clamped() {
        let projector = Projector::default();
        let mut previous = f32::NEG_INFINITY;
        for step in 0..=400 {
            let coord = projector.value_to_coord(step as f32 * 0.25);
            assert!(coord > previous);
            previous = coord;
        }
        assert_eq!(projector.value_to_coord(-20.0), -DEFAULT_SCALE);
        assert_eq!(projector.value_to_coord(150.0), DEFAULT_SCALE);
    }

    #[test]
    fn test_size_curve() {
        assert_relative_eq!(size_factor(0.0), SIZE_BASE);
        assert_relative_eq!(size_factor(100.0), SIZE_BASE + SIZE_SPREAD);
        // Convex: the midpoint sits below the linear interpolation
        assert!(size_factor(50.0) < SIZE_BASE + 0.5 * SIZE_SPREAD);
        assert!(size_factor(1.0) > SIZE_BASE);

        let mut previous = 0.0;
        for v in 0..=100 {
            let s = size_factor(v as f32);
            assert!(s > previous);
            previous = s;
        }
    }

    #[test]
    fn test_project_uses_mapping_and_filter() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut mapping = MappingEngine::for_catalogue(&catalogue);
        let mut filter = FilterState::for_catalogue(&catalogue);
        let projector = Projector::new(22.0);
        let monolith = catalogue.entity("monolith").unwrap();

        let t = projector.project(monolith, mapping.state(), &filter);
        assert_relative_eq!(t.position.x, projector.value_to_coord(5.0));
        assert_relative_eq!(t.position.z, projector.value_to_coord(10.0));
        assert_relative_eq!(t.size_factor, size_factor(90.0));
        assert!(t.visible);

        mapping.set_axis(Axis::X, AttributeKey::Coupling).unwrap();
        filter.set_category_enabled(CategoryKey::Deployment, false);
        let t = projector.project(monolith, mapping.state(), &filter);
        assert_relative_eq!(t.position.x, projector.value_to_coord(90.0));
        assert!(!t.visible);
    }

    #[test]
    fn test_switching_size_attribute_shrinks_point() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut mapping = MappingEngine::for_catalogue(&catalogue);
        let filter = FilterState::for_catalogue(&catalogue);
        let projector = Projector::default();
        // Monolith: coupling 90, structure 5
        let monolith = catalogue.entity("monolith").unwrap();

        let before = projector.project(monolith, mapping.state(), &filter).size_factor;
        mapping.set_size_attribute(AttributeKey::Structure).unwrap();
        let after = projector.project(monolith, mapping.state(), &filter).size_factor;
        assert!(after < before);
    }

    #[test]
    fn test_tick_label_modes() {
        let projector = Projector::new(10.0);

        let ticks = projector.ticks(TickLabelMode::Endpoints);
        assert_eq!(ticks.len(), 11);
        let labelled: Vec<u32> = ticks.iter().filter(|t| t.label_visible).map(|t| t.value).collect();
        assert_eq!(labelled, vec![0, 50, 100]);
        assert_eq!(ticks[0].coord, -10.0);
        assert_eq!(ticks[10].coord, 10.0);

        assert!(projector.ticks(TickLabelMode::None).iter().all(|t| !t.label_visible));
        assert!(projector.ticks(TickLabelMode::All).iter().all(|t| t.label_visible));
        assert_eq!("endpoints".parse::<TickLabelMode>(), Ok(TickLabelMode::Endpoints));
    }

    #[test]
    fn test_axis_titles_follow_mapping() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut mapping = MappingEngine::for_catalogue(&catalogue);
        mapping.set_axis(Axis::Y, AttributeKey::Coupling).unwrap();

        let titles = Projector::new(22.0).axis_titles(mapping.state(), &catalogue);
        assert_eq!(titles.x.text, "X: Structure");
        assert_eq!(titles.y.text, "Y: Coupling");
        assert_eq!(titles.z.text, "Z: Focus");
        assert_eq!(titles.y.anchor, Point3f::new(0.0, 24.0, 0.0));
    }
}
