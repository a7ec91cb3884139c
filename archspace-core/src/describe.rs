//! Plain-language interpretation of attribute values

use crate::dataset::{Catalogue, Entity, VALUE_MAX, VALUE_MIN};
use crate::keys::AttributeKey;
use crate::mapping::{MappingState, Slot};
use serde::Serialize;
use std::fmt;

/// Coarse band of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Level {
    pub fn of(value: f32) -> Self {
        let v = value.clamp(VALUE_MIN, VALUE_MAX).round();
        if v < 25.0 {
            Level::VeryLow
        } else if v < 45.0 {
            Level::Low
        } else if v < 60.0 {
            Level::Medium
        } else if v < 80.0 {
            Level::High
        } else {
            Level::VeryHigh
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::VeryLow => "very low",
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
            Level::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-line reading of a value for the given attribute
pub fn describe(key: AttributeKey, value: f32) -> String {
    let level = Level::of(value);
    match key {
        AttributeKey::Structure => format!("{} structural organisation", level),
        AttributeKey::Granularity => format!("{} service granularity (monolith ↔ distributed)", level),
        AttributeKey::Focus => format!("{} domain focus (technical ↔ domain-driven)", level),
        AttributeKey::Coupling => format!("{} coupling (low ↔ high)", level),
    }
}

/// What one slot says about an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisReading {
    pub slot: Slot,
    pub attribute: AttributeKey,
    pub label: String,
    pub value: f32,
    pub note: String,
}

/// Readings for X, Y, Z and size under the current mapping
pub fn snapshot(entity: &Entity, mapping: &MappingState, catalogue: &Catalogue) -> [AxisReading; 4] {
    Slot::ALL.map(|slot| {
        let attribute = mapping.get(slot);
        let value = entity.value(attribute);
        AxisReading {
            slot,
            attribute,
            label: catalogue.attribute_label(attribute).to_string(),
            value,
            note: describe(attribute, value),
        }
    })
}
