//! Dimension mapping: which attribute drives each axis and the point size
//!
//! The engine keeps four independent slots (X, Y, Z and size). Each slot has a
//! live value, the user's preferred value and a `forced` flag that is set when
//! the preferred attribute had to be replaced because it was disabled.
//! Re-enabling that attribute restores the slot.

use crate::dataset::Catalogue;
use crate::error::{Error, Result};
use crate::keys::{AttributeKey, AttributeMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// One of the four mapping slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    X,
    Y,
    Z,
    Size,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::X, Slot::Y, Slot::Z, Slot::Size];

    /// One-letter label used in compact listings
    pub fn short_label(self) -> &'static str {
        match self {
            Slot::X => "X",
            Slot::Y => "Y",
            Slot::Z => "Z",
            Slot::Size => "S",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Size => f.write_str("size"),
            axis => write!(f, "axis {}", axis.short_label()),
        }
    }
}

/// A spatial axis of the cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl From<Axis> for Slot {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => Slot::X,
            Axis::Y => Slot::Y,
            Axis::Z => Slot::Z,
        }
    }
}

/// Live attribute assignment and the set of enabled attributes
#[derive(Debug, Clone, PartialEq)]
pub struct MappingState {
    slots: [AttributeKey; 4],
    enabled: AttributeMap<bool>,
}

impl MappingState {
    pub fn axis_x(&self) -> AttributeKey {
        self.get(Slot::X)
    }

    pub fn axis_y(&self) -> AttributeKey {
        self.get(Slot::Y)
    }

    pub fn axis_z(&self) -> AttributeKey {
        self.get(Slot::Z)
    }

    pub fn size_attribute(&self) -> AttributeKey {
        self.get(Slot::Size)
    }

    pub fn get(&self, slot: Slot) -> AttributeKey {
        self.slots[slot.index()]
    }

    pub fn is_enabled(&self, key: AttributeKey) -> bool {
        self.enabled[key]
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.iter().filter(|(_, on)| **on).count()
    }
}

/// The user's last explicit choice per slot
#[derive(Debug, Clone, PartialEq)]
pub struct PreferredMapping {
    slots: [AttributeKey; 4],
    forced: [bool; 4],
}

impl PreferredMapping {
    pub fn get(&self, slot: Slot) -> AttributeKey {
        self.slots[slot.index()]
    }

    pub fn is_forced(&self, slot: Slot) -> bool {
        self.forced[slot.index()]
    }
}

/// Owns the mapping state and enforces its invariants
///
/// After every public operation at least one attribute is enabled and every
/// slot points at an enabled attribute.
#[derive(Debug, Clone)]
pub struct MappingEngine {
    order: Vec<AttributeKey>,
    state: MappingState,
    preferred: PreferredMapping,
}

impl MappingEngine {
    /// Create an engine for the given attribute order
    ///
    /// Slots default to the first four attributes in that order (X, Y, Z,
    /// size) and every attribute starts enabled. Keys missing from `order`
    /// are appended in enum order.
    pub fn new(order: &[AttributeKey]) -> Self {
        let mut full: Vec<AttributeKey> = Vec::with_capacity(AttributeKey::COUNT);
        for key in order.iter().chain(AttributeKey::ALL.iter()) {
            if !full.contains(key) {
                full.push(*key);
            }
        }

        let slots = [full[0], full[1], full[2], full[3]];
        Self {
            order: full,
            state: MappingState {
                slots,
                enabled: AttributeMap::splat(true),
            },
            preferred: PreferredMapping {
                slots,
                forced: [false; 4],
            },
        }
    }

    /// Create an engine following the catalogue's attribute order
    pub fn for_catalogue(catalogue: &Catalogue) -> Self {
        Self::new(&catalogue.attribute_order())
    }

    pub fn state(&self) -> &MappingState {
        &self.state
    }

    pub fn preferred(&self) -> &PreferredMapping {
        &self.preferred
    }

    pub fn get(&self, slot: Slot) -> AttributeKey {
        self.state.get(slot)
    }

    pub fn is_enabled(&self, key: AttributeKey) -> bool {
        self.state.is_enabled(key)
    }

    pub fn is_forced(&self, slot: Slot) -> bool {
        self.preferred.is_forced(slot)
    }

    /// Enabled attributes in catalogue order, as offered by axis selectors
    pub fn enabled_attributes(&self) -> Vec<AttributeKey> {
        self.order
            .iter()
            .copied()
            .filter(|k| self.state.enabled[*k])
            .collect()
    }

    /// Enable or disable an attribute and settle the mapping
    ///
    /// Disabling the last enabled attribute re-enables the first attribute in
    /// catalogue order. Slots pointing at a disabled attribute fall back to the
    /// first enabled one and are marked forced; forced slots whose preference
    /// is enabled again are restored.
    pub fn toggle_attribute(&mut self, key: AttributeKey, enabled: bool) {
        debug!(attribute = %key, enabled, "toggle attribute");
        self.state.enabled[key] = enabled;
        self.enforce_enabled();
        self.reconcile_after_toggle();
    }

    /// Explicitly map an axis to an attribute
    pub fn set_axis(&mut self, axis: Axis, key: AttributeKey) -> Result<()> {
        self.set_slot(axis.into(), key)
    }

    /// Explicitly choose the size attribute
    pub fn set_size_attribute(&mut self, key: AttributeKey) -> Result<()> {
        self.set_slot(Slot::Size, key)
    }

    /// Explicitly assign a slot; the value becomes that slot's preference
    ///
    /// A disabled attribute is rejected and the mapping is left unchanged.
    pub fn set_slot(&mut self, slot: Slot, key: AttributeKey) -> Result<()> {
        if !self.state.enabled[key] {
            warn!(%slot, attribute = %key, "rejected mapping to disabled attribute");
            return Err(Error::InvalidMappingRequest {
                slot,
                attribute: key,
            });
        }

        let i = slot.index();
        self.state.slots[i] = key;
        self.preferred.slots[i] = key;
        self.preferred.forced[i] = false;
        debug!(%slot, attribute = %key, "slot assigned");
        Ok(())
    }

    /// Restore every forced slot whose preferred attribute is enabled again
    pub fn reconcile_after_toggle(&mut self) {
        for slot in Slot::ALL {
            let i = slot.index();
            let wanted = self.preferred.slots[i];
            if self.preferred.forced[i] && self.state.enabled[wanted] {
                info!(%slot, attribute = %wanted, "slot restored to preferred attribute");
                self.state.slots[i] = wanted;
                self.preferred.forced[i] = false;
            }
        }
    }

    fn first_enabled(&self) -> AttributeKey {
        self.order
            .iter()
            .copied()
            .find(|k| self.state.enabled[*k])
            .unwrap_or(self.order[0])
    }

    fn enforce_enabled(&mut self) {
        if self.state.enabled_count() == 0 {
            let fallback = self.order[0];
            info!(attribute = %fallback, "all attributes disabled, re-enabling first");
            self.state.enabled[fallback] = true;
        }

        let fallback = self.first_enabled();
        for slot in Slot::ALL {
            let i = slot.index();
            let current = self.state.slots[i];
            if !self.state.enabled[current] {
                info!(%slot, from = %current, to = %fallback, "slot forced off disabled attribute");
                self.state.slots[i] = fallback;
                self.preferred.forced[i] = true;
            }
        }
    }
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new(&AttributeKey::ALL)
    }
}
