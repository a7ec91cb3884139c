//! Category and per-entity visibility filters

use crate::dataset::{Catalogue, Entity};
use crate::keys::{CategoryKey, EntityId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Visibility flags for categories and individual entities
///
/// An entity is visible only when both its category and the entity itself
/// are enabled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    category_enabled: HashMap<CategoryKey, bool>,
    entity_enabled: HashMap<EntityId, bool>,
}

impl FilterState {
    /// All categories and entities of the catalogue enabled
    pub fn for_catalogue(catalogue: &Catalogue) -> Self {
        let mut filter = Self::default();
        filter.sync_with(catalogue);
        filter
    }

    /// Align the flag tables with the catalogue
    ///
    /// Missing categories and entities get an enabled entry, entries that no
    /// longer exist in the catalogue are dropped. Existing flags are kept.
    pub fn sync_with(&mut self, catalogue: &Catalogue) {
        for category in catalogue.categories() {
            self.category_enabled.entry(category.key).or_insert(true);
        }
        self.category_enabled
            .retain(|key, _| catalogue.category(*key).is_some());

        for entity in catalogue.entities() {
            self.entity_enabled.entry(entity.id.clone()).or_insert(true);
        }
        let before = self.entity_enabled.len();
        self.entity_enabled.retain(|id, _| catalogue.contains(id.as_str()));
        let pruned = before - self.entity_enabled.len();
        if pruned > 0 {
            debug!(pruned, "dropped stale entity flags");
        }
    }

    pub fn set_category_enabled(&mut self, key: CategoryKey, enabled: bool) {
        match self.category_enabled.get_mut(&key) {
            Some(flag) => *flag = enabled,
            None => warn!(category = %key, "ignoring toggle of undeclared category"),
        }
    }

    /// Set one entity's flag; returns false for ids that are not tracked
    pub fn set_entity_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.entity_enabled.get_mut(id) {
            Some(flag) => {
                *flag = enabled;
                true
            }
            None => {
                warn!(entity = id, "ignoring toggle of unknown entity");
                false
            }
        }
    }

    /// Set every entity's flag, regardless of category
    pub fn set_all_entities(&mut self, catalogue: &Catalogue, enabled: bool) {
        for entity in catalogue.entities() {
            self.set_entity_enabled(entity.id.as_str(), enabled);
        }
    }

    /// Set the flag of every member of one category, leaving others untouched
    pub fn set_entities_for_category(&mut self, catalogue: &Catalogue, key: CategoryKey, enabled: bool) {
        for entity in catalogue.entities_in_category(key) {
            self.set_entity_enabled(entity.id.as_str(), enabled);
        }
    }

    pub fn is_category_enabled(&self, key: CategoryKey) -> bool {
        self.category_enabled.get(&key).copied().unwrap_or(false)
    }

    pub fn is_entity_enabled(&self, id: &str) -> bool {
        self.entity_enabled.get(id).copied().unwrap_or(false)
    }

    pub fn is_visible(&self, entity: &Entity) -> bool {
        self.is_category_enabled(entity.category) && self.is_entity_enabled(entity.id.as_str())
    }

    /// Visibility of an entity looked up by id; unknown ids are never visible
    pub fn is_visible_id(&self, catalogue: &Catalogue, id: &str) -> bool {
        catalogue.entity(id).is_some_and(|e| self.is_visible(e))
    }

    pub fn visible_count(&self, catalogue: &Catalogue) -> usize {
        catalogue.entities().iter().filter(|e| self.is_visible(e)).count()
    }

    /// Number of tracked entity flags
    pub fn tracked_entities(&self) -> usize {
        self.entity_enabled.len()
    }
}
