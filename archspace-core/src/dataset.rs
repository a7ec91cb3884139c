//! The architecture-style catalogue and its load-time validation

use crate::error::{IntegrityViolation, Result};
use crate::keys::{AttributeKey, AttributeMap, CategoryKey, EntityId};
use crate::point::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Lowest value an attribute may take
pub const VALUE_MIN: f32 = 0.0;

/// Highest value an attribute may take
pub const VALUE_MAX: f32 = 100.0;

/// Display metadata for one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDef {
    pub key: AttributeKey,
    pub label: String,
}

/// Display metadata for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDef {
    pub key: CategoryKey,
    pub label: String,
    pub color: Rgb,
}

/// One architecture style
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub category: CategoryKey,
    pub description: String,
    pub url: Option<String>,
    pub values: AttributeMap<f32>,
}

impl Entity {
    /// Value of one attribute, in [0, 100]
    pub fn value(&self, key: AttributeKey) -> f32 {
        self.values[key]
    }
}

/// Unvalidated catalogue document with string keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogueRecord {
    pub attributes: Vec<AttributeRecord>,
    pub categories: Vec<CategoryRecord>,
    pub entities: Vec<EntityRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub key: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub values: BTreeMap<String, f32>,
}

/// Validated, immutable catalogue of architecture styles
///
/// Order of attributes, categories and entities is the declaration order of
/// the source document and is preserved by every accessor.
#[derive(Debug, Clone)]
pub struct Catalogue {
    attributes: Vec<AttributeDef>,
    categories: Vec<CategoryDef>,
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl Catalogue {
    /// Validate a raw catalogue document
    ///
    /// Fails with [`crate::Error::DataIntegrity`] if an entity references an
    /// undeclared category, an id is repeated, a value lies outside [0, 100],
    /// or the attribute/category declarations are themselves inconsistent.
    pub fn from_record(record: CatalogueRecord) -> Result<Self> {
        let attributes = validate_attributes(record.attributes)?;
        let categories = validate_categories(record.categories)?;
        let declared: HashSet<CategoryKey> = categories.iter().map(|c| c.key).collect();

        let mut entities = Vec::with_capacity(record.entities.len());
        let mut index = HashMap::with_capacity(record.entities.len());

        for raw in record.entities {
            let entity = validate_entity(raw, &declared)?;
            if index.contains_key(&entity.id) {
                return Err(IntegrityViolation::DuplicateId(entity.id.to_string()).into());
            }
            index.insert(entity.id.clone(), entities.len());
            entities.push(entity);
        }

        debug!(
            attributes = attributes.len(),
            categories = categories.len(),
            entities = entities.len(),
            "catalogue loaded"
        );

        Ok(Self {
            attributes,
            categories,
            entities,
            index,
        })
    }

    /// Parse and validate a JSON catalogue document
    pub fn from_json(json: &str) -> Result<Self> {
        let record: CatalogueRecord = serde_json::from_str(json)?;
        Self::from_record(record)
    }

    /// Load and validate a JSON catalogue file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Entities in catalogue order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Attribute definitions in catalogue order
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    /// Category definitions in catalogue order
    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    /// Attribute keys in catalogue order
    pub fn attribute_order(&self) -> Vec<AttributeKey> {
        self.attributes.iter().map(|a| a.key).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn category(&self, key: CategoryKey) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Display label of an attribute, falling back to its key
    pub fn attribute_label(&self, key: AttributeKey) -> &str {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.label.as_str())
            .unwrap_or_else(|| key.as_str())
    }

    /// Members of one category, in catalogue order
    pub fn entities_in_category(&self, key: CategoryKey) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.category == key)
    }
}

fn validate_attributes(raw: Vec<AttributeRecord>) -> Result<Vec<AttributeDef>> {
    let mut seen = AttributeMap::splat(false);
    let mut defs = Vec::with_capacity(raw.len());

    for record in raw {
        let key: AttributeKey = record
            .key
            .parse()
            .map_err(|_| IntegrityViolation::UnknownAttributeDefinition(record.key.clone()))?;
        if seen[key] {
            return Err(IntegrityViolation::DuplicateAttribute(key).into());
        }
        seen[key] = true;
        defs.push(AttributeDef {
            key,
            label: record.label,
        });
    }

    if let Some((missing, _)) = seen.iter().find(|(_, declared)| !**declared) {
        return Err(IntegrityViolation::UndeclaredAttribute(missing).into());
    }

    Ok(defs)
}

fn validate_categories(raw: Vec<CategoryRecord>) -> Result<Vec<CategoryDef>> {
    let mut defs: Vec<CategoryDef> = Vec::with_capacity(raw.len());

    for record in raw {
        let key: CategoryKey = record
            .key
            .parse()
            .map_err(|_| IntegrityViolation::UnknownCategoryDefinition(record.key.clone()))?;
        if defs.iter().any(|d| d.key == key) {
            return Err(IntegrityViolation::DuplicateCategory(record.key).into());
        }
        let color = Rgb::from_hex(&record.color).ok_or_else(|| IntegrityViolation::InvalidColor {
            category: record.key.clone(),
            color: record.color.clone(),
        })?;
        defs.push(CategoryDef {
            key,
            label: record.label,
            color,
        });
    }

    Ok(defs)
}

fn validate_entity(raw: EntityRecord, declared: &HashSet<CategoryKey>) -> Result<Entity> {
    if raw.id.is_empty() {
        return Err(IntegrityViolation::EmptyId.into());
    }

    let category = raw
        .category
        .parse::<CategoryKey>()
        .ok()
        .filter(|key| declared.contains(key))
        .ok_or_else(|| IntegrityViolation::UnknownCategory {
            entity: raw.id.clone(),
            category: raw.category.clone(),
        })?;

    let mut values = AttributeMap::splat(None);
    for (name, value) in &raw.values {
        let key: AttributeKey = name.parse().map_err(|_| IntegrityViolation::UnknownAttribute {
            entity: raw.id.clone(),
            attribute: name.clone(),
        })?;
        if !value.is_finite() || !(VALUE_MIN..=VALUE_MAX).contains(value) {
            return Err(IntegrityViolation::ValueOutOfRange {
                entity: raw.id.clone(),
                attribute: key,
                value: *value,
            }
            .into());
        }
        values[key] = Some(*value);
    }

    if let Some((missing, _)) = values.iter().find(|(_, v)| v.is_none()) {
        return Err(IntegrityViolation::MissingValue {
            entity: raw.id,
            attribute: missing,
        }
        .into());
    }

    Ok(Entity {
        id: EntityId::new(raw.id),
        name: raw.name,
        category,
        description: raw.description,
        url: raw.url,
        values: AttributeMap::from_fn(|key| values[key].unwrap_or_default()),
    })
}
