//! Attribute and category keys, entity ids and per-attribute tables

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string does not name a known key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseKeyError {
    pub kind: &'static str,
    pub value: String,
}

/// One numeric facet of an architecture style, valued in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKey {
    Structure,
    Granularity,
    Focus,
    Coupling,
}

impl AttributeKey {
    pub const COUNT: usize = 4;

    pub const ALL: [AttributeKey; Self::COUNT] = [
        AttributeKey::Structure,
        AttributeKey::Granularity,
        AttributeKey::Focus,
        AttributeKey::Coupling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Structure => "structure",
            AttributeKey::Granularity => "granularity",
            AttributeKey::Focus => "focus",
            AttributeKey::Coupling => "coupling",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseKeyError {
                kind: "attribute",
                value: s.to_string(),
            })
    }
}

/// Grouping of architecture styles, each with its own display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Structural,
    Strategic,
    Deployment,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 3] = [
        CategoryKey::Structural,
        CategoryKey::Strategic,
        CategoryKey::Deployment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::Structural => "structural",
            CategoryKey::Strategic => "strategic",
            CategoryKey::Deployment => "deployment",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseKeyError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Unique identifier of a catalogue entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A fixed-size table holding one value per attribute
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttributeMap<T>([T; AttributeKey::COUNT]);

impl<T> AttributeMap<T> {
    /// Build a table by evaluating `f` for every attribute
    pub fn from_fn(f: impl FnMut(AttributeKey) -> T) -> Self {
        Self(AttributeKey::ALL.map(f))
    }

    /// Iterate over `(key, value)` pairs in declaration order of the enum
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &T)> {
        AttributeKey::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T: Copy> AttributeMap<T> {
    /// Create a table with every attribute set to `value`
    pub fn splat(value: T) -> Self {
        Self([value; AttributeKey::COUNT])
    }
}

impl<T> Index<AttributeKey> for AttributeMap<T> {
    type Output = T;

    fn index(&self, key: AttributeKey) -> &Self::Output {
        &self.0[key.index()]
    }
}

impl<T> IndexMut<AttributeKey> for AttributeMap<T> {
    fn index_mut(&mut self, key: AttributeKey) -> &mut Self::Output {
        &mut self.0[key.index()]
    }
}
