//! Error types for archspace

use crate::keys::AttributeKey;
use crate::mapping::Slot;
use thiserror::Error;

/// Main error type for archspace operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] IntegrityViolation),

    #[error("Invalid mapping request: cannot map {slot} to disabled attribute `{attribute}`")]
    InvalidMappingRequest { slot: Slot, attribute: AttributeKey },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A broken catalogue invariant, detected while loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityViolation {
    #[error("unknown attribute definition `{0}`")]
    UnknownAttributeDefinition(String),

    #[error("attribute `{0}` is declared more than once")]
    DuplicateAttribute(AttributeKey),

    #[error("attribute `{0}` is never declared")]
    UndeclaredAttribute(AttributeKey),

    #[error("unknown category definition `{0}`")]
    UnknownCategoryDefinition(String),

    #[error("category `{0}` is declared more than once")]
    DuplicateCategory(String),

    #[error("category `{category}` has invalid color `{color}`")]
    InvalidColor { category: String, color: String },

    #[error("entity id must not be empty")]
    EmptyId,

    #[error("duplicate entity id `{0}`")]
    DuplicateId(String),

    #[error("entity `{entity}` references unknown category `{category}`")]
    UnknownCategory { entity: String, category: String },

    #[error("entity `{entity}` has a value for unknown attribute `{attribute}`")]
    UnknownAttribute { entity: String, attribute: String },

    #[error("entity `{entity}` has no value for `{attribute}`")]
    MissingValue { entity: String, attribute: AttributeKey },

    #[error("entity `{entity}` has {attribute} = {value}, outside [0, 100]")]
    ValueOutOfRange {
        entity: String,
        attribute: AttributeKey,
        value: f32,
    },
}

/// Result type alias for archspace operations
pub type Result<T> = std::result::Result<T, Error>;
