//! Typed views over input rows.
//!
//! # Field Mapping
//!
//! | Record | Field | Required | Default |
//! |--------|-------|----------|---------|
//! | Entity | `id` | Yes | - |
//! | Entity | `name` | No | the `id` |
//! | Entity | `type` | No | `Entity` |
//! | Relationship | `source` | Yes | - |
//! | Relationship | `target` | Yes | - |
//! | Relationship | `predicate` | No | `related to` |
//!
//! A field that is present but null counts as missing.

use crate::io::Record;
use crate::{Error, Result};

/// Category given to nodes whose entity row has no `type`.
pub const DEFAULT_CATEGORY: &str = "Entity";

/// Relation label given to edges whose relationship row has no `predicate`.
pub const DEFAULT_RELATION: &str = "related to";

/// An entity row: one node candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// Node identity.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Category label (the `type` column).
    pub entity_type: Option<String>,
}

impl EntityRecord {
    /// Record set name used in error messages.
    pub const SET: &'static str = "entities";

    /// Reads an entity from a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `id` is absent or null.
    pub fn from_record(record: &Record, row: usize) -> Result<Self> {
        Ok(Self {
            id: required(record, Self::SET, row, "id")?,
            name: record.get("name").map(String::from),
            entity_type: record.get("type").map(String::from),
        })
    }

    /// Returns the display label: the name, else the id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Returns the category: the type, else [`DEFAULT_CATEGORY`].
    #[must_use]
    pub fn category(&self) -> &str {
        self.entity_type.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

/// A relationship row: one edge candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRecord {
    /// Id of one endpoint.
    pub source: String,
    /// Id of the other endpoint.
    pub target: String,
    /// Relation label.
    pub predicate: Option<String>,
}

impl RelationshipRecord {
    /// Record set name used in error messages.
    pub const SET: &'static str = "relationships";

    /// Reads a relationship from a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `source` or `target` is absent or null.
    pub fn from_record(record: &Record, row: usize) -> Result<Self> {
        Ok(Self {
            source: required(record, Self::SET, row, "source")?,
            target: required(record, Self::SET, row, "target")?,
            predicate: record.get("predicate").map(String::from),
        })
    }

    /// Returns the relation label: the predicate, else [`DEFAULT_RELATION`].
    #[must_use]
    pub fn relation_label(&self) -> &str {
        self.predicate.as_deref().unwrap_or(DEFAULT_RELATION)
    }
}

fn required(record: &Record, set: &'static str, row: usize, field: &'static str) -> Result<String> {
    record
        .get(field)
        .map(String::from)
        .ok_or(Error::MissingField { set, row, field })
}
