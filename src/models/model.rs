use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Part;

/// One versioned 3D asset and the parts that carry its comments.
///
/// `id` is assigned by the store and never changes. `urn` is the business key
/// supplied by callers and is unique across all models. The document is stored
/// as a single row, so `parts` (and every comment map inside it) is read and
/// written through targeted JSON paths rather than separate tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: Uuid,
    #[serde(rename = "modelURN", alias = "urn")]
    pub urn: String,
    /// Insertion order is kept but carries no meaning.
    pub parts: Vec<Part>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a model. New models start without parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModelInput {
    #[serde(rename = "modelURN", alias = "urn")]
    pub urn: String,
}

/// Input for replacing a whole model document (bulk path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceModelInput {
    #[serde(rename = "modelURN", alias = "urn")]
    pub urn: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl ReplaceModelInput {
    /// Returns the first `partId` that appears more than once, if any.
    pub fn duplicate_part_id(&self) -> Option<i64> {
        let mut seen = HashSet::new();
        self.parts
            .iter()
            .map(|p| p.part_id)
            .find(|id| !seen.insert(*id))
    }
}
