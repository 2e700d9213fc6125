use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Comment annotations on a part, keyed by caller-chosen names.
///
/// Setting an existing key overwrites its value; there is no history.
pub type Comments = BTreeMap<String, String>;

/// A numerically identified sub-component of a [`Model`](super::Model).
///
/// `part_id` is unique within its parent model only. Once appended a part is
/// never replaced on its own: only entries of its `comments` map change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(rename = "partId")]
    pub part_id: i64,
    #[serde(default)]
    pub comments: Comments,
}

impl Part {
    /// A part with no comments yet.
    pub fn new(part_id: i64) -> Self {
        Self {
            part_id,
            comments: Comments::new(),
        }
    }
}

/// Input for appending a part to a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPartInput {
    #[serde(rename = "partId")]
    pub part_id: i64,
}

/// Input for setting a single comment entry on a part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentInput {
    pub key: String,
    pub value: String,
}
