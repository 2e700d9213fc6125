//! Write side of the store.
//!
//! Each operation is a single statement. Success is read from the number of
//! rows the statement changed, never from a follow-up read, so a write that
//! matches nothing (unknown URN, unknown part, absent key) reports `false`.

use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::document::{CommentPatch, APPEND_PART, MODEL_COLUMNS, PATCH_COMMENTS};
use super::error::is_constraint_violation;
use super::{model_from_row, Database, Result, StoreError};
use crate::models::*;

impl Database {
    /// Insert a new model with no parts.
    ///
    /// URN uniqueness is enforced by a unique index, so a concurrent create that
    /// slips past a caller's `get_model` check still fails with
    /// [`StoreError::Conflict`].
    pub fn create_model(&self, input: CreateModelInput) -> Result<Model> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO models (id, urn, parts, created_at, updated_at)
             VALUES (?, ?, '[]', ?, ?)",
            (id.to_string(), &input.urn, now.to_rfc3339(), now.to_rfc3339()),
        )
        .map_err(|e| conflict_or(e, &input.urn))?;

        tracing::debug!(urn = %input.urn, %id, "Created model");

        Ok(Model {
            id,
            urn: input.urn,
            parts: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Append `part` to the model's parts.
    ///
    /// Returns `false` when the model does not exist or already holds a part
    /// with the same `partId`, whatever that part's comments are.
    pub fn add_part(&self, urn: &str, part: &Part) -> Result<bool> {
        let document = serde_json::to_string(part)?;
        let conn = self.conn.lock().expect("database lock poisoned");

        let rows = conn.execute(
            APPEND_PART,
            (urn, part.part_id, &document, Utc::now().to_rfc3339()),
        )?;

        let appended = rows > 0;
        tracing::debug!(urn, part_id = part.part_id, appended, "Add part");
        Ok(appended)
    }

    /// Set one comment on one part, overwriting any previous value for `key`.
    ///
    /// Returns `false` when the model or part is missing, or when the entry
    /// already holds `value`.
    pub fn set_comment(&self, urn: &str, part_id: i64, key: &str, value: &str) -> Result<bool> {
        self.patch_comments(urn, part_id, CommentPatch::Set { key, value })
    }

    /// Remove one comment from one part.
    ///
    /// Returns `false` when the model, part or key is missing. The key is
    /// removed from the map rather than set to an empty value.
    pub fn delete_comment(&self, urn: &str, part_id: i64, key: &str) -> Result<bool> {
        self.patch_comments(urn, part_id, CommentPatch::Unset { key })
    }

    fn patch_comments(&self, urn: &str, part_id: i64, patch: CommentPatch<'_>) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let rows = conn.execute(
            PATCH_COMMENTS,
            (urn, part_id, patch.to_json(), Utc::now().to_rfc3339()),
        )?;

        let modified = rows > 0;
        tracing::debug!(urn, part_id, key = patch.key(), modified, "Patched comments");
        Ok(modified)
    }

    /// Replace the whole document stored under `urn`. The model keeps its `id`
    /// and `created_at`; the URN itself may change.
    ///
    /// Returns `None` if no model matched.
    pub fn replace_model(&self, urn: &str, input: ReplaceModelInput) -> Result<Option<Model>> {
        if let Some(part_id) = input.duplicate_part_id() {
            return Err(StoreError::InvalidDocument(format!(
                "partId {} appears more than once",
                part_id
            )));
        }

        let parts = serde_json::to_string(&input.parts)?;
        let conn = self.conn.lock().expect("database lock poisoned");

        let model = conn
            .query_row(
                &format!(
                    "UPDATE models SET urn = ?2, parts = json(?3), updated_at = ?4
                     WHERE urn = ?1
                     RETURNING {MODEL_COLUMNS}"
                ),
                (urn, &input.urn, &parts, Utc::now().to_rfc3339()),
                model_from_row,
            )
            .optional()
            .map_err(|e| conflict_or(e, &input.urn))?;

        let replaced = model.is_some();
        tracing::debug!(urn, new_urn = %input.urn, replaced, "Replace model");
        Ok(model)
    }

    pub fn delete_model(&self, urn: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM models WHERE urn = ?", [urn])?;
        Ok(rows > 0)
    }
}

fn conflict_or(err: rusqlite::Error, urn: &str) -> StoreError {
    if is_constraint_violation(&err) {
        StoreError::Conflict(format!("Model with URN {} already exists", urn))
    } else {
        StoreError::Store(err)
    }
}
