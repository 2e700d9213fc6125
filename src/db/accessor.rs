//! Read side of the store.
//!
//! Part and comment lookups resolve the model and the matching `parts` element
//! in one query and return only the projected value.

use rusqlite::OptionalExtension;

use super::document::{MODEL_COLUMNS, SELECT_COMMENTS, SELECT_PART};
use super::{model_from_row, Database, Result};
use crate::models::*;

impl Database {
    /// Every stored model, in storage order.
    pub fn list_models(&self) -> Result<Vec<Model>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {MODEL_COLUMNS} FROM models ORDER BY rowid"
        ))?;

        let models = stmt
            .query_map([], model_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(models)
    }

    pub fn get_model(&self, urn: &str) -> Result<Option<Model>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let model = conn
            .query_row(
                &format!("SELECT {MODEL_COLUMNS} FROM models WHERE urn = ?1"),
                [urn],
                model_from_row,
            )
            .optional()?;

        Ok(model)
    }

    /// The part with `part_id` inside the model `urn`, or `None` when either is missing.
    pub fn get_part(&self, urn: &str, part_id: i64) -> Result<Option<Part>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let raw: Option<String> = conn
            .query_row(SELECT_PART, (urn, part_id), |row| row.get(0))
            .optional()?;

        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(Into::into)
    }

    /// Only the comment map of a part. `None` when the model or part is missing.
    pub fn get_comments(&self, urn: &str, part_id: i64) -> Result<Option<Comments>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let raw: Option<String> = conn
            .query_row(SELECT_COMMENTS, (urn, part_id), |row| row.get(0))
            .optional()?;

        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(Into::into)
    }
}
