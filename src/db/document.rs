//! Addressing scheme for the nested model document.
//!
//! A model row keeps its parts as one JSON array in the `parts` column:
//!
//! ```text
//! parts: [ { "partId": 1, "comments": { "status": "reviewed" } }, ... ]
//! ```
//!
//! Every statement that reaches below the row level lives here. Parts are
//! matched with `json_each(parts)` on `$.partId`; the index of the matched
//! element (`p.key`) is then used as the positional segment of the path that
//! gets rewritten, so sibling parts are never touched and the whole array is
//! never shipped to the application.
//!
//! Comment keys are caller supplied and may contain `.`, `"` or `$`, so they are
//! never spliced into a path string. Writes to a comment map go through
//! `json_patch` with a one-entry merge patch built by [`CommentPatch`].

use serde_json::{Map, Value};

pub(crate) const MODEL_COLUMNS: &str = "id, urn, parts, created_at, updated_at";

/// Project one element of `parts`. Binds `?1` urn, `?2` partId.
pub(crate) const SELECT_PART: &str = "
    SELECT p.value
    FROM models m, json_each(m.parts) p
    WHERE m.urn = ?1 AND json_extract(p.value, '$.partId') = ?2
    LIMIT 1";

/// Project only the comment map of one element of `parts`. Same binds as [`SELECT_PART`].
pub(crate) const SELECT_COMMENTS: &str = "
    SELECT COALESCE(json_extract(p.value, '$.comments'), '{}')
    FROM models m, json_each(m.parts) p
    WHERE m.urn = ?1 AND json_extract(p.value, '$.partId') = ?2
    LIMIT 1";

/// Append a part unless one with the same `partId` is already present.
/// Binds `?1` urn, `?2` partId, `?3` part document, `?4` timestamp.
pub(crate) const APPEND_PART: &str = "
    UPDATE models
    SET parts = json_insert(parts, '$[#]', json(?3)), updated_at = ?4
    WHERE urn = ?1
      AND NOT EXISTS (
          SELECT 1 FROM json_each(models.parts) p
          WHERE json_extract(p.value, '$.partId') = ?2
      )";

/// Positional update of one part's comment map.
/// Binds `?1` urn, `?2` partId, `?3` merge patch, `?4` timestamp.
///
/// The outer `parts <> target.parts` guard makes the affected-row count mean
/// "document changed": rewriting an identical value or removing an absent key
/// updates nothing.
pub(crate) const PATCH_COMMENTS: &str = "
    UPDATE models
    SET parts = target.parts, updated_at = ?4
    FROM (
        SELECT m.id AS id,
               json_set(
                   m.parts,
                   '$[' || p.key || '].comments',
                   json_patch(COALESCE(json_extract(p.value, '$.comments'), '{}'), ?3)
               ) AS parts
        FROM models m, json_each(m.parts) p
        WHERE m.urn = ?1 AND json_extract(p.value, '$.partId') = ?2
        LIMIT 1
    ) AS target
    WHERE models.id = target.id AND models.parts <> target.parts";

/// A single-entry change to a part's comment map, expressed as an RFC 7396
/// merge patch: `{key: value}` sets the entry, `{key: null}` removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommentPatch<'a> {
    Set { key: &'a str, value: &'a str },
    Unset { key: &'a str },
}

impl CommentPatch<'_> {
    pub(crate) fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Unset { key } => key,
        }
    }

    pub(crate) fn to_json(&self) -> String {
        let entry = match self {
            Self::Set { value, .. } => Value::String((*value).to_string()),
            Self::Unset { .. } => Value::Null,
        };
        let mut patch = Map::with_capacity(1);
        patch.insert(self.key().to_string(), entry);
        Value::Object(patch).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_patch_carries_value() {
        let patch = CommentPatch::Set {
            key: "status",
            value: "reviewed",
        };
        assert_eq!(patch.to_json(), r#"{"status":"reviewed"}"#);
    }

    #[test]
    fn unset_patch_carries_null() {
        let patch = CommentPatch::Unset { key: "status" };
        assert_eq!(patch.to_json(), r#"{"status":null}"#);
    }

    #[test]
    fn keys_with_path_syntax_stay_literal() {
        let patch = CommentPatch::Set {
            key: r#"a.b"$[0]"#,
            value: "x",
        };
        let parsed: Value = serde_json::from_str(&patch.to_json()).unwrap();
        assert_eq!(parsed[r#"a.b"$[0]"#], "x");
    }

    #[test]
    fn patch_merges_in_sqlite() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let merged: String = conn
            .query_row(
                "SELECT json_patch('{\"a\":\"1\",\"b\":\"2\"}', ?1)",
                [CommentPatch::Unset { key: "a" }.to_json()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(merged, r#"{"b":"2"}"#);
    }
}
