use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::db::{Database, StoreError};
use crate::models::*;

type ApiError = (StatusCode, String);

// ============================================================
// Error Handling
// ============================================================

/// Translate a store failure into a response.
///
/// Conflicts and invalid documents are the caller's fault and are returned as
/// they are. Anything else is logged in full and hidden behind a generic 500.
fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::Conflict(msg) => {
            tracing::warn!("Conflict: {}", msg);
            (StatusCode::CONFLICT, msg)
        }
        StoreError::InvalidDocument(msg) => {
            tracing::warn!("Validation error: {}", msg);
            (StatusCode::BAD_REQUEST, msg)
        }
        other => {
            tracing::error!("Internal error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

fn bad_request(msg: &str) -> ApiError {
    tracing::warn!("Validation error: {}", msg);
    (StatusCode::BAD_REQUEST, msg.to_string())
}

fn model_not_found() -> ApiError {
    (StatusCode::NOT_FOUND, "Model not found".to_string())
}

fn part_not_found() -> ApiError {
    (StatusCode::NOT_FOUND, "Model part not found".to_string())
}

/// Resolve the model and then the part, so the 404 says which one is missing.
fn resolve_part(db: &Database, urn: &str, part_id: i64) -> Result<Part, ApiError> {
    db.get_model(urn)
        .map_err(store_error)?
        .ok_or_else(model_not_found)?;

    db.get_part(urn, part_id)
        .map_err(store_error)?
        .ok_or_else(part_not_found)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Models
// ============================================================

pub async fn list_models(State(db): State<Database>) -> Result<Json<Vec<Model>>, ApiError> {
    db.list_models().map(Json).map_err(store_error)
}

pub async fn get_model(
    State(db): State<Database>,
    Path(urn): Path<String>,
) -> Result<Json<Model>, ApiError> {
    db.get_model(&urn)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(model_not_found)
}

pub async fn create_model(
    State(db): State<Database>,
    Json(input): Json<CreateModelInput>,
) -> Result<(StatusCode, Json<Model>), ApiError> {
    if input.urn.trim().is_empty() {
        return Err(bad_request("Model URN is required"));
    }

    if db.get_model(&input.urn).map_err(store_error)?.is_some() {
        return Err((
            StatusCode::CONFLICT,
            "Model with this URN already exists".to_string(),
        ));
    }

    db.create_model(input)
        .map(|m| (StatusCode::CREATED, Json(m)))
        .map_err(store_error)
}

pub async fn replace_model(
    State(db): State<Database>,
    Path(urn): Path<String>,
    Json(input): Json<ReplaceModelInput>,
) -> Result<Json<Model>, ApiError> {
    if input.urn.trim().is_empty() {
        return Err(bad_request("Model URN is required"));
    }

    db.replace_model(&urn, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(model_not_found)
}

pub async fn delete_model(
    State(db): State<Database>,
    Path(urn): Path<String>,
) -> Result<StatusCode, ApiError> {
    if db.delete_model(&urn).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(model_not_found())
    }
}

// ============================================================
// Parts
// ============================================================

pub async fn add_part(
    State(db): State<Database>,
    Path(urn): Path<String>,
    Json(input): Json<AddPartInput>,
) -> Result<(StatusCode, Json<Part>), ApiError> {
    db.get_model(&urn)
        .map_err(store_error)?
        .ok_or_else(model_not_found)?;

    let part = Part::new(input.part_id);

    // The store refuses a duplicate partId on its own; a false here means
    // another request added it (or deleted the model) since the lookup above.
    if db.add_part(&urn, &part).map_err(store_error)? {
        Ok((StatusCode::CREATED, Json(part)))
    } else {
        Err((
            StatusCode::CONFLICT,
            "Part with this ID already exists in the model".to_string(),
        ))
    }
}

pub async fn get_part(
    State(db): State<Database>,
    Path((urn, part_id)): Path<(String, i64)>,
) -> Result<Json<Part>, ApiError> {
    resolve_part(&db, &urn, part_id).map(Json)
}

// ============================================================
// Comments
// ============================================================

pub async fn get_comments(
    State(db): State<Database>,
    Path((urn, part_id)): Path<(String, i64)>,
) -> Result<Json<Comments>, ApiError> {
    resolve_part(&db, &urn, part_id)?;

    db.get_comments(&urn, part_id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(part_not_found)
}

/// Set a comment. Responds 200 with the part's comments when something changed
/// and 204 when the entry already held that value.
pub async fn set_comment(
    State(db): State<Database>,
    Path((urn, part_id)): Path<(String, i64)>,
    Json(input): Json<AddCommentInput>,
) -> Result<Response, ApiError> {
    if input.key.is_empty() {
        return Err(bad_request("Comment key is required"));
    }

    resolve_part(&db, &urn, part_id)?;

    if !db
        .set_comment(&urn, part_id, &input.key, &input.value)
        .map_err(store_error)?
    {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let comments = db
        .get_comments(&urn, part_id)
        .map_err(store_error)?
        .unwrap_or_default();
    Ok((StatusCode::OK, Json(comments)).into_response())
}

pub async fn delete_comment(
    State(db): State<Database>,
    Path((urn, part_id, key)): Path<(String, i64, String)>,
) -> Result<StatusCode, ApiError> {
    resolve_part(&db, &urn, part_id)?;

    if db.delete_comment(&urn, part_id, &key).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Comment not found".to_string()))
    }
}
