//! Axum route handlers for the memo REST API.
//!
//! Store calls do blocking file I/O, so each one runs on the blocking pool.
//! Once started it finishes even if the client goes away.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::entity::{Memo, MemoDraft, MemoUpdate};
use crate::storage::{AttachmentStore, MemoStore};

use super::error::{ApiError, ErrorBody};

#[derive(Clone)]
pub struct AppState {
    pub memos: Arc<MemoStore>,
    pub attachments: Arc<AttachmentStore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub name: String,
}

async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

// GET /api/memos
pub async fn list_memos(State(state): State<AppState>) -> Result<Json<Vec<Memo>>, ApiError> {
    let store = state.memos.clone();
    let mut memos = run_blocking(move || store.list()).await?;
    memos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    Ok(Json(memos))
}

// POST /api/memos
pub async fn create_memo(
    State(state): State<AppState>,
    Json(draft): Json<MemoDraft>,
) -> Result<(StatusCode, Json<Memo>), ApiError> {
    let store = state.memos.clone();
    let memo = run_blocking(move || store.create(draft)).await?;
    Ok((StatusCode::CREATED, Json(memo)))
}

// GET /api/memos/{id}
pub async fn get_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Memo>, ApiError> {
    let store = state.memos.clone();
    let memo = run_blocking(move || store.get(&id)).await?;
    Ok(Json(memo))
}

// PUT /api/memos/{id}
pub async fn update_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MemoUpdate>,
) -> Result<Json<Memo>, ApiError> {
    let store = state.memos.clone();
    let memo = run_blocking(move || {
        store.update(&id, patch)?;
        store.get(&id)
    })
    .await?;
    Ok(Json(memo))
}

// DELETE /api/memos/{id}
pub async fn delete_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.memos.clone();
    run_blocking(move || store.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let store = state.memos.clone();
    let tags = run_blocking(move || store.tags()).await?;
    Ok(Json(tags))
}

// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let attachments = state.attachments.clone();
        let attachment = run_blocking(move || attachments.save(&name, &bytes)).await?;
        return Ok(Json(UploadResponse {
            url: attachment.url(),
            name: attachment.name,
        }));
    }

    Err(ApiError::BadRequest("No file received".to_string()))
}

// Fallback for /api/* so unknown API paths never reach the frontend
pub async fn api_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Unknown API route".to_string(),
        }),
    )
}
