use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::{ApiError, ApiResponse, AppState};
use crate::models::movie::Movie;

pub const UPLOAD_FIELD: &str = "movies";
const ACCEPTED_MIME: &str = "text/plain";

/// Upload written to `upload_dir`. The handler removes it with
/// [`StagedUpload::discard`]; `Drop` only covers a cancelled request.
struct StagedUpload {
    path: PathBuf,
    discarded: bool,
}

impl StagedUpload {
    async fn discard(mut self) {
        self.discarded = true;
        if let Err(e) = tokio::fs::remove_file(&self.path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload");
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.discarded {
            return;
        }
        // Single unlink; no async context to await in.
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload");
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::validation(err.body_text())
        }
    }
}

fn too_large(limit: usize) -> ApiError {
    ApiError::PayloadTooLarge(format!("File exceeds the {limit} byte upload limit"))
}

async fn write_chunks(field: &mut Field<'_>, path: &Path, limit: usize) -> Result<(), ApiError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to stage upload: {e}")))?;

    let mut written = 0usize;
    while let Some(chunk) = field.chunk().await? {
        written += chunk.len();
        if written > limit {
            return Err(too_large(limit));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to stage upload: {e}")))?;
    }

    file.flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to stage upload: {e}")))
}

/// Streams the field into `upload_dir` under a fresh name.
async fn stage(
    mut field: Field<'_>,
    upload_dir: &Path,
    limit: usize,
) -> Result<StagedUpload, ApiError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create upload dir: {e}")))?;

    let staged = StagedUpload {
        path: upload_dir.join(format!("movies-{}.txt", uuid::Uuid::new_v4())),
        discarded: false,
    };

    match write_chunks(&mut field, &staged.path, limit).await {
        Ok(()) => Ok(staged),
        Err(e) => {
            staged.discard().await;
            Err(e)
        }
    }
}

async fn import_staged(
    state: &AppState,
    staged: &StagedUpload,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    let bytes = tokio::fs::read(&staged.path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read staged upload: {e}")))?;
    let content =
        String::from_utf8(bytes).map_err(|_| ApiError::validation("File is not valid UTF-8"))?;

    let txn = state.store().begin().await?;
    let summary = state.importer().import_text(&txn, &content).await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::success(summary.movies).with_meta(json!({
        "imported": summary.imported,
        "total": summary.total,
    }))))
}

/// POST /movies/import
pub async fn import_movies(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    let config = &state.shared.config.import;

    let mut staged = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let mime = field.content_type().unwrap_or_default();
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if !essence.eq_ignore_ascii_case(ACCEPTED_MIME) {
            return Err(ApiError::UnsupportedMediaType(format!(
                "Only {ACCEPTED_MIME} files are accepted"
            )));
        }

        staged = Some(stage(field, Path::new(&config.upload_dir), config.max_upload_bytes).await?);
        break;
    }

    let staged = staged
        .ok_or_else(|| ApiError::validation(format!("No file uploaded in field '{UPLOAD_FIELD}'")))?;

    let result = import_staged(&state, &staged).await;
    staged.discard().await;
    result
}
