use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::spawn_extraction;
use crate::intake::resource::{RawFile, ResourceView};
use crate::intake::working_set::Admission;
use crate::state::AppState;

/// Multipart field name carrying an uploaded resume.
pub const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct ResourceListResponse {
    pub resources: Vec<ResourceView>,
}

/// POST /api/v1/resources
/// Every `file` field is offered to the working set in order. Accepted files
/// start extracting in the background; rejected ones come back as failed.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResourceListResponse>), AppError> {
    let mut admitted = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("File field has no filename".to_string()))?;
        let mime = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;

        let admission = state.workspace.admit(RawFile::new(filename, mime, bytes)).await;
        if let Admission::Accepted(id) = admission {
            spawn_extraction(state.workspace.clone(), state.extractor.clone(), id);
        }
        admitted.push(admission.id());
    }

    if admitted.is_empty() {
        return Err(AppError::Validation(format!(
            "No '{FILE_FIELD}' fields found in upload"
        )));
    }
    info!("Upload processed: {} file(s)", admitted.len());

    let mut resources = Vec::with_capacity(admitted.len());
    for id in admitted {
        if let Some(resource) = state.workspace.get(id).await {
            resources.push(ResourceView::summary(&resource));
        }
    }
    Ok((StatusCode::CREATED, Json(ResourceListResponse { resources })))
}

/// GET /api/v1/resources
pub async fn handle_list_resources(State(state): State<AppState>) -> Json<ResourceListResponse> {
    let resources = state
        .workspace
        .snapshot()
        .await
        .iter()
        .map(ResourceView::summary)
        .collect();
    Json(ResourceListResponse { resources })
}

/// GET /api/v1/resources/:id
pub async fn handle_get_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResourceView>, AppError> {
    let resource = state
        .workspace
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resource {id} not found")))?;
    Ok(Json(ResourceView::detailed(&resource)))
}

/// DELETE /api/v1/resources/:id
pub async fn handle_delete_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .workspace
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resource {id} not found")))?;
    info!("Removed '{}' ({id})", removed.label());
    Ok(StatusCode::NO_CONTENT)
}
