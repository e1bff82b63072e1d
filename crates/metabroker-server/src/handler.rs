//! Request handlers for the metadata HTTP surface.
//!
//! Every metadata route resolves its project from the `ActiveProjectID`
//! request header, checks the policy verdict for the operation, and
//! delegates to the service façade. Responses carry the project's full
//! current key list.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use metabroker_service::{MetadataPair, StoredMetadata};

use crate::auth::{self, authorize};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Request header naming the project a call operates on.
///
/// Sent as `ActiveProjectID`; lookup is case-insensitive.
pub const ACTIVE_PROJECT_ID: &str = "activeprojectid";

/// Body of a create/update call: a batch of pairs applied in order.
#[derive(Debug, Deserialize)]
pub struct CreateOrUpdateRequest {
    #[serde(default)]
    pub metadata: Vec<MetadataPair>,
}

/// Every metadata response: the project's full current key list.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub metadata: Vec<StoredMetadata>,
}

fn project_id_from(headers: &HeaderMap) -> ServerResult<String> {
    headers
        .get(ACTIVE_PROJECT_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ServerError::IncompleteRequest("missing ActiveProjectID metadata".into())
        })
}

/// Liveness probe.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

/// `GET /v1/metadata` -- the project's full key list.
pub async fn get_metadata(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServerResult<Json<MetadataResponse>> {
    let project_id = project_id_from(&headers)?;
    authorize(state.policy.as_ref(), auth::OP_GET, &project_id).await?;

    let metadata = state.service.get_all(&project_id)?;
    Ok(Json(MetadataResponse { metadata }))
}

/// `POST /v1/metadata` -- apply a batch of pairs, return the full key list.
pub async fn create_or_update_metadata(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateOrUpdateRequest>,
) -> ServerResult<Json<MetadataResponse>> {
    let project_id = project_id_from(&headers)?;
    authorize(
        state.policy.as_ref(),
        auth::OP_CREATE_OR_UPDATE,
        &project_id,
    )
    .await?;

    for pair in &request.metadata {
        state.service.create_or_update(&project_id, pair)?;
    }

    let metadata = state.service.get_all(&project_id)?;
    Ok(Json(MetadataResponse { metadata }))
}

/// `DELETE /v1/metadata?key=..&value=..` -- remove one value.
pub async fn delete_metadata(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pair): Query<MetadataPair>,
) -> ServerResult<Json<MetadataResponse>> {
    let project_id = project_id_from(&headers)?;
    authorize(state.policy.as_ref(), auth::OP_DELETE, &project_id).await?;

    let metadata = state.service.delete(&project_id, &pair)?;
    Ok(Json(MetadataResponse { metadata }))
}

/// `DELETE /v1/projects/{project_id}` -- remove a project's metadata.
///
/// The project comes from the path, not the `ActiveProjectID` header: the
/// caller here is the lifecycle notifier acting on a project that no
/// longer has active users.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ServerResult<Json<serde_json::Value>> {
    authorize(state.policy.as_ref(), auth::OP_DELETE_PROJECT, &project_id).await?;

    state.service.delete_project(&project_id)?;
    Ok(Json(json!({})))
}
