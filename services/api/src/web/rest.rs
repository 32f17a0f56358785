//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the `/selections/` REST collection and the
//! master definition for the OpenAPI specification.
//!
//! Reads are open to everyone. Writes sit behind `require_auth`, which puts the
//! caller's user id into the request extensions. Any authenticated user may
//! change or delete any selection.

use crate::error::ApiError;
use crate::web::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use selections_core::{validate_changes, validate_new_selection, Selection};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_selections_handler,
        retrieve_selection_handler,
        create_selection_handler,
        update_selection_handler,
        partial_update_selection_handler,
        delete_selection_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::delete_account_handler,
    ),
    components(
        schemas(SelectionResponse, SelectionRequest, SignupRequest, LoginRequest, AuthResponse)
    ),
    tags(
        (name = "Selections API", description = "Text selections recorded from PDF pages.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A selection as returned by every endpoint.
#[derive(Serialize, ToSchema)]
pub struct SelectionResponse {
    pub id: i64,
    pub owner: Uuid,
    pub pdf_name: String,
    pub page_number: i32,
    pub selected_text: String,
    #[schema(value_type = Object)]
    pub coordinates: Value,
    pub created_at: DateTime<Utc>,
}

impl From<Selection> for SelectionResponse {
    fn from(s: Selection) -> Self {
        Self {
            id: s.id,
            owner: s.owner,
            pdf_name: s.pdf_name,
            page_number: s.page_number,
            selected_text: s.selected_text,
            coordinates: s.coordinates,
            created_at: s.created_at,
        }
    }
}

/// Request body for create and update. PATCH accepts any subset.
///
/// Only used for the OpenAPI document; handlers validate the raw JSON.
#[derive(ToSchema)]
pub struct SelectionRequest {
    #[schema(max_length = 255)]
    pub pdf_name: String,
    pub page_number: i32,
    pub selected_text: String,
    #[schema(value_type = Object)]
    pub coordinates: Value,
}

//=========================================================================================
// Request Helpers
//=========================================================================================

/// Unknown or non-numeric ids are both "not found".
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::NotFound)
}

/// An empty body counts as `{}` so the field errors say what is missing.
pub(crate) fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("JSON parse error - {}", e)))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Index of the collections served by this API.
pub async fn api_root_handler() -> Json<Value> {
    Json(json!({ "selections": "/selections/" }))
}

/// List every selection.
#[utoipa::path(
    get,
    path = "/selections/",
    responses(
        (status = 200, description = "All selections, oldest first", body = [SelectionResponse])
    )
)]
pub async fn list_selections_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<SelectionResponse>>, ApiError> {
    let selections = app_state.selections.list().await?;
    Ok(Json(selections.into_iter().map(Into::into).collect()))
}

/// Fetch one selection.
#[utoipa::path(
    get,
    path = "/selections/{id}/",
    params(("id" = i64, Path, description = "Selection id")),
    responses(
        (status = 200, description = "The selection", body = SelectionResponse),
        (status = 404, description = "No such selection")
    )
)]
pub async fn retrieve_selection_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let id = parse_id(&id)?;
    let selection = app_state.selections.get(id).await?;
    Ok(Json(selection.into()))
}

/// Record a new selection owned by the caller.
#[utoipa::path(
    post,
    path = "/selections/",
    request_body = SelectionRequest,
    responses(
        (status = 201, description = "Selection created", body = SelectionResponse),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_selection_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    body: Bytes,
) -> Result<(StatusCode, Json<SelectionResponse>), ApiError> {
    let new = validate_new_selection(&parse_body(&body)?)?;
    let selection = app_state.selections.create(user_id, new).await?;
    info!(id = selection.id, "created selection {}", selection);
    Ok((StatusCode::CREATED, Json(selection.into())))
}

/// Replace all editable fields of a selection.
#[utoipa::path(
    put,
    path = "/selections/{id}/",
    params(("id" = i64, Path, description = "Selection id")),
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Selection updated", body = SelectionResponse),
        (status = 400, description = "Invalid or missing fields"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such selection")
    )
)]
pub async fn update_selection_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SelectionResponse>, ApiError> {
    apply_update(&app_state, user_id, &id, &body, false).await
}

/// Replace only the editable fields present in the body.
#[utoipa::path(
    patch,
    path = "/selections/{id}/",
    params(("id" = i64, Path, description = "Selection id")),
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Selection updated", body = SelectionResponse),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such selection")
    )
)]
pub async fn partial_update_selection_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SelectionResponse>, ApiError> {
    apply_update(&app_state, user_id, &id, &body, true).await
}

async fn apply_update(
    app_state: &AppState,
    user_id: Uuid,
    raw_id: &str,
    body: &Bytes,
    partial: bool,
) -> Result<Json<SelectionResponse>, ApiError> {
    let id = parse_id(raw_id)?;
    // A missing record is reported before any validation errors.
    app_state.selections.get(id).await?;

    let changes = validate_changes(&parse_body(body)?, partial)?;
    let selection = app_state.selections.update(id, changes).await?;
    info!(id, by = %user_id, partial, "updated selection {}", selection);
    Ok(Json(selection.into()))
}

/// Delete a selection.
#[utoipa::path(
    delete,
    path = "/selections/{id}/",
    params(("id" = i64, Path, description = "Selection id")),
    responses(
        (status = 204, description = "Selection deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such selection")
    )
)]
pub async fn delete_selection_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    app_state.selections.delete(id).await?;
    info!(id, by = %user_id, "deleted selection");
    Ok(StatusCode::NO_CONTENT)
}
