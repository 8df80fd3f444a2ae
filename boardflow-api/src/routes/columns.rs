/// Column endpoints
///
/// - `GET /boards/{id}/columns` - list a board's columns in display order
/// - `POST /boards/{id}/columns` - append a column to a board
/// - `PUT /columns/{id}` - rename and/or reposition a column
/// - `DELETE /columns/{id}` - delete a column (cascades to its tasks)
///
/// Creation appends at the end of the board (`max(position) + 1`). A
/// position supplied to PUT is written verbatim with no renumbering of
/// sibling columns.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use boardflow_shared::{
    auth::middleware::AuthUser,
    models::{
        board::Board,
        column::{Column, UpdateColumn},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create-column request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    /// Column title
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
}

/// Update-column request; omitted fields keep their current values
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateColumnRequest {
    /// New title
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    /// New position, overwritten verbatim
    pub position: Option<i32>,
}

/// Lists a board's columns in display order
pub async fn list_columns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Column>>> {
    // Ownership resolves first; the board must be the caller's.
    Board::find_owned(&state.db, board_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    let columns = Column::list_for_board(&state.db, board_id).await?;
    Ok(Json(columns))
}

/// Appends a column to the end of a board
pub async fn create_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    req.validate()?;

    Board::find_owned(&state.db, board_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    let column = Column::create(&state.db, board_id, &req.title).await?;

    Ok((StatusCode::CREATED, Json(column)))
}

/// Renames and/or repositions a column
pub async fn update_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateColumnRequest>,
) -> ApiResult<Json<Column>> {
    req.validate()?;

    let column = Column::update_owned(
        &state.db,
        id,
        auth.user_id,
        UpdateColumn {
            title: req.title,
            position: req.position,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    Ok(Json(column))
}

/// Deletes a column, cascading to its tasks
pub async fn delete_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Column::delete_owned(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Column not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Column deleted")))
}
