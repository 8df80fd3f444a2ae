/// Board endpoints
///
/// - `GET /boards` - list the caller's boards
/// - `POST /boards` - create a board
/// - `DELETE /boards/{id}` - delete a board (cascades to columns and tasks)
///
/// All operations are scoped to the authenticated user; a board owned by
/// someone else returns 404.
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
use boardflow_shared::{auth::middleware::AuthUser, models::board::Board};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create-board request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Board title
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
}

/// Lists all boards owned by the caller
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = Board::list_by_owner(&state.db, auth.user_id).await?;
    Ok(Json(boards))
}

/// Creates a new board owned by the caller
pub async fn create_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    req.validate()?;

    let board = Board::create(&state.db, auth.user_id, &req.title).await?;

    tracing::info!(board_id = %board.id, owner = %auth.user_id, "Board created");

    Ok((StatusCode::CREATED, Json(board)))
}

/// Deletes a board, cascading to its columns and their tasks
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Board::delete_owned(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Board not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Board deleted")))
}
