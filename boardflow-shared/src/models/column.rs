/// Column model and database operations
///
/// Columns are the ordered children of a board. A new column is appended at
/// `max(position) + 1` (0 for an empty board), computed inside the INSERT so
/// the read and write share one statement. Direct position updates via
/// [`Column::update_owned`] overwrite the value verbatim and renumber
/// nothing — duplicate or sparse positions are reachable that way, and list
/// queries order by `(position, id)` to stay deterministic regardless.
///
/// Ownership is checked by joining through `boards.owner_id`; a column on
/// someone else's board behaves exactly like a missing column.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL,
///     position INTEGER NOT NULL DEFAULT 0,
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Column row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    /// Unique column ID (UUID v4)
    pub id: Uuid,

    /// Column title
    pub title: String,

    /// Sort key within the board (see [`crate::ordering`])
    pub position: i32,

    /// Parent board
    pub board_id: Uuid,

    /// When the column was created
    pub created_at: DateTime<Utc>,
}

/// Input for updating a column; `None` fields keep their current value
///
/// A supplied `position` is written as-is with no renumbering of sibling
/// columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateColumn {
    /// New title
    pub title: Option<String>,

    /// New position (overwritten verbatim)
    pub position: Option<i32>,
}

impl Column {
    /// Creates a column appended to the end of a board
    ///
    /// The append position is `COALESCE(MAX(position) + 1, 0)` over the
    /// board's current columns, evaluated in the same statement as the
    /// INSERT. Two concurrent appends can still race on the max; that
    /// window is accepted (no row locking).
    pub async fn create(pool: &PgPool, board_id: Uuid, title: &str) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (title, position, board_id)
            VALUES (
                $1,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM columns WHERE board_id = $2),
                $2
            )
            RETURNING id, title, position, board_id, created_at
            "#,
        )
        .bind(title)
        .bind(board_id)
        .fetch_one(pool)
        .await?;

        Ok(column)
    }

    /// Lists a board's columns in display order
    pub async fn list_for_board(pool: &PgPool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, title, position, board_id, created_at
            FROM columns
            WHERE board_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Finds a column by ID, scoped through its board's owner
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT c.id, c.title, c.position, c.board_id, c.created_at
            FROM columns c
            JOIN boards b ON b.id = c.board_id
            WHERE c.id = $1 AND b.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Updates a column's title and/or position, scoped to the owner
    ///
    /// Unset fields keep their current values via COALESCE. Position is
    /// overwritten verbatim; sibling columns are not renumbered. Returns
    /// `None` when no owned column matched.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateColumn,
    ) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            UPDATE columns c
            SET title = COALESCE($3, c.title),
                position = COALESCE($4, c.position)
            FROM boards b
            WHERE c.id = $1 AND b.id = c.board_id AND b.owner_id = $2
            RETURNING c.id, c.title, c.position, c.board_id, c.created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(data.title)
        .bind(data.position)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Deletes a column, scoped to the owner
    ///
    /// Tasks underneath go via the FK cascade. Surviving sibling columns
    /// keep their positions (gaps are left in place).
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM columns c
            USING boards b
            WHERE c.id = $1 AND b.id = c.board_id AND b.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
