/// Board model and database operations
///
/// A board is owned by exactly one user. Every read and mutation here is
/// filtered by `owner_id`, so a board that exists but belongs to someone
/// else is indistinguishable from a board that doesn't exist — the API
/// surfaces both as 404 to avoid leaking existence.
///
/// Deleting a board cascades to its columns and their tasks via the
/// `ON DELETE CASCADE` foreign keys in the schema.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Board row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID (UUID v4)
    pub id: Uuid,

    /// Board title
    pub title: String,

    /// Owning user
    pub owner_id: Uuid,

    /// When the board was created
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Creates a new board owned by `owner_id`
    pub async fn create(pool: &PgPool, owner_id: Uuid, title: &str) -> Result<Self, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (title, owner_id)
            VALUES ($1, $2)
            RETURNING id, title, owner_id, created_at
            "#,
        )
        .bind(title)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(board)
    }

    /// Lists all boards owned by a user, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, title, owner_id, created_at
            FROM boards
            WHERE owner_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Finds a board by ID, scoped to its owner
    ///
    /// Returns `None` both when the board doesn't exist and when it belongs
    /// to a different user.
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, title, owner_id, created_at
            FROM boards
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Deletes a board, scoped to its owner
    ///
    /// Columns and tasks underneath are removed by the FK cascade. Returns
    /// false when no owned board matched.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
