/// Task model and database operations
///
/// Tasks are the ordered children of a column. Creation appends at
/// `max(position) + 1` within the column; the adjacent-move operation
/// ([`Task::move_adjacent`]) relocates a task into the neighboring column of
/// its board and is the one place where positions get re-sequenced — and
/// only on the column the task left. Direct position updates overwrite the
/// value with no renumbering, mirroring the column behavior.
///
/// Ownership transits Task -> Column -> Board -> owner as an explicit join
/// chain in every query; a task reachable only through someone else's board
/// behaves like a missing task.
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::models::task::{CreateTask, Task};
/// use boardflow_shared::ordering::MoveDirection;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, column_id: Uuid, owner: Uuid) -> anyhow::Result<()> {
/// let task = Task::create(
///     &pool,
///     column_id,
///     CreateTask {
///         title: "Write the release notes".to_string(),
///         ..Default::default()
///     },
/// )
/// .await?;
///
/// // Move it into the column to the right, appending at the end.
/// let moved = Task::move_adjacent(&pool, task.id, owner, MoveDirection::Right).await?;
/// assert_ne!(moved.column_id, task.column_id);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::ordering::{self, MoveDirection, Slot};

/// Error type for the adjacent-move operation
#[derive(Debug, thiserror::Error)]
pub enum MoveTaskError {
    /// Task absent, or not reachable through a board the caller owns
    #[error("Task not found")]
    TaskNotFound,

    /// The task's column is already at the requested edge of the board
    #[error("No column to the {0} of this task's column")]
    NoAdjacentColumn(&'static str),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Priority tier of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    #[default]
    Low,
    Medium,
    High,
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Sort key within the column (see [`crate::ordering`])
    pub position: i32,

    /// Parent column
    pub column_id: Uuid,

    /// Optional due date
    pub deadline: Option<DateTime<Utc>>,

    /// Priority tier
    pub priority: TaskPriority,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date
    pub deadline: Option<DateTime<Utc>>,

    /// Priority tier (defaults to low)
    #[serde(default)]
    pub priority: TaskPriority,
}

/// Distinguishes an absent JSON field from an explicit `null`
///
/// Combined with `#[serde(default)]`: an absent field stays `None`, while
/// `null` becomes `Some(None)`. Needed for nullable columns where "leave it
/// alone" and "clear it" must be different requests.
pub fn deserialize_explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Input for updating a task; `None` fields keep their current value
///
/// A supplied `position` is written as-is with no renumbering of sibling
/// tasks. A supplied `column_id` reparents the task verbatim — callers must
/// have already confirmed the destination column is owned by the same user.
///
/// `description` and `deadline` are nullable in storage, so they are
/// presence-keyed: an absent field keeps the stored value, an explicit JSON
/// `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description; explicit `null` clears it
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub description: Option<Option<String>>,

    /// New position (overwritten verbatim)
    pub position: Option<i32>,

    /// New parent column (ownership checked by the caller)
    pub column_id: Option<Uuid>,

    /// New due date; explicit `null` clears it
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub deadline: Option<Option<DateTime<Utc>>>,

    /// New priority tier
    pub priority: Option<TaskPriority>,
}

const TASK_COLUMNS: &str =
    "id, title, description, position, column_id, deadline, priority, created_at, updated_at";

impl Task {
    /// Creates a task appended to the end of a column
    ///
    /// The append position is `COALESCE(MAX(position) + 1, 0)` over the
    /// column's current tasks, evaluated inside the INSERT. Concurrent
    /// appends can race on the max; accepted, as with columns.
    pub async fn create(
        pool: &PgPool,
        column_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, position, column_id, deadline, priority)
            VALUES (
                $1,
                $2,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM tasks WHERE column_id = $3),
                $3,
                $4,
                $5
            )
            RETURNING id, title, description, position, column_id, deadline, priority,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(column_id)
        .bind(data.deadline)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists a column's tasks in display order
    pub async fn list_for_column(pool: &PgPool, column_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, position, column_id, deadline, priority,
                   created_at, updated_at
            FROM tasks
            WHERE column_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(column_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by ID, scoped through column -> board -> owner
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.position, t.column_id, t.deadline,
                   t.priority, t.created_at, t.updated_at
            FROM tasks t
            JOIN columns c ON c.id = t.column_id
            JOIN boards b ON b.id = c.board_id
            WHERE t.id = $1 AND b.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task's fields, scoped to the owner
    ///
    /// Unset fields keep their current values; `updated_at` is bumped. The
    /// nullable fields (description, deadline) go through a presence flag so
    /// an explicit null overwrites instead of falling back to the stored
    /// value. Position and column are written verbatim (no renumbering, no
    /// count-append) — the destination column of a `column_id` change must
    /// already have passed the caller's ownership check.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks t
            SET title = COALESCE($3, t.title),
                description = CASE WHEN $4 THEN $5 ELSE t.description END,
                position = COALESCE($6, t.position),
                column_id = COALESCE($7, t.column_id),
                deadline = CASE WHEN $8 THEN $9 ELSE t.deadline END,
                priority = COALESCE($10, t.priority),
                updated_at = NOW()
            FROM columns c
            JOIN boards b ON b.id = c.board_id
            WHERE t.id = $1 AND c.id = t.column_id AND b.owner_id = $2
            RETURNING t.id, t.title, t.description, t.position, t.column_id, t.deadline,
                      t.priority, t.created_at, t.updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(data.title)
        .bind(data.description.is_some())
        .bind(data.description.flatten())
        .bind(data.position)
        .bind(data.column_id)
        .bind(data.deadline.is_some())
        .bind(data.deadline.flatten())
        .bind(data.priority)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task, scoped to the owner
    ///
    /// Surviving sibling tasks keep their positions (gaps are left in
    /// place). Returns false when no owned task matched.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING columns c, boards b
            WHERE t.id = $1
              AND c.id = t.column_id
              AND b.id = c.board_id
              AND b.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Moves a task into the adjacent column of its board
    ///
    /// Runs as a single transaction:
    ///
    /// 1. Resolve the task through the ownership join chain.
    /// 2. Order the board's columns by `(position, id)` and find the
    ///    neighbor in the requested direction. No neighbor means the task
    ///    is already at an edge: the transaction is dropped before any
    ///    write and state is untouched.
    /// 3. Reparent the task into the target column at position
    ///    `count(target's tasks)` — append-to-end, trusting the count as
    ///    the next free slot. The target's tasks are not renumbered.
    /// 4. Re-sequence the source column's remaining tasks to a dense
    ///    `0..N-1` in their existing display order.
    ///
    /// Returns the moved task as stored.
    pub async fn move_adjacent(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        direction: MoveDirection,
    ) -> Result<Self, MoveTaskError> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.position, t.column_id, t.deadline,
                   t.priority, t.created_at, t.updated_at
            FROM tasks t
            JOIN columns c ON c.id = t.column_id
            JOIN boards b ON b.id = c.board_id
            WHERE t.id = $1 AND b.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(MoveTaskError::TaskNotFound)?;

        let source_column = task.column_id;

        let board_id: Uuid = sqlx::query_scalar("SELECT board_id FROM columns WHERE id = $1")
            .bind(source_column)
            .fetch_one(&mut *tx)
            .await?;

        let column_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM columns WHERE board_id = $1 ORDER BY position, id",
        )
        .bind(board_id)
        .fetch_all(&mut *tx)
        .await?;

        let target_column = ordering::adjacent(&column_ids, source_column, direction)
            .ok_or(MoveTaskError::NoAdjacentColumn(direction.as_str()))?;

        let target_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE column_id = $1")
            .bind(target_column)
            .fetch_one(&mut *tx)
            .await?;

        let moved = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET column_id = $2, position = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(target_column)
        .bind(target_count as i32)
        .fetch_one(&mut *tx)
        .await?;

        // Close the gap the task left behind: dense 0..N-1 over the source
        // column's survivors, relative order preserved.
        let remaining: Vec<(Uuid, i32)> = sqlx::query_as(
            "SELECT id, position FROM tasks WHERE column_id = $1 ORDER BY position, id",
        )
        .bind(source_column)
        .fetch_all(&mut *tx)
        .await?;

        let slots: Vec<Slot> = remaining
            .into_iter()
            .map(|(id, position)| Slot { id, position })
            .collect();

        for (task_id, new_position) in ordering::resequence(&slots) {
            sqlx::query("UPDATE tasks SET position = $2 WHERE id = $1")
                .bind(task_id)
                .bind(new_position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            task_id = %moved.id,
            from = %source_column,
            to = %target_column,
            position = moved.position,
            "Task moved to adjacent column"
        );

        Ok(moved)
    }
}
