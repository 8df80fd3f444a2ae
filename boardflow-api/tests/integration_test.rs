/// Integration tests for the BoardFlow API
///
/// These tests verify the full system works end-to-end:
/// - Registration, login, and refresh-token rotation
/// - Board/column/task CRUD with owner scoping
/// - Append ordering and adjacent-column moves
/// - Cascade deletion
///
/// They require a PostgreSQL instance; set `TEST_DATABASE_URL` to run
/// them. When the variable is unset every test returns early.
mod common;

use axum::http::StatusCode;
use boardflow_shared::models::task::Task;
use common::{
    create_test_board, create_test_column, create_test_task, expect_json, TestContext,
    TEST_PASSWORD,
};
use serde_json::json;
use uuid::Uuid;

/// Register, login, then refresh; each step yields a usable token pair
#[tokio::test]
async fn test_auth_flow() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let username = format!("flow-{}", Uuid::new_v4());

    let response = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({"username": username, "password": TEST_PASSWORD})),
        )
        .await;
    let body = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(body["user"]["username"], username);
    assert!(body["user"].get("password_hash").is_none());

    let response = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"username": username, "password": TEST_PASSWORD})),
        )
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();
    assert!(body["access_token"].is_string());

    // The refresh token rides the Authorization header and rotates the pair
    let response = ctx
        .request("POST", "/auth/refresh", Some(&refresh_token), None)
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    ctx.cleanup().await.unwrap();
}

/// A second registration with the same username is a 400
#[tokio::test]
async fn test_register_duplicate_username() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let username = format!("dup-{}", Uuid::new_v4());
    let body = json!({"username": username, "password": TEST_PASSWORD});

    let response = ctx
        .request("POST", "/auth/register", None, Some(body.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx.request("POST", "/auth/register", None, Some(body)).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["message"], "Username already taken");

    ctx.cleanup().await.unwrap();
}

/// Unknown username and wrong password produce the same 401
#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let response = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"username": ctx.user.username, "password": "not-the-password"})),
        )
        .await;
    let wrong_password = expect_json(response, StatusCode::UNAUTHORIZED).await;

    let response = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"username": format!("ghost-{}", Uuid::new_v4()), "password": TEST_PASSWORD})),
        )
        .await;
    let unknown_user = expect_json(response, StatusCode::UNAUTHORIZED).await;

    assert_eq!(wrong_password["message"], unknown_user["message"]);

    ctx.cleanup().await.unwrap();
}

/// Board routes require an access token
#[tokio::test]
async fn test_authentication_required() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let response = ctx.request("GET", "/boards", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A refresh token is not an access token
    let refresh = {
        use boardflow_shared::auth::jwt::{create_token, Claims, TokenType};
        create_token(
            &Claims::new(ctx.user.id, TokenType::Refresh),
            common::TEST_JWT_SECRET,
        )
        .unwrap()
    };
    let response = ctx.request("GET", "/boards", Some(&refresh), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Board create/list/delete round trip through the API
#[tokio::test]
async fn test_board_crud() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let response = ctx
        .authed("POST", "/boards", Some(json!({"title": "Sprint 42"})))
        .await;
    let board = expect_json(response, StatusCode::CREATED).await;
    let board_id = board["id"].as_str().unwrap().to_string();
    assert_eq!(board["title"], "Sprint 42");

    let response = ctx.authed("GET", "/boards", None).await;
    let boards = expect_json(response, StatusCode::OK).await;
    assert!(boards
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["id"] == board_id.as_str()));

    let response = ctx
        .authed("DELETE", &format!("/boards/{board_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .authed("DELETE", &format!("/boards/{board_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// An empty title is rejected with a validation error
#[tokio::test]
async fn test_board_title_validation() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let response = ctx.authed("POST", "/boards", Some(json!({"title": ""}))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

/// Columns append densely: first is 0, then 1, 2, ...
#[tokio::test]
async fn test_column_append_positions() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Positions").await.unwrap();

    for (i, title) in ["Todo", "Doing", "Done"].iter().enumerate() {
        let response = ctx
            .authed(
                "POST",
                &format!("/boards/{}/columns", board.id),
                Some(json!({"title": title})),
            )
            .await;
        let column = expect_json(response, StatusCode::CREATED).await;
        assert_eq!(column["position"], i as i64);
    }

    let response = ctx
        .authed("GET", &format!("/boards/{}/columns", board.id), None)
        .await;
    let columns = expect_json(response, StatusCode::OK).await;
    let titles: Vec<&str> = columns
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Todo", "Doing", "Done"]);

    ctx.cleanup().await.unwrap();
}

/// Tasks append at the end of their column and list in display order
#[tokio::test]
async fn test_task_append_and_list() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Tasks").await.unwrap();
    let column = create_test_column(&ctx, board.id, "Todo").await.unwrap();

    let response = ctx
        .authed(
            "POST",
            &format!("/columns/{}/tasks", column.id),
            Some(json!({"title": "First", "priority": "high"})),
        )
        .await;
    let first = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(first["position"], 0);
    assert_eq!(first["priority"], "high");

    let response = ctx
        .authed(
            "POST",
            &format!("/columns/{}/tasks", column.id),
            Some(json!({"title": "Second"})),
        )
        .await;
    let second = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(second["position"], 1);
    // Priority defaults to low when omitted
    assert_eq!(second["priority"], "low");

    let response = ctx
        .authed("GET", &format!("/columns/{}/tasks", column.id), None)
        .await;
    let tasks = expect_json(response, StatusCode::OK).await;
    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);

    ctx.cleanup().await.unwrap();
}

/// Moving a task right appends it to the neighbor and renumbers the
/// source column densely from zero
#[tokio::test]
async fn test_move_task_right() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Move").await.unwrap();
    let todo = create_test_column(&ctx, board.id, "Todo").await.unwrap();
    let doing = create_test_column(&ctx, board.id, "Doing").await.unwrap();

    let a = create_test_task(&ctx, todo.id, "a").await.unwrap();
    let b = create_test_task(&ctx, todo.id, "b").await.unwrap();
    let c = create_test_task(&ctx, todo.id, "c").await.unwrap();
    let existing = create_test_task(&ctx, doing.id, "existing").await.unwrap();

    // Move the middle task; it should land after "existing"
    let response = ctx
        .authed(
            "POST",
            &format!("/tasks/{}/move", b.id),
            Some(json!({"direction": "right"})),
        )
        .await;
    let moved = expect_json(response, StatusCode::OK).await;
    assert_eq!(moved["column_id"], doing.id.to_string());
    assert_eq!(moved["position"], 1);

    // Source column closed the gap: a=0, c=1
    let remaining = Task::list_for_column(&ctx.db, todo.id).await.unwrap();
    assert_eq!(
        remaining.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![a.id, c.id]
    );
    assert_eq!(
        remaining.iter().map(|t| t.position).collect::<Vec<_>>(),
        vec![0, 1]
    );

    // Target column kept its task untouched
    let target = Task::list_for_column(&ctx.db, doing.id).await.unwrap();
    assert_eq!(
        target.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![existing.id, b.id]
    );

    ctx.cleanup().await.unwrap();
}

/// Moving past the edge is a 400 and leaves the board untouched
#[tokio::test]
async fn test_move_task_at_edge() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Edge").await.unwrap();
    let only = create_test_column(&ctx, board.id, "Only").await.unwrap();
    let task = create_test_task(&ctx, only.id, "stuck").await.unwrap();

    for direction in ["left", "right"] {
        let response = ctx
            .authed(
                "POST",
                &format!("/tasks/{}/move", task.id),
                Some(json!({"direction": direction})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let unchanged = Task::find_owned(&ctx.db, task.id, ctx.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.column_id, only.id);
    assert_eq!(unchanged.position, task.position);

    ctx.cleanup().await.unwrap();
}

/// An explicit null clears description/deadline; an absent field keeps them
#[tokio::test]
async fn test_update_task_null_clears_nullable_fields() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Nullable").await.unwrap();
    let column = create_test_column(&ctx, board.id, "Todo").await.unwrap();

    let response = ctx
        .authed(
            "POST",
            &format!("/columns/{}/tasks", column.id),
            Some(json!({
                "title": "Write docs",
                "description": "notes",
                "deadline": "2026-09-15T12:00:00Z"
            })),
        )
        .await;
    let task = expect_json(response, StatusCode::CREATED).await;
    let task_id = task["id"].as_str().unwrap().to_string();

    // Omitting both fields leaves them alone
    let response = ctx
        .authed(
            "PUT",
            &format!("/tasks/{task_id}"),
            Some(json!({"title": "renamed"})),
        )
        .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert_eq!(updated["description"], "notes");
    assert!(updated["deadline"].is_string());

    // Explicit null clears the deadline but not the untouched description
    let response = ctx
        .authed(
            "PUT",
            &format!("/tasks/{task_id}"),
            Some(json!({"deadline": null})),
        )
        .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert!(updated["deadline"].is_null());
    assert_eq!(updated["description"], "notes");

    let response = ctx
        .authed(
            "PUT",
            &format!("/tasks/{task_id}"),
            Some(json!({"description": null})),
        )
        .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert!(updated["description"].is_null());

    ctx.cleanup().await.unwrap();
}

/// PUT position overwrites verbatim; siblings keep their positions and a
/// collision still lists deterministically via the id tie-break
#[tokio::test]
async fn test_reorder_task_position_verbatim() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Reorder").await.unwrap();
    let column = create_test_column(&ctx, board.id, "Todo").await.unwrap();

    let a = create_test_task(&ctx, column.id, "a").await.unwrap();
    let b = create_test_task(&ctx, column.id, "b").await.unwrap();
    let c = create_test_task(&ctx, column.id, "c").await.unwrap();

    // Collide c with a at position 0; nothing gets renumbered
    let response = ctx
        .authed(
            "PUT",
            &format!("/tasks/{}", c.id),
            Some(json!({"position": 0})),
        )
        .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert_eq!(updated["position"], 0);

    let tasks = Task::list_for_column(&ctx.db, column.id).await.unwrap();
    let positions: Vec<(Uuid, i32)> = tasks.iter().map(|t| (t.id, t.position)).collect();
    assert!(positions.contains(&(a.id, 0)));
    assert!(positions.contains(&(b.id, 1)));
    assert!(positions.contains(&(c.id, 0)));

    // The two tasks at position 0 order by id; b follows at position 1
    let mut zeros = vec![a.id, c.id];
    zeros.sort();
    assert_eq!(
        tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![zeros[0], zeros[1], b.id]
    );

    ctx.cleanup().await.unwrap();
}

/// PUT /columns position is also a verbatim overwrite, gaps included
#[tokio::test]
async fn test_reorder_column_position_verbatim() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Sparse").await.unwrap();
    let x = create_test_column(&ctx, board.id, "x").await.unwrap();
    let y = create_test_column(&ctx, board.id, "y").await.unwrap();
    let z = create_test_column(&ctx, board.id, "z").await.unwrap();

    let response = ctx
        .authed(
            "PUT",
            &format!("/columns/{}", x.id),
            Some(json!({"position": 9})),
        )
        .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert_eq!(updated["position"], 9);

    // Siblings keep their positions; x sorts last with its sparse key
    let response = ctx
        .authed("GET", &format!("/boards/{}/columns", board.id), None)
        .await;
    let columns = expect_json(response, StatusCode::OK).await;
    let listed: Vec<(String, i64)> = columns
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["id"].as_str().unwrap().to_string(),
                c["position"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        listed,
        vec![
            (y.id.to_string(), 1),
            (z.id.to_string(), 2),
            (x.id.to_string(), 9),
        ]
    );

    ctx.cleanup().await.unwrap();
}

/// PUT /tasks reparents verbatim when given a column_id
#[tokio::test]
async fn test_update_task_reparent() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Reparent").await.unwrap();
    let from = create_test_column(&ctx, board.id, "From").await.unwrap();
    let to = create_test_column(&ctx, board.id, "To").await.unwrap();
    let task = create_test_task(&ctx, from.id, "mover").await.unwrap();

    let response = ctx
        .authed(
            "PUT",
            &format!("/tasks/{}", task.id),
            Some(json!({"column_id": to.id, "position": 5, "title": "renamed"})),
        )
        .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert_eq!(updated["column_id"], to.id.to_string());
    assert_eq!(updated["position"], 5);
    assert_eq!(updated["title"], "renamed");

    // Reparenting into a column on someone else's board is a 404
    let other = TestContext::create_user(&ctx.db, &format!("other-{}", Uuid::new_v4()))
        .await
        .unwrap();
    let other_board = boardflow_shared::models::board::Board::create(&ctx.db, other.id, "Theirs")
        .await
        .unwrap();
    let other_column = create_test_column(&ctx, other_board.id, "Hidden")
        .await
        .unwrap();

    let response = ctx
        .authed(
            "PUT",
            &format!("/tasks/{}", task.id),
            Some(json!({"column_id": other_column.id})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(other.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Another user's resources look like missing resources, never a 403
#[tokio::test]
async fn test_cross_user_isolation() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Private").await.unwrap();
    let column = create_test_column(&ctx, board.id, "Secrets").await.unwrap();
    let task = create_test_task(&ctx, column.id, "hidden").await.unwrap();

    let other = TestContext::create_user(&ctx.db, &format!("intruder-{}", Uuid::new_v4()))
        .await
        .unwrap();
    let other_token = TestContext::access_token_for(other.id).unwrap();

    let attempts = [
        ("GET", format!("/boards/{}/columns", board.id)),
        ("DELETE", format!("/boards/{}", board.id)),
        ("PUT", format!("/columns/{}", column.id)),
        ("GET", format!("/columns/{}/tasks", column.id)),
        ("DELETE", format!("/tasks/{}", task.id)),
        ("POST", format!("/tasks/{}/move", task.id)),
    ];

    for (method, uri) in attempts {
        let body = match method {
            "PUT" => Some(json!({"title": "stolen"})),
            "POST" => Some(json!({"direction": "right"})),
            _ => None,
        };
        let response = ctx.request(method, &uri, Some(&other_token), body).await;
        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "{method} {uri} should 404 for a non-owner"
        );
    }

    // Everything is still there for the owner
    assert!(Task::find_owned(&ctx.db, task.id, ctx.user.id)
        .await
        .unwrap()
        .is_some());

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(other.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Deleting a board cascades through columns to tasks
#[tokio::test]
async fn test_board_delete_cascades() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let board = create_test_board(&ctx, "Doomed").await.unwrap();
    let column = create_test_column(&ctx, board.id, "Gone").await.unwrap();
    let task = create_test_task(&ctx, column.id, "lost").await.unwrap();

    let response = ctx
        .authed("DELETE", &format!("/boards/{}", board.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE id = $1")
        .bind(task.id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM columns WHERE id = $1")
        .bind(column.id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);

    ctx.cleanup().await.unwrap();
}

/// Health endpoint reports a connected database
#[tokio::test]
async fn test_health_check() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let response = ctx.request("GET", "/health", None, None).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}
