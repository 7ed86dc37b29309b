//! HTTP-level tests for threaded comments.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn reply_to_reply_is_rejected() {
    let app = build_test_app();
    let post_id = published_post(&app, "Thread", "body").await;

    let c1 = comment(&app, post_id, AUTHOR, "top", None).await;
    let c2 = comment(&app, post_id, READER, "reply", Some(c1)).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/posts/{post_id}/comments"),
        READER,
        json!({ "content": "too deep", "parent_id": c2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "MAX_NESTING_DEPTH_EXCEEDED");

    let post = body_json(get_as(app, &format!("/api/v1/posts/{post_id}"), READER).await).await;
    assert_eq!(post["data"]["comment_count"], 2);
}

#[tokio::test]
async fn list_returns_nested_tree() {
    let app = build_test_app();
    let post_id = published_post(&app, "Tree", "body").await;
    let a = comment(&app, post_id, AUTHOR, "a", None).await;
    let b = comment(&app, post_id, AUTHOR, "b", None).await;
    let a1 = comment(&app, post_id, READER, "a1", Some(a)).await;

    let tree = body_json(
        get_as(app, &format!("/api/v1/posts/{post_id}/comments"), READER).await,
    )
    .await;
    let roots = tree["data"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["id"], a);
    assert_eq!(roots[0]["replies"][0]["id"], a1);
    assert_eq!(roots[1]["id"], b);
    assert!(roots[1]["replies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn archived_comment_is_tombstoned_in_listing() {
    let app = build_test_app();
    let post_id = published_post(&app, "Tombstone", "body").await;
    let parent = comment(&app, post_id, AUTHOR, "parent", None).await;
    comment(&app, post_id, READER, "child", Some(parent)).await;

    let archived = delete(app.clone(), &format!("/api/v1/comments/{parent}"), AUTHOR).await;
    assert_eq!(archived.status(), StatusCode::NO_CONTENT);

    let uri = format!("/api/v1/posts/{post_id}/comments");
    let visible = body_json(get_as(app.clone(), &uri, READER).await).await;
    assert_eq!(visible["data"][0]["content"], "");
    assert_eq!(visible["data"][0]["replies"][0]["content"], "child");

    let audit = body_json(get_as(app, &format!("{uri}?include_archived=true"), READER).await).await;
    assert_eq!(audit["data"][0]["content"], "parent");
}

#[tokio::test]
async fn create_validates_before_lookup() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/v1/posts/999/comments",
        AUTHOR,
        json!({ "content": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CONTENT_TOO_SHORT");
}

#[tokio::test]
async fn update_records_history_and_restore_works() {
    let app = build_test_app();
    let post_id = published_post(&app, "Edits", "body").await;
    let id = comment(&app, post_id, AUTHOR, "first", None).await;
    let uri = format!("/api/v1/comments/{id}");

    let updated = put_json(app.clone(), &uri, AUTHOR, json!({ "content": "second" })).await;
    assert_eq!(body_json(updated).await["data"]["content"], "second");

    let history = body_json(get_as(app.clone(), &format!("{uri}/versions"), READER).await).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 2);

    let restored = post_empty(app.clone(), &format!("{uri}/restore/1"), AUTHOR).await;
    assert_eq!(body_json(restored).await["data"]["content"], "first");

    let compared = body_json(
        get_as(app, &format!("{uri}/compare?old=2&new=3"), READER).await,
    )
    .await;
    assert_eq!(compared["data"]["new_version"]["body"], "first");
    assert_eq!(compared["data"]["new_version"]["content"]["type"], "comment");
}

#[tokio::test]
async fn comments_on_archived_post_conflict() {
    let app = build_test_app();
    let post_id = published_post(&app, "Closed", "body").await;
    delete(app.clone(), &format!("/api/v1/posts/{post_id}"), AUTHOR).await;

    let response = post_json(
        app,
        &format!("/api/v1/posts/{post_id}/comments"),
        READER,
        json!({ "content": "late" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["code"],
        "CANNOT_COMMENT_ON_ARCHIVED_POST"
    );
}
