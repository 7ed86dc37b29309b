//! Post lifecycle: draft, published, archived, plus pin/solve flags and
//! community listing.

mod common;

use assert_matches::assert_matches;

use agora_core::content::ArchiveFilter;
use agora_core::error::CoreError;
use agora_core::post::PostStatus;
use agora_core::repository::{CommentRepository, PostRepository};
use agora_service::PostEdit;
use common::*;

#[tokio::test]
async fn create_starts_as_draft() {
    let (services, _) = setup();
    let post = draft_post(&services, "Draft").await;

    assert_eq!(post.status(), PostStatus::Draft);
    assert_eq!(post.author_id, AUTHOR);
    assert_eq!(post.comment_count, 0);
    assert_eq!(post.like_count, 0);
}

#[tokio::test]
async fn create_validates_title_and_body() {
    let (services, _) = setup();

    let no_title = services.posts.create(COMMUNITY, AUTHOR, " ", "body").await;
    assert_matches!(no_title, Err(CoreError::InvalidInput(_)));

    let long_title = "t".repeat(201);
    let too_long = services
        .posts
        .create(COMMUNITY, AUTHOR, &long_title, "body")
        .await;
    assert_matches!(too_long, Err(CoreError::InvalidInput(_)));

    let no_body = services.posts.create(COMMUNITY, AUTHOR, "Title", "").await;
    assert_matches!(no_body, Err(CoreError::ContentTooShort));

    let long_body = "b".repeat(50_001);
    let body_too_long = services
        .posts
        .create(COMMUNITY, AUTHOR, "Title", &long_body)
        .await;
    assert_matches!(body_too_long, Err(CoreError::ContentTooLong { max: 50_000 }));
}

#[tokio::test]
async fn update_requires_some_field() {
    let (services, _) = setup();
    let post = draft_post(&services, "Empty edit").await;

    let result = services
        .posts
        .update(post.id, EDITOR, PostEdit::default())
        .await;
    assert_matches!(result, Err(CoreError::InvalidInput(_)));
}

#[tokio::test]
async fn publish_is_one_way() {
    let (services, _) = setup();
    let post = draft_post(&services, "Publish").await;

    let published = services.posts.publish(post.id).await.unwrap();
    assert_eq!(published.status(), PostStatus::Published);
    assert!(published.published_at.is_some());

    let again = services.posts.publish(post.id).await;
    assert_matches!(again, Err(CoreError::PostAlreadyPublished(_)));
}

#[tokio::test]
async fn solving_requires_published_post() {
    let (services, _) = setup();
    let draft = draft_post(&services, "Question").await;

    let early = services.posts.set_solved(draft.id, true).await;
    assert_matches!(early, Err(CoreError::PostNotPublished(_)));

    services.posts.publish(draft.id).await.unwrap();
    let solved = services.posts.set_solved(draft.id, true).await.unwrap();
    assert!(solved.is_solved);

    let unsolved = services.posts.set_solved(draft.id, false).await.unwrap();
    assert!(!unsolved.is_solved);
}

#[tokio::test]
async fn archived_post_rejects_every_mutation() {
    let (services, _) = setup();
    let post = published_post(&services, "Archive me").await;
    services.posts.archive(post.id).await.unwrap();

    let edit = services
        .posts
        .update(
            post.id,
            EDITOR,
            PostEdit {
                content: Some("late edit".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(edit, Err(CoreError::CannotModifyArchivedPost(_)));

    let publish = services.posts.publish(post.id).await;
    assert_matches!(publish, Err(CoreError::CannotModifyArchivedPost(_)));

    let pin = services.posts.set_pinned(post.id, true).await;
    assert_matches!(pin, Err(CoreError::CannotModifyArchivedPost(_)));

    let solve = services.posts.set_solved(post.id, true).await;
    assert_matches!(solve, Err(CoreError::CannotModifyArchivedPost(_)));

    let archive = services.posts.archive(post.id).await;
    assert_matches!(archive, Err(CoreError::PostAlreadyArchived(_)));
}

#[tokio::test]
async fn store_archive_reports_whether_a_row_changed() {
    let (services, store) = setup();
    let post = published_post(&services, "Twice").await;
    let comment = top_level(&services, post.id, "twice").await;

    assert!(CommentRepository::archive(&*store, comment.id).await.unwrap());
    assert!(!CommentRepository::archive(&*store, comment.id).await.unwrap());
    assert!(PostRepository::archive(&*store, post.id).await.unwrap());
    assert!(!PostRepository::archive(&*store, post.id).await.unwrap());
}

#[tokio::test]
async fn archived_post_hidden_by_default() {
    let (services, _) = setup();
    let post = published_post(&services, "Hidden").await;
    services.posts.archive(post.id).await.unwrap();

    let default_read = services.posts.get(post.id, ArchiveFilter::ExcludeArchived).await;
    assert_matches!(default_read, Err(CoreError::PostNotFound(_)));

    let audit_read = services
        .posts
        .get(post.id, ArchiveFilter::IncludeArchived)
        .await
        .unwrap();
    assert_eq!(audit_read.status(), PostStatus::Archived);

    let view = services.posts.view(post.id).await;
    assert_matches!(view, Err(CoreError::PostNotFound(_)));
}

#[tokio::test]
async fn view_counts_each_read() {
    let (services, _) = setup();
    let post = published_post(&services, "Popular").await;

    services.posts.view(post.id).await.unwrap();
    let second = services.posts.view(post.id).await.unwrap();
    assert_eq!(second.view_count, 2);
}

#[tokio::test]
async fn listing_puts_pinned_first_then_newest() {
    let (services, _) = setup();
    let oldest = published_post(&services, "Oldest").await;
    let middle = published_post(&services, "Middle").await;
    let newest = published_post(&services, "Newest").await;
    services.posts.set_pinned(oldest.id, true).await.unwrap();

    let archived = published_post(&services, "Archived").await;
    services.posts.archive(archived.id).await.unwrap();

    let other_community = services
        .posts
        .create(COMMUNITY + 1, AUTHOR, "Elsewhere", "body")
        .await
        .unwrap();

    let listed = services
        .posts
        .list_by_community(COMMUNITY, ArchiveFilter::ExcludeArchived, 20, 0)
        .await
        .unwrap();
    let ids: Vec<i64> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![oldest.id, newest.id, middle.id]);
    assert!(!ids.contains(&other_community.id));

    let with_archived = services
        .posts
        .list_by_community(COMMUNITY, ArchiveFilter::IncludeArchived, 20, 0)
        .await
        .unwrap();
    assert_eq!(with_archived.len(), 4);

    let paged = services
        .posts
        .list_by_community(COMMUNITY, ArchiveFilter::ExcludeArchived, 1, 1)
        .await
        .unwrap();
    assert_eq!(paged[0].id, newest.id);
}
