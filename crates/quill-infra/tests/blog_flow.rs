//! Listing and editing services running against the in-memory store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use quill_core::domain::User;
use quill_core::ports::{BaseRepository, PostRepository};
use quill_core::services::{CategoryForm, EditorService, ListingService, PostForm, Principal};
use quill_core::DomainError;
use quill_infra::InMemoryDatabase;

struct Blog {
    db: InMemoryDatabase,
    listing: ListingService,
    editor: EditorService,
    staff: Principal,
}

async fn blog() -> Blog {
    let db = InMemoryDatabase::new();
    let user = db
        .users()
        .create(User::new("editor@example.com".into(), "hash".into(), true))
        .await
        .unwrap();

    let listing = ListingService::new(Arc::new(db.posts()), Arc::new(db.categories()));
    let editor = EditorService::new(
        Arc::new(db.categories()),
        Arc::new(db.posts()),
        Arc::new(db.users()),
    );

    Blog {
        db,
        listing,
        editor,
        staff: Principal {
            user_id: user.id,
            is_staff: true,
        },
    }
}

fn category(name: &str) -> CategoryForm {
    CategoryForm {
        name: name.to_string(),
        description: String::new(),
    }
}

fn post(title: &str, category_id: i32) -> PostForm {
    PostForm {
        title: title.to_string(),
        content: format!("{title} body"),
        category_id,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_fetch_counts_each_view_once() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    let hello = blog.editor.create_post(&blog.staff, post("Hello", tech.id)).await.unwrap();
    assert_eq!(hello.views, 0);

    let first = blog.listing.fetch_post(hello.id).await.unwrap();
    assert_eq!(first.views, 1);
    let stored = blog.db.posts().find_by_id(hello.id).await.unwrap().unwrap();
    assert_eq!(stored.views, 1);

    let second = blog.listing.fetch_post(hello.id).await.unwrap();
    assert_eq!(second.views, 2);

    // Listing does not count as a view.
    let page = blog.listing.list_all(1).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Hello");
    assert_eq!(page.items[0].views, 2);

    let missing = blog.listing.list_by_category(2, 1).await;
    assert!(matches!(
        missing,
        Err(DomainError::NotFound {
            entity_type: "Category",
            ..
        })
    ));
}

#[tokio::test]
async fn test_fetch_missing_post_is_not_found() {
    let blog = blog().await;
    assert!(matches!(
        blog.listing.fetch_post(404).await,
        Err(DomainError::NotFound {
            entity_type: "Post",
            ..
        })
    ));
}

#[tokio::test]
async fn test_empty_category_lists_nothing() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    let empty = blog.editor.create_category(&blog.staff, category("Empty")).await.unwrap();
    blog.editor.create_post(&blog.staff, post("Hello", tech.id)).await.unwrap();

    let (found, page) = blog.listing.list_by_category(empty.id, 1).await.unwrap();
    assert_eq!(found.name, "Empty");
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_list_by_category_filters_and_orders() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    let life = blog.editor.create_category(&blog.staff, category("Life")).await.unwrap();

    let now = Utc::now();
    for (i, cat) in [tech.id, life.id, tech.id, tech.id].into_iter().enumerate() {
        let mut form = post(&format!("post {i}"), cat);
        form.created_at = Some(now - TimeDelta::hours(i as i64));
        blog.editor.create_post(&blog.staff, form).await.unwrap();
    }

    let (_, page) = blog.listing.list_by_category(tech.id, 1).await.unwrap();
    let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["post 0", "post 2", "post 3"]);
}

#[tokio::test]
async fn test_list_all_is_newest_first_and_paginated() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();

    let now = Utc::now();
    // Inserted oldest first so storage order differs from the listing order.
    for i in (0..23).rev() {
        let mut form = post(&format!("post {i}"), tech.id);
        form.created_at = Some(now - TimeDelta::minutes(i));
        blog.editor.create_post(&blog.staff, form).await.unwrap();
    }

    let first = blog.listing.list_all(1).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages(), 3);
    assert!(
        first
            .items
            .windows(2)
            .all(|w| w[0].created_at > w[1].created_at)
    );
    assert_eq!(first.items[0].title, "post 0");

    let last = blog.listing.list_all(3).await.unwrap();
    assert_eq!(last.items.len(), 3);
    assert_eq!(last.items[2].title, "post 22");

    assert!(matches!(
        blog.listing.list_all(4).await,
        Err(DomainError::NotFound { entity_type: "Page", .. })
    ));
    assert!(matches!(
        blog.listing.list_all(0).await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn test_first_page_of_empty_blog_exists() {
    let blog = blog().await;
    let page = blog.listing.list_all(1).await.unwrap();
    assert!(page.items.is_empty());
    assert!(blog.listing.list_all(2).await.is_err());
}

#[tokio::test]
async fn test_unaddressable_page_is_not_found() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    blog.editor.create_post(&blog.staff, post("only", tech.id)).await.unwrap();

    assert!(matches!(
        blog.listing.list_all(u64::MAX).await,
        Err(DomainError::NotFound { entity_type: "Page", .. })
    ));
    assert!(matches!(
        blog.listing.list_by_category(tech.id, u64::MAX).await,
        Err(DomainError::NotFound { entity_type: "Page", .. })
    ));
    assert!(matches!(
        blog.listing.list_by_category(tech.id + 1, u64::MAX).await,
        Err(DomainError::NotFound { entity_type: "Category", .. })
    ));
}

#[tokio::test]
async fn test_configured_page_size_applies_to_both_listings() {
    let blog = blog().await;
    let listing = blog.listing.clone().with_page_size(2);
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    for i in 0..3 {
        blog.editor
            .create_post(&blog.staff, post(&format!("post {i}"), tech.id))
            .await
            .unwrap();
    }

    assert_eq!(listing.list_all(1).await.unwrap().items.len(), 2);
    let (_, page) = listing.list_by_category(tech.id, 2).await.unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_spoofed_author_is_ignored() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();

    let mut form = post("Mine", tech.id);
    form.author_id = Some(Uuid::new_v4());
    let created = blog.editor.create_post(&blog.staff, form).await.unwrap();
    assert_eq!(created.author_id, blog.staff.user_id);

    // A second staff member edits and tries to claim the post.
    let other = blog
        .db
        .users()
        .create(User::new("other@example.com".into(), "hash".into(), true))
        .await
        .unwrap();
    let other = Principal {
        user_id: other.id,
        is_staff: true,
    };
    let mut form = post("Still mine", tech.id);
    form.author_id = Some(other.user_id);
    let edited = blog.editor.update_post(&other, created.id, form).await.unwrap();

    assert_eq!(edited.title, "Still mine");
    assert_eq!(edited.author_id, blog.staff.user_id);
}

#[tokio::test]
async fn test_edit_preserves_views_and_creation_time() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    let created = blog.editor.create_post(&blog.staff, post("Hello", tech.id)).await.unwrap();
    blog.listing.fetch_post(created.id).await.unwrap();

    let edited = blog
        .editor
        .update_post(&blog.staff, created.id, post("Hello again", tech.id))
        .await
        .unwrap();

    assert_eq!(edited.views, 1);
    assert_eq!(edited.created_at, created.created_at);
    assert!(edited.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_post_needs_existing_category() {
    let blog = blog().await;
    assert!(matches!(
        blog.editor.create_post(&blog.staff, post("Orphan", 9)).await,
        Err(DomainError::IntegrityViolation(_))
    ));
}

#[tokio::test]
async fn test_principal_must_exist_to_author() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    let ghost = Principal {
        user_id: Uuid::new_v4(),
        is_staff: true,
    };
    assert!(matches!(
        blog.editor.create_post(&ghost, post("Boo", tech.id)).await,
        Err(DomainError::IntegrityViolation(_))
    ));
}

#[tokio::test]
async fn test_non_staff_cannot_edit() {
    let blog = blog().await;
    let reader = Principal {
        user_id: blog.staff.user_id,
        is_staff: false,
    };
    assert!(matches!(
        blog.editor.create_category(&reader, category("Nope")).await,
        Err(DomainError::Forbidden)
    ));
}

#[tokio::test]
async fn test_category_update_keeps_creation_time() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();

    let renamed = blog
        .editor
        .update_category(
            &blog.staff,
            tech.id,
            CategoryForm {
                name: "Technology".to_string(),
                description: "Gadgets".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(renamed.name, "Technology");
    assert_eq!(renamed.description, "Gadgets");
    assert_eq!(renamed.created_at, tech.created_at);
}

#[tokio::test]
async fn test_category_delete_requires_confirmation() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    blog.editor.create_post(&blog.staff, post("One", tech.id)).await.unwrap();
    blog.editor.create_post(&blog.staff, post("Two", tech.id)).await.unwrap();

    let refused = blog.editor.delete_category(&blog.staff, tech.id, false).await;
    assert!(matches!(refused, Err(DomainError::Conflict(_))));
    assert_eq!(blog.db.posts().count_by_category(tech.id).await.unwrap(), 2);

    let removed = blog.editor.delete_category(&blog.staff, tech.id, true).await.unwrap();
    assert_eq!(removed, 2);
    assert!(matches!(
        blog.listing.list_by_category(tech.id, 1).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(blog.listing.list_all(1).await.unwrap().items.is_empty());
}

#[tokio::test]
async fn test_empty_category_deletes_without_confirmation() {
    let blog = blog().await;
    let tech = blog.editor.create_category(&blog.staff, category("Tech")).await.unwrap();
    assert_eq!(
        blog.editor.delete_category(&blog.staff, tech.id, false).await.unwrap(),
        0
    );
    assert!(blog.editor.list_categories(&blog.staff).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_post() {
    let blog = blog().await;
    assert!(matches!(
        blog.editor.delete_post(&blog.staff, 1).await,
        Err(DomainError::NotFound { entity_type: "Post", .. })
    ));
}
