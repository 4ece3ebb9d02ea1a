//! Domain records to wire documents.

use quill_core::Page;
use quill_core::domain::{Category, Post, User};
use quill_shared::dto::{
    CategoryPostsResponse, CategoryResponse, PostPageResponse, PostResponse, UserResponse,
};

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        description: category.description,
        created_at: category.created_at.to_rfc3339(),
    }
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        excerpt: post.excerpt,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
        category_id: post.category_id,
        author_id: post.author_id.to_string(),
        views: post.views,
    }
}

pub fn post_page(page: Page<Post>) -> PostPageResponse {
    PostPageResponse {
        page: page.number,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages(),
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        posts: page.items.into_iter().map(post).collect(),
    }
}

pub fn category_posts(found: Category, page: Page<Post>) -> CategoryPostsResponse {
    CategoryPostsResponse {
        category: category(found),
        page: post_page(page),
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email,
        is_staff: user.is_staff,
    }
}
