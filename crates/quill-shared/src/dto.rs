//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category as shown to readers and editors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

/// A post as shown to readers and editors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub created_at: String,
    pub updated_at: String,
    pub category_id: i32,
    pub author_id: String,
    pub views: u32,
}

/// One page of posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPageResponse {
    pub posts: Vec<PostResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// One page of a category's posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPostsResponse {
    pub category: CategoryResponse,
    #[serde(flatten)]
    pub page: PostPageResponse,
}

/// Create or edit a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Create or edit a post.
///
/// `author_id` is accepted for compatibility with generic editors but the
/// server decides authorship itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub category_id: i32,
    #[serde(default)]
    pub author_id: Option<Uuid>,
}

/// Result of a category deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDeletedResponse {
    pub id: i32,
    pub posts_removed: u64,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub is_staff: bool,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_optional_fields_default() {
        let req: PostRequest = serde_json::from_str(
            r#"{"title":"Hello","content":"World","category_id":1}"#,
        )
        .unwrap();

        assert_eq!(req.excerpt, None);
        assert_eq!(req.created_at, None);
        assert_eq!(req.author_id, None);
    }

    #[test]
    fn test_category_posts_response_is_flat() {
        let body = CategoryPostsResponse {
            category: CategoryResponse {
                id: 1,
                name: "Tech".to_string(),
                description: String::new(),
                created_at: "2026-01-01T00:00:00+00:00".to_string(),
            },
            page: PostPageResponse {
                posts: vec![],
                page: 1,
                per_page: 10,
                total_items: 0,
                total_pages: 1,
                has_next: false,
                has_previous: false,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["category"]["name"], "Tech");
        assert_eq!(json["total_pages"], 1);
        assert!(json["posts"].as_array().unwrap().is_empty());
    }
}
