//! The editing surface: form handling for categories and posts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    CATEGORY_NAME_MAX_LEN, Category, EXCERPT_MAX_LEN, NewCategory, NewPost, Post, TITLE_MAX_LEN,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, CategoryRepository, PostRepository, UserRepository};

/// The authenticated identity performing a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub is_staff: bool,
}

/// Editable category fields.
#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

/// Editable post fields.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    /// Defaults to now on create; left unchanged on edit when absent.
    pub created_at: Option<DateTime<Utc>>,
    pub category_id: i32,
    /// Accepted from callers but never trusted; see [`assign_author`].
    pub author_id: Option<Uuid>,
}

/// Pre-save authorship rule.
///
/// A post being created is owned by the acting principal; an existing post
/// keeps its author. Whatever the caller put in the form is ignored.
pub fn assign_author(existing: Option<&Post>, principal: &Principal) -> Uuid {
    match existing {
        Some(post) => post.author_id,
        None => principal.user_id,
    }
}

/// Staff-only create/update/delete for categories and posts.
#[derive(Clone)]
pub struct EditorService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl EditorService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            categories,
            posts,
            users,
        }
    }

    pub async fn list_categories(&self, principal: &Principal) -> Result<Vec<Category>, DomainError> {
        require_staff(principal)?;
        Ok(self.categories.list_all().await?)
    }

    pub async fn create_category(
        &self,
        principal: &Principal,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        require_staff(principal)?;
        validate_category(&form)?;

        let category = self
            .categories
            .create(NewCategory::new(form.name.trim(), form.description))
            .await?;
        tracing::info!(category_id = category.id, name = %category, "Category created");
        Ok(category)
    }

    /// Update name and description. The creation timestamp is never touched.
    pub async fn update_category(
        &self,
        principal: &Principal,
        id: i32,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        require_staff(principal)?;
        validate_category(&form)?;

        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))?;
        category.name = form.name.trim().to_string();
        category.description = form.description;

        let category = self.categories.update(category).await?;
        tracing::info!(category_id = category.id, name = %category, "Category updated");
        Ok(category)
    }

    /// Delete a category.
    ///
    /// A category that still owns posts is only removed when `cascade` is set,
    /// and then its posts go with it. Returns the number of posts removed.
    pub async fn delete_category(
        &self,
        principal: &Principal,
        id: i32,
        cascade: bool,
    ) -> Result<u64, DomainError> {
        require_staff(principal)?;

        let category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))?;

        let dependents = self.posts.count_by_category(id).await?;
        if dependents > 0 && !cascade {
            return Err(DomainError::Conflict(format!(
                "category '{category}' still has {dependents} post(s); confirm the cascade to delete them too"
            )));
        }

        let removed = if dependents > 0 {
            self.categories.delete_with_posts(id).await?
        } else {
            self.categories.delete(id).await.map_err(|e| match e {
                RepoError::Constraint(msg) => DomainError::Conflict(msg),
                other => other.into(),
            })?;
            0
        };

        tracing::warn!(category_id = id, name = %category, posts_removed = removed, "Category deleted");
        Ok(removed)
    }

    pub async fn create_post(
        &self,
        principal: &Principal,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        require_staff(principal)?;
        validate_post(&form)?;
        self.ensure_category(form.category_id).await?;

        let author_id = assign_author(None, principal);
        self.ensure_author(author_id).await?;

        let now = Utc::now();
        let new = NewPost {
            title: form.title.trim().to_string(),
            content: form.content,
            excerpt: form.excerpt.unwrap_or_default(),
            created_at: form.created_at.unwrap_or(now),
            updated_at: now,
            category_id: form.category_id,
            author_id,
        };

        let post = self.posts.create(new).await.map_err(integrity)?;
        tracing::info!(post_id = post.id, title = %post, author_id = %post.author_id, "Post created");
        Ok(post)
    }

    /// Edit an existing post. Author and view count are preserved.
    pub async fn update_post(
        &self,
        principal: &Principal,
        id: i32,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        require_staff(principal)?;
        validate_post(&form)?;

        let existing = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        self.ensure_category(form.category_id).await?;

        let post = Post {
            id: existing.id,
            title: form.title.trim().to_string(),
            content: form.content,
            excerpt: form.excerpt.unwrap_or_default(),
            created_at: form.created_at.unwrap_or(existing.created_at),
            updated_at: Utc::now(),
            category_id: form.category_id,
            author_id: assign_author(Some(&existing), principal),
            views: existing.views,
        };

        let post = self.posts.update(post).await.map_err(integrity)?;
        tracing::info!(post_id = post.id, title = %post, "Post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, principal: &Principal, id: i32) -> Result<(), DomainError> {
        require_staff(principal)?;

        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => other.into(),
        })?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    async fn ensure_category(&self, category_id: i32) -> Result<(), DomainError> {
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(DomainError::IntegrityViolation(format!(
                "category {category_id} does not exist"
            )));
        }
        Ok(())
    }

    async fn ensure_author(&self, author_id: Uuid) -> Result<(), DomainError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::IntegrityViolation(format!(
                "author {author_id} does not exist"
            )));
        }
        Ok(())
    }
}

fn require_staff(principal: &Principal) -> Result<(), DomainError> {
    if principal.is_staff {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Constraint violations on a post write mean a dangling reference.
fn integrity(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(msg) => DomainError::IntegrityViolation(msg),
        other => other.into(),
    }
}

fn validate_category(form: &CategoryForm) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    check_text("name", &form.name, CATEGORY_NAME_MAX_LEN, true, &mut errors);
    into_result(errors)
}

fn validate_post(form: &PostForm) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    check_text("title", &form.title, TITLE_MAX_LEN, true, &mut errors);
    if form.content.trim().is_empty() {
        errors.push("content is required".to_string());
    }
    if let Some(excerpt) = &form.excerpt {
        check_text("excerpt", excerpt, EXCERPT_MAX_LEN, false, &mut errors);
    }
    into_result(errors)
}

fn check_text(field: &str, value: &str, max_len: usize, required: bool, errors: &mut Vec<String>) {
    let value = value.trim();
    if required && value.is_empty() {
        errors.push(format!("{field} is required"));
    }
    if value.chars().count() > max_len {
        errors.push(format!("{field} must be at most {max_len} characters"));
    }
}

fn into_result(errors: Vec<String>) -> Result<(), DomainError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            is_staff: true,
        }
    }

    fn post_by(author_id: Uuid) -> Post {
        let now = Utc::now();
        Post {
            id: 7,
            title: "Draft".to_string(),
            content: "Body".to_string(),
            excerpt: String::new(),
            created_at: now,
            updated_at: now,
            category_id: 1,
            author_id,
            views: 0,
        }
    }

    #[test]
    fn test_new_post_is_owned_by_principal() {
        let actor = principal();
        assert_eq!(assign_author(None, &actor), actor.user_id);
    }

    #[test]
    fn test_existing_post_keeps_author() {
        let original = Uuid::new_v4();
        let post = post_by(original);
        assert_eq!(assign_author(Some(&post), &principal()), original);
    }

    #[test]
    fn test_require_staff() {
        let mut actor = principal();
        assert!(require_staff(&actor).is_ok());
        actor.is_staff = false;
        assert!(matches!(require_staff(&actor), Err(DomainError::Forbidden)));
    }

    #[test]
    fn test_post_validation_collects_errors() {
        let form = PostForm {
            title: "   ".to_string(),
            content: String::new(),
            excerpt: Some("x".repeat(EXCERPT_MAX_LEN + 1)),
            ..Default::default()
        };

        let err = validate_post(&form).unwrap_err();
        let DomainError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("title is required"));
        assert!(msg.contains("content is required"));
        assert!(msg.contains("excerpt must be at most 200 characters"));
    }

    #[test]
    fn test_category_name_length_counts_characters() {
        let form = CategoryForm {
            name: "技".repeat(CATEGORY_NAME_MAX_LEN),
            description: String::new(),
        };
        assert!(validate_category(&form).is_ok());

        let form = CategoryForm {
            name: "技".repeat(CATEGORY_NAME_MAX_LEN + 1),
            description: String::new(),
        };
        assert!(validate_category(&form).is_err());
    }
}
