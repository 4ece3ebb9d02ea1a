use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, NewCategory, NewPost, Post, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
///
/// `T` is the stored record, `N` the shape accepted on creation.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity, returning it with its storage-assigned fields.
    async fn create(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, NewCategory, i32> {
    /// All categories, oldest first.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    /// Delete a category together with its posts in one unit of work.
    ///
    /// Returns the number of posts removed.
    async fn delete_with_posts(&self, id: i32) -> Result<u64, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i32> {
    /// One page of posts, newest first, optionally restricted to a category.
    async fn list_recent(
        &self,
        category_id: Option<i32>,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Number of posts filed under a category.
    async fn count_by_category(&self, category_id: i32) -> Result<u64, RepoError>;

    /// Atomically add one to the stored view count and return the new value.
    ///
    /// Only the view count is written. Fails with `RepoError::NotFound` if
    /// the post does not exist.
    async fn increase_views(&self, id: i32) -> Result<u32, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}
