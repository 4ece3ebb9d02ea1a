//! The read path: post listings and the single-post fetch.

use std::sync::Arc;

use crate::domain::{Category, Post};
use crate::error::{DomainError, RepoError};
use crate::pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};
use crate::ports::{BaseRepository, CategoryRepository, PostRepository};

/// Resolves ordered, paginated post sequences.
///
/// Every call goes to the repositories; nothing is cached.
#[derive(Clone)]
pub struct ListingService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    per_page: u64,
}

impl ListingService {
    pub fn new(posts: Arc<dyn PostRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            posts,
            categories,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size. Values below 1 fall back to the default.
    pub fn with_page_size(mut self, per_page: u64) -> Self {
        self.per_page = if per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            per_page
        };
        self
    }

    /// All posts, newest first.
    pub async fn list_all(&self, page: u64) -> Result<Page<Post>, DomainError> {
        let request = self.page_request(page)?;
        ensure_addressable(request)?;
        let result = self.posts.list_recent(None, request).await?;
        ensure_in_range(result)
    }

    /// Posts of one category, newest first.
    ///
    /// An unknown category is `NotFound`; a known one without posts yields an
    /// empty first page.
    pub async fn list_by_category(
        &self,
        category_id: i32,
        page: u64,
    ) -> Result<(Category, Page<Post>), DomainError> {
        let request = self.page_request(page)?;
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", category_id))?;

        ensure_addressable(request)?;
        let result = self.posts.list_recent(Some(category.id), request).await?;
        Ok((category, ensure_in_range(result)?))
    }

    /// Fetch one post and count the view.
    ///
    /// The view count is increased exactly once per successful call and the
    /// returned post carries the new count.
    pub async fn fetch_post(&self, id: i32) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        let views = match self.posts.increase_views(post.id).await {
            Ok(views) => views,
            // Deleted between the read and the increment.
            Err(RepoError::NotFound) => return Err(DomainError::not_found("Post", id)),
            Err(e) => return Err(e.into()),
        };
        post.observe_views(views);

        tracing::debug!(post_id = post.id, views, "Post viewed");
        Ok(post)
    }

    fn page_request(&self, page: u64) -> Result<PageRequest, DomainError> {
        let request = PageRequest::new(page, self.per_page);
        if !request.is_valid() {
            return Err(DomainError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        Ok(request)
    }
}

/// A page starting beyond any storable offset is past the last one.
fn ensure_addressable(request: PageRequest) -> Result<(), DomainError> {
    if !request.is_addressable() {
        return Err(DomainError::not_found("Page", request.number));
    }
    Ok(())
}

/// Pages past the last one do not exist. The first page always does.
fn ensure_in_range(page: Page<Post>) -> Result<Page<Post>, DomainError> {
    if page.is_out_of_range() {
        return Err(DomainError::not_found("Page", page.number));
    }
    Ok(page)
}
