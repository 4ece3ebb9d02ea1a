//! In-memory store - used when no database is configured, and in tests.
//!
//! Data is lost on process restart. Referential rules mirror the SQL schema:
//! posts need an existing category and author, and a category with posts
//! cannot be deleted on its own.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, NewCategory, NewPost, Post, User};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, PageRequest};
use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    posts: BTreeMap<i32, Post>,
    users: HashMap<Uuid, User>,
    last_category_id: i32,
    last_post_id: i32,
}

/// Shared tables behind an async RwLock. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryCategoryRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Category, NewCategory, i32> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create(&self, new: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.last_category_id += 1;

        let category = Category {
            id: tables.last_category_id,
            name: new.name,
            description: new.description,
            created_at: new.created_at,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .categories
            .get_mut(&category.id)
            .ok_or(RepoError::NotFound)?;

        stored.name = category.name;
        stored.description = category.description;
        Ok(stored.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.values().any(|p| p.category_id == id) {
            return Err(RepoError::Constraint(format!(
                "category {id} is still referenced by posts"
            )));
        }
        tables
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn delete_with_posts(&self, id: i32) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Err(RepoError::NotFound);
        }

        let before = tables.posts.len();
        tables.posts.retain(|_, p| p.category_id != id);
        let removed = (before - tables.posts.len()) as u64;
        tables.categories.remove(&id);
        Ok(removed)
    }
}

impl Tables {
    fn check_references(&self, category_id: i32, author_id: Uuid) -> Result<(), RepoError> {
        if !self.categories.contains_key(&category_id) {
            return Err(RepoError::Constraint(format!(
                "category {category_id} does not exist"
            )));
        }
        if !self.users.contains_key(&author_id) {
            return Err(RepoError::Constraint(format!(
                "user {author_id} does not exist"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_references(new.category_id, new.author_id)?;
        tables.last_post_id += 1;

        let post = Post {
            id: tables.last_post_id,
            title: new.title,
            content: new.content,
            excerpt: new.excerpt,
            created_at: new.created_at,
            updated_at: new.updated_at,
            category_id: new.category_id,
            author_id: new.author_id,
            views: 0,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    /// The stored view count wins over whatever the caller holds.
    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_references(post.category_id, post.author_id)?;

        let stored = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        let views = stored.views;
        *stored = Post { views, ..post };
        Ok(stored.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_recent(
        &self,
        category_id: Option<i32>,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| category_id.is_none_or(|id| p.category_id == id))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn count_by_category(&self, category_id: i32) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.category_id == category_id)
            .count() as u64)
    }

    async fn increase_views(&self, id: i32) -> Result<u32, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.views = post.views.saturating_add(1);
        Ok(post.views)
    }
}

#[async_trait]
impl BaseRepository<User, User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email already registered".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let stored = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *stored = user;
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        // Mirrors ON DELETE CASCADE on posts.author_id.
        tables.posts.retain(|_, p| p.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}
