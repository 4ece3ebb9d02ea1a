//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{
    BaseRepository, CategoryRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use quill_core::services::{EditorService, ListingService};
use quill_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository, connect,
};

use crate::config::{AdminBootstrap, AppConfig};
use crate::middleware::error::{AppError, AppResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub listing: ListingService,
    pub editor: EditorService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

struct Repositories {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl Repositories {
    fn in_memory(db: &InMemoryDatabase) -> Self {
        Self {
            categories: Arc::new(db.categories()),
            posts: Arc::new(db.posts()),
            users: Arc::new(db.users()),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// A configured database that cannot be reached is fatal.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        if config.jwt.uses_default_secret() {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }

        #[cfg(feature = "postgres")]
        let repos = match &config.database {
            Some(db_config) => {
                let conn = connect(db_config)
                    .await
                    .map_err(|e| std::io::Error::other(format!("database: {e}")))?;
                let conn = Arc::new(conn);
                Repositories {
                    categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                    posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                    users: Arc::new(PostgresUserRepository::new(conn)),
                }
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
                Repositories::in_memory(&InMemoryDatabase::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using the in-memory store");
            Repositories::in_memory(&InMemoryDatabase::new())
        };

        let state = Self::from_parts(
            repos,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            config.posts_per_page,
        );
        tracing::info!(
            posts_per_page = config.posts_per_page,
            "Application state initialized"
        );
        Ok(state)
    }

    /// State over an existing in-memory store.
    pub fn in_memory(
        db: &InMemoryDatabase,
        tokens: Arc<dyn TokenService>,
        posts_per_page: u64,
    ) -> Self {
        Self::from_parts(Repositories::in_memory(db), tokens, posts_per_page)
    }

    fn from_parts(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        posts_per_page: u64,
    ) -> Self {
        let listing = ListingService::new(repos.posts.clone(), repos.categories.clone())
            .with_page_size(posts_per_page);
        let editor = EditorService::new(repos.categories, repos.posts, repos.users.clone());

        Self {
            listing,
            editor,
            users: repos.users,
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    /// Create the configured staff account unless a user with that email exists.
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> AppResult<()> {
        if self.users.find_by_email(&admin.email).await?.is_some() {
            tracing::debug!("Admin account already present");
            return Ok(());
        }

        let hash = self
            .passwords
            .hash(&admin.password)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let user = self
            .users
            .create(User::new(admin.email.clone(), hash, true))
            .await?;

        tracing::info!(user_id = %user.id, "Admin account created");
        Ok(())
    }
}
