use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a post title, in characters.
pub const TITLE_MAX_LEN: usize = 200;
/// Maximum length of a post excerpt, in characters.
pub const EXCERPT_MAX_LEN: usize = 200;

/// Post entity - a single blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub created_at: DateTime<Utc>,
    /// Set by the system on every save.
    pub updated_at: DateTime<Utc>,
    pub category_id: i32,
    pub author_id: Uuid,
    pub views: u32,
}

impl Post {
    /// Apply a view count read back from storage.
    ///
    /// Counts never go down, so a stale value is ignored.
    pub fn observe_views(&mut self, stored: u32) {
        self.views = self.views.max(stored);
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A post that has not been stored yet. New posts always start with zero views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_id: i32,
    pub author_id: Uuid,
}
