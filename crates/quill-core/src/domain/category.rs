use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a category name, in characters.
pub const CATEGORY_NAME_MAX_LEN: usize = 100;

/// Category entity - a named grouping every post belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Assigned once on creation, never changed afterwards.
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A category that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_displays_as_name() {
        let category = Category {
            id: 1,
            name: "Tech".to_string(),
            description: String::new(),
            created_at: Utc::now(),
        };
        assert_eq!(category.to_string(), "Tech");
    }
}
