//! Domain entities - the blog's records.

mod category;
mod post;
mod user;

pub use category::{CATEGORY_NAME_MAX_LEN, Category, NewCategory};
pub use post::{EXCERPT_MAX_LEN, NewPost, Post, TITLE_MAX_LEN};
pub use user::User;
