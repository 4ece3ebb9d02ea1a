//! Services - the read path and the editing surface, written against ports.

mod editor;
mod listing;

pub use editor::{CategoryForm, EditorService, PostForm, Principal, assign_author};
pub use listing::ListingService;
