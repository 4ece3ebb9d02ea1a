//! # Quill Shared
//!
//! Wire types of the blog API.
//! Kept free of server dependencies so clients can depend on it directly.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
