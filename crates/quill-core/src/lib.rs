//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the blog's records, the ports storage and identity
//! must implement, and the listing/editing services built on top of them.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use pagination::{Page, PageRequest};
